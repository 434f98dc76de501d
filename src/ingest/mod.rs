pub mod loader;
pub mod record;

pub use loader::{load_manifest, load_purchases, load_records, load_sales, ManifestEntry};
pub use record::{ingest_purchases, ingest_sales, RawItemRecord, RawValue};
