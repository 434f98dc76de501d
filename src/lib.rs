pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod service;

pub use crate::config::{AppConfig, MatcherConfig};
pub use crate::error::{ConfigError, IngestError, MatchError};
pub use crate::models::{MatchOutcome, MatchSummary, MatchedPair, PurchaseItem, SaleItem};
pub use crate::service::ItemMatcher;
