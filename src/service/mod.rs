pub mod matcher;
pub mod similarity;

pub use matcher::ItemMatcher;
pub use similarity::{compare_code, name_similarity, normalize_name};
