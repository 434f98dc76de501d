use thiserror::Error;

/// 匹配器错误
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid matcher config: {0}")]
    InvalidConfig(String),
}

/// 入口校验/加载错误 (在进入匹配器之前拒绝)
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Record {index}: missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("Record {index}: invalid price '{raw}'")]
    InvalidPrice { index: usize, raw: String },

    #[error("Record {index}: negative price {price}")]
    NegativePrice { index: usize, price: String },

    #[error("Record {index}: invalid quantity '{raw}'")]
    InvalidQuantity { index: usize, raw: String },

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] config::ConfigError),

    #[error(transparent)]
    Invalid(#[from] MatchError),
}
