use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Negative {kind} for feature '{feature}' in category '{category}'")]
    NegativeRule {
        kind: &'static str,
        category: String,
        feature: String,
    },

    #[error("Malformed record {id}: {reason}")]
    Data { id: String, reason: String },

    #[error("Market data unavailable: {0}")]
    MarketData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl Error {
    /// True for errors raised while validating a single record
    pub fn is_data_error(&self) -> bool {
        matches!(self, Error::Data { .. })
    }
}
