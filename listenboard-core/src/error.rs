use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Operation timeout after {seconds} seconds")]
    Timeout { seconds: u64 },
}

#[derive(Error, Debug, Clone)]
pub enum ChatError {
    #[error("Chat endpoint returned status {status_code}")]
    ServerError { status_code: u16 },

    #[error("Chat endpoint unavailable: {endpoint}")]
    EndpointUnavailable { endpoint: String },

    #[error("Invalid response format: {details}")]
    InvalidResponseFormat { details: String },

    #[error("Request timeout")]
    RequestTimeout,

    #[error("A request is already in flight for this session")]
    Busy,
}

#[derive(Error, Debug, Clone)]
pub enum DatasetError {
    #[error("Score out of range for {field}: {value}")]
    ScoreOutOfRange { field: String, value: f64 },

    #[error("Empty field {field} in seed record {index}")]
    EmptyField { field: String, index: usize },

    #[error("Seed file not found: {path}")]
    SeedNotFound { path: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Configuration validation failed: {reason}")]
    ValidationFailed { reason: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}
