use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Raw snapshot fetch failed: {0}")]
    Fetch(String),

    #[error("JSON (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Report output failed: {0}")]
    Output(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
