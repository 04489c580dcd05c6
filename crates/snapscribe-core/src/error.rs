use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{service} request failed: {message}")]
    RemoteService {
        service: &'static str,
        message: String,
    },

    #[error("Missing configuration value: {0}")]
    ConfigurationMissing(String),

    #[error("Write authorization failed: {0}")]
    Authorization(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn remote(service: &'static str, message: impl Into<String>) -> Self {
        Self::RemoteService {
            service,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
