use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraceDeckError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("fetch failed: {message}")]
    Fetch {
        status: Option<u16>,
        message: String,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl TraceDeckError {
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            status: None,
            message: message.into(),
        }
    }

    pub fn fetch_status(status: u16, message: impl Into<String>) -> Self {
        Self::Fetch {
            status: Some(status),
            message: format!("{} (status {status})", message.into()),
        }
    }
}

pub type Result<T> = std::result::Result<T, TraceDeckError>;
