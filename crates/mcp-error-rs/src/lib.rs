use std::io;

use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("serde_json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid UTF-8 sequence: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Invalid message format: {0}")]
    InvalidMessage(String),

    #[error("Tool {0} not found")]
    ToolNotFound(String),

    #[error("Chart rendering failed: {0}")]
    Render(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("Channel closed")]
    ChannelClosed,
}

impl Error {
    /// True for failures caused by the caller's input rather than the server.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Error::InvalidParameters(_) | Error::ToolNotFound(_))
    }
}

pub type Result<T> = core::result::Result<T, Error>;

pub type BoxError = Box<dyn std::error::Error + Sync + Send>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_error_carries_cause() {
        let err = Error::Render("canvas exhausted".to_string());
        assert_eq!(err.to_string(), "Chart rendering failed: canvas exhausted");
    }

    #[test]
    fn caller_errors_are_classified() {
        assert!(Error::InvalidParameters("x".into()).is_caller_error());
        assert!(Error::ToolNotFound("generate_nothing".into()).is_caller_error());
        assert!(!Error::Storage("down".into()).is_caller_error());
    }
}
