use mcp_error_rs::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::constants::{INTERNAL_ERROR, INVALID_PARAMS};

/// The `error` member of a JSON-RPC response.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorData {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorData {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

/// Bad arguments and unknown tools are `-32602`; renderer, storage and
/// other server-side failures are `-32603`.
impl From<&Error> for ErrorData {
    fn from(e: &Error) -> Self {
        let code = if e.is_caller_error() {
            INVALID_PARAMS
        } else {
            INTERNAL_ERROR
        };
        Self::new(code, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_arguments_are_the_callers_fault() {
        let data = ErrorData::from(&Error::InvalidParameters("Bar chart data cannot be empty.".into()));
        assert_eq!(data.code, INVALID_PARAMS);
        assert_eq!(data.message, "invalid parameters: Bar chart data cannot be empty.");
    }

    #[test]
    fn render_failures_are_internal() {
        let data = ErrorData::from(&Error::Render("exit status 1".into()));
        assert_eq!(data.code, INTERNAL_ERROR);
    }
}
