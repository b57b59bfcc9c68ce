use mcp_error_rs::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::{
    constants::{JSONRPC_EXPECTED_VERSION, JSONRPC_VERSION_FIELD},
    error::ErrorData,
};

/// Request ids may be numbers or strings; they are echoed back untouched.
pub type RequestId = Value;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JsonRpcNotification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Exactly one of `result` and `error` is set.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorData>,
}

impl JsonRpcResponse {
    fn envelope(id: Option<RequestId>, result: Option<Value>, error: Option<ErrorData>) -> Self {
        Self {
            jsonrpc: JSONRPC_EXPECTED_VERSION.to_string(),
            id,
            result,
            error,
        }
    }

    pub fn with_result(id: Option<RequestId>, result: Value) -> Self {
        Self::envelope(id, Some(result), None)
    }

    pub fn with_error(id: Option<RequestId>, error: ErrorData) -> Self {
        Self::envelope(id, None, Some(error))
    }
}

/// An error that cannot be tied to a request, such as an unparseable line.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JsonRpcError {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    pub error: ErrorData,
}

impl JsonRpcError {
    pub fn unattributed(error: ErrorData) -> Self {
        Self {
            jsonrpc: JSONRPC_EXPECTED_VERSION.to_string(),
            id: None,
            error,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged, try_from = "Envelope")]
pub enum JsonRpcMessage {
    Request(JsonRpcRequest),
    Response(JsonRpcResponse),
    Notification(JsonRpcNotification),
    Error(JsonRpcError),
    /// `{"jsonrpc":"2.0"}` with nothing else; accepted and ignored.
    Nil,
}

/// Deepest array/object nesting a frame may carry. Hierarchical chart inputs
/// spend two levels per tree level, so this admits trees about 250 deep.
pub const MAX_FRAME_NESTING: usize = 512;

/// Bracket depth of a JSON text, ignoring brackets inside strings.
fn nesting_depth(bytes: &[u8]) -> usize {
    let (mut depth, mut deepest) = (0usize, 0usize);
    let (mut in_string, mut escaped) = (false, false);
    for &b in bytes {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

impl JsonRpcMessage {
    /// Parses one transport frame, insisting on an object tagged `"jsonrpc": "2.0"`.
    ///
    /// serde_json's built-in recursion limit is off so deep tree inputs get
    /// through; [`MAX_FRAME_NESTING`] bounds the stack instead.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if nesting_depth(bytes) > MAX_FRAME_NESTING {
            return Err(Error::InvalidMessage(format!(
                "Message nests deeper than {MAX_FRAME_NESTING} levels"
            )));
        }
        let mut de = serde_json::Deserializer::from_slice(bytes);
        de.disable_recursion_limit();
        let value = Value::deserialize(&mut de)?;
        de.end()?;

        let version = value
            .as_object()
            .ok_or_else(|| Error::InvalidMessage("Message must be a JSON object".into()))?
            .get(JSONRPC_VERSION_FIELD)
            .and_then(Value::as_str);
        if version != Some(JSONRPC_EXPECTED_VERSION) {
            return Err(Error::InvalidMessage(
                "Missing or invalid jsonrpc version".into(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_line(line: &str) -> Result<Self> {
        Self::from_slice(line.as_bytes())
    }
}

/// Every member any message kind may carry; classified by which are present.
#[derive(Deserialize)]
struct Envelope {
    jsonrpc: String,
    id: Option<RequestId>,
    method: Option<String>,
    params: Option<Value>,
    result: Option<Value>,
    error: Option<ErrorData>,
}

impl TryFrom<Envelope> for JsonRpcMessage {
    type Error = String;

    fn try_from(m: Envelope) -> core::result::Result<Self, String> {
        let Envelope {
            jsonrpc,
            id,
            method,
            params,
            result,
            error,
        } = m;

        Ok(match (method, id, result, error) {
            (_, id, _, Some(error)) => JsonRpcMessage::Error(JsonRpcError { jsonrpc, id, error }),
            (_, id, Some(result), None) => JsonRpcMessage::Response(JsonRpcResponse {
                jsonrpc,
                id,
                result: Some(result),
                error: None,
            }),
            (Some(method), None, None, None) => {
                JsonRpcMessage::Notification(JsonRpcNotification {
                    jsonrpc,
                    method,
                    params,
                })
            }
            (Some(method), id @ Some(_), None, None) => JsonRpcMessage::Request(JsonRpcRequest {
                jsonrpc,
                id,
                method,
                params,
            }),
            (None, None, None, None) => JsonRpcMessage::Nil,
            (None, Some(id), None, None) => {
                return Err(format!("message with id {id} has no method, result or error"));
            }
        })
    }
}
