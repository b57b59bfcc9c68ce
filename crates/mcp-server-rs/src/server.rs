use mcp_core_rs::protocol::{
    constants::{INTERNAL_ERROR, INVALID_REQUEST, PARSE_ERROR},
    error::ErrorData,
    message::{JsonRpcError, JsonRpcMessage, JsonRpcRequest, JsonRpcResponse},
};
use mcp_error_rs::{BoxError, Error, Result};
use tower_service::Service;

use crate::transport::ServerTransport;

/// Drives one MCP session: every request read from the transport is handed
/// to `service` and its response written back, in arrival order.
pub struct Server<S> {
    service: S,
}

/// JSON-RPC code for a frame the transport could not turn into a message.
fn decode_error_code(e: &Error) -> i32 {
    match e {
        Error::Json(_) | Error::Utf8(_) => PARSE_ERROR,
        // Well-formed JSON that is not a JSON-RPC 2.0 object.
        Error::InvalidMessage(_) => INVALID_REQUEST,
        _ => INTERNAL_ERROR,
    }
}

impl<S> Server<S>
where
    S: Service<JsonRpcRequest, Response = JsonRpcResponse> + Send,
    S::Error: Into<BoxError>,
    S::Future: Send,
{
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub async fn run(mut self, mut transport: impl ServerTransport) -> Result<()> {
        tracing::info!("session opened");

        while let Some(frame) = transport.read_message().await {
            let reply = match frame {
                Ok(msg) => self.dispatch(msg).await,
                Err(e) => {
                    tracing::warn!(error = %e, "undecodable frame");
                    let error = ErrorData::new(decode_error_code(&e), e.to_string());
                    Some(JsonRpcMessage::Error(JsonRpcError::unattributed(error)))
                }
            };
            if let Some(reply) = reply {
                transport.write_message(reply).await?;
            }
        }

        tracing::info!("session closed by peer");
        transport.close().await
    }

    /// Only requests get an answer; notifications and stray responses are dropped.
    async fn dispatch(&mut self, msg: JsonRpcMessage) -> Option<JsonRpcMessage> {
        let request = match msg {
            JsonRpcMessage::Request(request) => request,
            JsonRpcMessage::Notification(n) => {
                tracing::debug!(method = %n.method, "notification");
                return None;
            }
            _ => return None,
        };

        let id = request.id.clone();
        let method = request.method.clone();
        let response = match self.service.call(request).await {
            Ok(response) => response,
            Err(e) => {
                let e: BoxError = e.into();
                tracing::error!(%method, error = %e, "service failed");
                JsonRpcResponse::with_error(id, ErrorData::new(INTERNAL_ERROR, e.to_string()))
            }
        };
        tracing::debug!(%method, failed = response.error.is_some(), "request handled");

        Some(JsonRpcMessage::Response(response))
    }
}
