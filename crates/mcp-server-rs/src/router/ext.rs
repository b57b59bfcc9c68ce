use async_trait::async_trait;
use mcp_core_rs::{
    CallToolResult, InitializeResult, ToolCall,
    protocol::{
        constants::PROTOCOL_VERSION,
        error::ErrorData,
        lifecycle::{EmptyResult, Implementation},
        message::{JsonRpcRequest, JsonRpcResponse},
    },
    tool::ListToolsResult,
};
use mcp_error_rs::{Error, Result};
use serde::Serialize;
use serde_json::{Value, json};

use crate::router::Router;

fn reply<T: Serialize>(req: &JsonRpcRequest, result: T) -> Result<JsonRpcResponse> {
    Ok(JsonRpcResponse::with_result(
        req.id.clone(),
        serde_json::to_value(result)?,
    ))
}

/// The MCP methods a [`Router`] answers, one handler per method.
#[async_trait]
pub trait RouterExt: Router {
    async fn handle_initialize(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse> {
        reply(
            &req,
            InitializeResult {
                protocol_version: PROTOCOL_VERSION.to_string(),
                capabilities: self.capabilities(),
                server_info: Implementation {
                    name: self.name(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
                instructions: Some(self.instructions()),
            },
        )
    }

    async fn handle_ping(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse> {
        reply(&req, EmptyResult::default())
    }

    async fn handle_tools_list(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse> {
        reply(
            &req,
            ListToolsResult {
                tools: self.list_tools(),
                next_cursor: None,
            },
        )
    }

    /// Tool failures become error responses here, so a bad chart request
    /// never ends the session.
    async fn handle_tools_call(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse> {
        let params = req
            .params
            .clone()
            .ok_or_else(|| Error::InvalidParameters("Missing params".into()))?;
        let ToolCall { name, arguments } = serde_json::from_value(params)
            .map_err(|e| Error::InvalidParameters(format!("Invalid tools/call params: {e}")))?;
        let arguments = if arguments.is_null() { json!({}) } else { arguments };

        match self.call_tool(&name, arguments).await {
            Ok(content) => reply(&req, CallToolResult::from(content)),
            Err(e) => {
                tracing::error!(tool = %name, error = %e, "tool call failed");
                Ok(JsonRpcResponse::with_error(req.id, ErrorData::from(&e)))
            }
        }
    }
}

impl<T: Router + ?Sized> RouterExt for T {}
