use async_trait::async_trait;
use mcp_core_rs::{
    Tool,
    content::Content,
    protocol::{ServerCapabilities, ToolsCapability},
};
use mcp_error_rs::Result;
use serde_json::Value;

pub mod ext;
pub mod service;

pub use ext::RouterExt;
pub use service::RouterService;

/// A tool-serving MCP backend. Protocol plumbing lives in [`RouterExt`];
/// implementors only describe themselves and run tools.
#[async_trait]
pub trait Router: Send + Sync {
    /// Reported as `serverInfo.name` during `initialize`.
    fn name(&self) -> String;

    fn instructions(&self) -> String;

    fn capabilities(&self) -> ServerCapabilities;

    /// Tools in the order `tools/list` should return them.
    fn list_tools(&self) -> Vec<Tool>;

    /// Runs one tool. Errors that [`mcp_error_rs::Error::is_caller_error`]
    /// accepts become `-32602`, everything else `-32603`.
    async fn call_tool(&self, tool_name: &str, arguments: Value) -> Result<Vec<Content>>;
}

#[derive(Debug, Default)]
pub struct CapabilitiesBuilder {
    tools: Option<ToolsCapability>,
}

impl CapabilitiesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `list_changed` stays false for a fixed tool set.
    pub fn with_tools(mut self, list_changed: bool) -> Self {
        self.tools = Some(ToolsCapability {
            list_changed: Some(list_changed),
        });
        self
    }

    pub fn build(self) -> ServerCapabilities {
        ServerCapabilities { tools: self.tools }
    }
}
