//! Wire types of the Model Context Protocol subset spoken by the chart server.

pub mod content;
pub mod protocol;
pub mod tool;

pub use content::Content;
pub use mcp_error_rs as error;
pub use protocol::lifecycle::InitializeResult;
pub use tool::{CallToolResult, Tool, ToolCall};
