pub mod constants;
pub mod error;
pub mod lifecycle;
pub mod message;

pub use lifecycle::{ServerCapabilities, ToolsCapability};
