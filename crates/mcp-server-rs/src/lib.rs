pub mod router;
pub mod server;
pub mod transport;

pub use mcp_core_rs as core;
pub use mcp_error_rs as error;
