pub mod output;
pub mod registry;
pub mod render;
pub mod router;
pub mod schema;
pub mod storage;
pub mod tools;

pub use mcp_core_rs as core;
pub use mcp_error_rs as error;
pub use mcp_server_rs as server;
pub use output::OutputNormalizer;
pub use registry::{REGISTRY, ToolRegistry};
pub use render::{ChartRenderer, CommandRenderer, RenderFormat, RenderOutput, RenderRequest};
pub use router::ChartRouter;
pub use schema::{OutputType, RenderOptions, Theme};
pub use storage::{ChartStore, OssStore, StorageConfig};
pub use tools::{ChartKind, ChartRequest};
