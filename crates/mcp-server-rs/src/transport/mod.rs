use async_trait::async_trait;

use crate::{core::protocol::message::JsonRpcMessage, error::Result};

pub mod byte;
pub mod sse;

pub use byte::ByteTransport;
pub use sse::{SseChannels, SseTransport};

/// One end of an MCP session as seen by [`crate::server::Server`].
///
/// `read_message` yields `None` once the peer is gone; an `Err` item is a
/// frame that could not be decoded and is answered with a JSON-RPC error
/// without ending the session.
#[async_trait]
pub trait ServerTransport: Send + Sync {
    async fn read_message(&mut self) -> Option<Result<JsonRpcMessage>>;

    async fn write_message(&mut self, msg: JsonRpcMessage) -> Result<()>;

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
