use async_trait::async_trait;
use mcp_core_rs::protocol::message::JsonRpcMessage;
use mcp_error_rs::{Error, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::transport::ServerTransport;

/// Newline-delimited JSON-RPC over a pair of byte streams (stdin/stdout).
pub struct ByteTransport<R, W> {
    reader: BufReader<R>,
    writer: W,
    buf: Vec<u8>,
}

impl<R, W> ByteTransport<R, W>
where
    R: AsyncRead,
    W: AsyncWrite,
{
    /// Creates a new `ByteTransport` with the given reader and writer.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::with_capacity(2 * 1024 * 1024, reader),
            writer,
            buf: Vec::with_capacity(64 * 1024),
        }
    }
}

#[async_trait]
impl<R, W> ServerTransport for ByteTransport<R, W>
where
    R: AsyncRead + Unpin + Send + Sync,
    W: AsyncWrite + Unpin + Send + Sync,
{
    async fn read_message(&mut self) -> Option<Result<JsonRpcMessage>> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf).await {
                Ok(0) => {
                    tracing::info!("Client closed connection (read 0 bytes)");
                    return None;
                }
                Ok(_) => {
                    let line = match String::from_utf8(std::mem::take(&mut self.buf)) {
                        Ok(s) => s,
                        Err(e) => {
                            tracing::warn!(?e, "Invalid UTF-8 line");
                            return Some(Err(Error::Utf8(e)));
                        }
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    return Some(JsonRpcMessage::from_line(&line));
                }
                Err(e) => return Some(Err(Error::Io(e))),
            }
        }
    }

    async fn write_message(&mut self, msg: JsonRpcMessage) -> Result<()> {
        let json = serde_json::to_string(&msg)?;
        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.writer.shutdown().await?;
        Ok(())
    }
}
