use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    core::protocol::message::JsonRpcMessage,
    error::{Error, Result},
    transport::ServerTransport,
};

/// The HTTP-facing halves of an SSE session: POST bodies are pushed into
/// `inbound`, and `outbound` is drained into `message` events.
pub struct SseChannels {
    pub inbound: UnboundedSender<JsonRpcMessage>,
    pub outbound: UnboundedReceiver<JsonRpcMessage>,
}

/// Server half of an SSE session, fed by [`SseChannels`].
pub struct SseTransport {
    responses: UnboundedSender<JsonRpcMessage>,
    requests: UnboundedReceiver<JsonRpcMessage>,
}

impl SseTransport {
    pub fn new(
        responses: UnboundedSender<JsonRpcMessage>,
        requests: UnboundedReceiver<JsonRpcMessage>,
    ) -> Self {
        Self {
            responses,
            requests,
        }
    }

    /// Creates a transport together with the channel ends the HTTP layer holds.
    pub fn channel() -> (Self, SseChannels) {
        let (responses, outbound) = mpsc::unbounded_channel();
        let (inbound, requests) = mpsc::unbounded_channel();
        (
            Self::new(responses, requests),
            SseChannels { inbound, outbound },
        )
    }
}

#[async_trait]
impl ServerTransport for SseTransport {
    async fn read_message(&mut self) -> Option<Result<JsonRpcMessage>> {
        self.requests.recv().await.map(Ok)
    }

    async fn write_message(&mut self, msg: JsonRpcMessage) -> Result<()> {
        if self.responses.is_closed() {
            tracing::debug!("SSE stream dropped before the response was sent");
            return Err(Error::ChannelClosed);
        }
        self.responses.send(msg).map_err(|_| Error::ChannelClosed)
    }

    async fn close(&mut self) -> Result<()> {
        self.requests.close();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::protocol::message::JsonRpcNotification;

    fn initialized() -> JsonRpcMessage {
        JsonRpcMessage::Notification(JsonRpcNotification {
            jsonrpc: "2.0".to_string(),
            method: "notifications/initialized".to_string(),
            params: Some(json!({})),
        })
    }

    #[tokio::test]
    async fn posted_messages_reach_the_server_half() {
        let (mut transport, channels) = SseTransport::channel();
        channels.inbound.send(initialized()).unwrap();

        let msg = transport.read_message().await.unwrap().unwrap();
        assert!(matches!(msg, JsonRpcMessage::Notification(n) if n.method == "notifications/initialized"));
    }

    #[tokio::test]
    async fn writing_after_the_stream_is_gone_fails() {
        let (mut transport, channels) = SseTransport::channel();
        drop(channels.outbound);

        let err = transport.write_message(initialized()).await.unwrap_err();
        assert!(matches!(err, Error::ChannelClosed));
    }

    #[tokio::test]
    async fn dropping_the_http_side_ends_the_session() {
        let (mut transport, channels) = SseTransport::channel();
        drop(channels);
        assert!(transport.read_message().await.is_none());
    }
}
