use std::{
    collections::HashMap,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    Router,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{Sse, sse::Event},
    routing::get,
};
use futures::{Stream, TryStreamExt};
use mcp_core_rs::protocol::message::JsonRpcMessage;
use mcp_echarts_rs::ChartRouter;
use mcp_server_rs::{router::RouterService, server::Server, transport::SseTransport};
use serde::Deserialize;
use tokio::{
    io,
    sync::{RwLock, mpsc, oneshot},
};
use tokio_stream::{StreamExt, once, wrappers::UnboundedReceiverStream};
use uuid::Uuid;

type SessionId = Arc<str>;

/// Shared state: the chart router cloned into every session, plus the
/// inbound channel of each live session.
#[derive(Clone)]
pub struct App {
    router: ChartRouter,
    sessions: Arc<RwLock<HashMap<SessionId, mpsc::UnboundedSender<JsonRpcMessage>>>>,
}

impl App {
    pub fn new(router: ChartRouter) -> Self {
        Self {
            router,
            sessions: Default::default(),
        }
    }

    pub fn routes(self) -> Router {
        Router::new()
            .route("/sse", get(open_session).post(post_message))
            .with_state(self)
    }
}

/// Fires `disconnected` when the event stream ends or axum drops it
/// because the client went away.
struct DisconnectGuard<S> {
    events: S,
    disconnected: Option<oneshot::Sender<()>>,
}

impl<S> DisconnectGuard<S> {
    fn new(events: S, disconnected: oneshot::Sender<()>) -> Self {
        Self {
            events,
            disconnected: Some(disconnected),
        }
    }

    fn fire(&mut self) {
        if let Some(tx) = self.disconnected.take() {
            let _ = tx.send(());
        }
    }
}

impl<S: Stream + Unpin> Stream for DisconnectGuard<S> {
    type Item = S::Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<S::Item>> {
        let next = Pin::new(&mut self.events).poll_next(cx);
        if let Poll::Ready(None) = next {
            self.fire();
        }
        next
    }
}

impl<S> Drop for DisconnectGuard<S> {
    fn drop(&mut self) {
        self.fire();
    }
}

async fn open_session(State(app): State<App>) -> Sse<impl Stream<Item = Result<Event, io::Error>>> {
    let session: SessionId = Arc::from(Uuid::new_v4().simple().to_string());
    tracing::info!(%session, "SSE session opened");

    let (transport, channels) = SseTransport::channel();
    app.sessions
        .write()
        .await
        .insert(session.clone(), channels.inbound);

    let (disconnected_tx, disconnected) = oneshot::channel::<()>();
    let server = Server::new(RouterService(app.router.clone()));
    let sessions = app.sessions.clone();
    let id = session.clone();

    tokio::spawn(async move {
        let result = tokio::select! {
            res = server.run(transport) => res,
            _ = disconnected => Ok(()),
        };
        sessions.write().await.remove(&id);
        match result {
            Ok(()) => tracing::info!(session = %id, "SSE session closed"),
            Err(e) => tracing::error!(session = %id, error = %e, "SSE session failed"),
        }
    });

    // The first event tells the client where to POST its requests.
    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("?sessionId={session}"));

    let responses = UnboundedReceiverStream::new(channels.outbound)
        .map(|msg| serde_json::to_string(&msg).map_err(io::Error::other))
        .and_then(|json| futures::future::ok(Event::default().event("message").data(json)));

    let events = once(Ok::<Event, io::Error>(endpoint)).chain(responses);
    Sse::new(DisconnectGuard::new(events, disconnected_tx))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostQuery {
    pub session_id: String,
}

/// 202 once queued; 404 for an unknown session, 400 for a body that is not
/// JSON-RPC, 410 when the session is shutting down.
async fn post_message(
    State(app): State<App>,
    Query(PostQuery { session_id }): Query<PostQuery>,
    body: Bytes,
) -> Result<StatusCode, (StatusCode, String)> {
    let sessions = app.sessions.read().await;
    let inbound = sessions
        .get(session_id.as_str())
        .ok_or((StatusCode::NOT_FOUND, "Session not found".to_string()))?;

    let msg = JsonRpcMessage::from_slice(&body)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    tracing::debug!(session = %session_id, "message posted");

    inbound
        .send(msg)
        .map_err(|_| (StatusCode::GONE, "Session closed".to_string()))?;
    Ok(StatusCode::ACCEPTED)
}
