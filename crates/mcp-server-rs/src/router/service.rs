use std::{
    pin::Pin,
    task::{Context, Poll},
};

use mcp_core_rs::protocol::{
    constants::METHOD_NOT_FOUND,
    error::ErrorData,
    message::{JsonRpcRequest, JsonRpcResponse},
};
use mcp_error_rs::BoxError;
use tower_service::Service;

use crate::router::{Router, ext::RouterExt};

/// Exposes a [`Router`] as a tower `Service`, so [`crate::server::Server`]
/// can drive it. Cloning the router per call keeps the service `Send`.
#[derive(Clone)]
pub struct RouterService<T>(pub T);

type ServiceFuture =
    Pin<Box<dyn Future<Output = core::result::Result<JsonRpcResponse, BoxError>> + Send>>;

impl<T> Service<JsonRpcRequest> for RouterService<T>
where
    T: Router + Clone + Send + Sync + 'static,
{
    type Response = JsonRpcResponse;
    type Error = BoxError;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<core::result::Result<(), BoxError>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: JsonRpcRequest) -> Self::Future {
        let router = self.0.clone();

        Box::pin(async move {
            let id = req.id.clone();
            let handled = match req.method.as_str() {
                "initialize" => router.handle_initialize(req).await,
                "ping" => router.handle_ping(req).await,
                "tools/list" => router.handle_tools_list(req).await,
                "tools/call" => router.handle_tools_call(req).await,
                method => {
                    tracing::debug!(%method, "unsupported method");
                    let error = ErrorData::new(METHOD_NOT_FOUND, format!("Method '{method}' not found"));
                    return Ok(JsonRpcResponse::with_error(id, error));
                }
            };

            Ok(handled.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "request rejected");
                JsonRpcResponse::with_error(id, ErrorData::from(&e))
            }))
        })
    }
}
