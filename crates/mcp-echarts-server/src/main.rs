mod config;
mod sse;

use clap::Parser;
use mcp_error_rs::Result;
use mcp_server_rs::{router::RouterService, server::Server, transport::ByteTransport};
use tokio::io::{stdin, stdout};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Cli, Transport};

/// Logs go to stderr; stdout belongs to the stdio transport.
fn init_tracing() {
    let default = if std::env::var_os("DEBUG_MCP_ECHARTS").is_some() {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let router = cli.chart_router()?;

    match cli.transport {
        Transport::Stdio => {
            tracing::info!("serving on stdio");
            let server = Server::new(RouterService(router));
            server.run(ByteTransport::new(stdin(), stdout())).await
        }
        Transport::Sse => {
            let addr = format!("{}:{}", cli.host, cli.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("SSE endpoint at http://{}/sse", listener.local_addr()?);
            axum::serve(listener, sse::App::new(router).routes()).await?;
            Ok(())
        }
    }
}
