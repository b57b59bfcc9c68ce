use std::{convert::Infallible, sync::Arc};

use clap::{ArgAction, Args, Parser, ValueEnum};
use mcp_echarts_rs::{
    ChartRouter, ChartStore, CommandRenderer, OssStore, OutputNormalizer, StorageConfig,
};
use mcp_error_rs::Result;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    Stdio,
    Sse,
}

#[derive(Debug, Parser)]
#[command(name = "mcp-echarts", version, about = "Generate Apache ECharts charts over MCP")]
pub struct Cli {
    /// Transport to serve on
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    pub transport: Transport,

    /// Bind address for the SSE transport
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, default_value_t = 3033)]
    pub port: u16,

    /// Renderer executable; receives one JSON request on stdin per chart
    #[arg(long, env = "ECHARTS_RENDERER", default_value = "echarts-render")]
    pub renderer: String,

    /// Extra argument passed to the renderer (repeatable)
    #[arg(long = "renderer-arg")]
    pub renderer_args: Vec<String>,

    #[command(flatten)]
    pub storage: StorageArgs,
}

/// MinIO settings; PNG offloading is enabled only when endpoint and both keys are set.
#[derive(Debug, Args)]
pub struct StorageArgs {
    #[arg(long = "minio-endpoint", env = "MINIO_ENDPOINT")]
    pub endpoint: Option<String>,

    #[arg(id = "minio_port", long = "minio-port", env = "MINIO_PORT", default_value_t = 9000)]
    pub port: u16,

    /// Only the literal `true` turns TLS on
    #[arg(
        long = "minio-use-ssl",
        env = "MINIO_USE_SSL",
        default_value = "false",
        action = ArgAction::Set,
        value_parser = parse_flag
    )]
    pub use_ssl: bool,

    #[arg(long = "minio-access-key", env = "MINIO_ACCESS_KEY", hide_env_values = true)]
    pub access_key: Option<String>,

    #[arg(long = "minio-secret-key", env = "MINIO_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    #[arg(long = "minio-bucket", env = "MINIO_BUCKET_NAME", default_value = "mcp-echarts")]
    pub bucket: String,
}

fn parse_flag(value: &str) -> core::result::Result<bool, Infallible> {
    Ok(value == "true")
}

impl From<&StorageArgs> for StorageConfig {
    fn from(args: &StorageArgs) -> Self {
        StorageConfig {
            endpoint: args.endpoint.clone(),
            port: args.port,
            use_ssl: args.use_ssl,
            access_key: args.access_key.clone(),
            secret_key: args.secret_key.clone(),
            bucket: args.bucket.clone(),
        }
    }
}

impl Cli {
    /// Resolves the collaborators once; every session shares them.
    pub fn chart_router(&self) -> Result<ChartRouter> {
        let renderer = Arc::new(CommandRenderer::new(
            self.renderer.clone(),
            self.renderer_args.clone(),
        ));

        let storage = StorageConfig::from(&self.storage);
        let store: Option<Arc<dyn ChartStore>> = if storage.is_configured() {
            info!(bucket = %storage.bucket, "PNG output will be uploaded to object storage");
            Some(Arc::new(OssStore::new(&storage)?))
        } else {
            info!("object storage not configured, PNG output is inlined as base64");
            None
        };

        Ok(ChartRouter::new(OutputNormalizer::new(renderer, store)))
    }
}
