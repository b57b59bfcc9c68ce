use async_trait::async_trait;
use mcp_core_rs::{Tool, content::Content, protocol::ServerCapabilities};
use mcp_error_rs::{Error, Result};
use mcp_server_rs::router::{CapabilitiesBuilder, Router};
use serde_json::Value;
use tracing::debug;

use crate::{output::OutputNormalizer, registry::REGISTRY};

/// Serves every chart tool: validate, build, then hand off to the normalizer.
#[derive(Clone)]
pub struct ChartRouter {
    output: OutputNormalizer,
}

impl ChartRouter {
    pub fn new(output: OutputNormalizer) -> Self {
        Self { output }
    }
}

#[async_trait]
impl Router for ChartRouter {
    fn name(&self) -> String {
        "mcp-echarts".to_string()
    }

    fn instructions(&self) -> String {
        "This server generates Apache ECharts charts. Each generate_* tool takes structured data \
         and returns a PNG image, SVG markup or the ECharts option itself, selected by outputType."
            .to_string()
    }

    fn capabilities(&self) -> ServerCapabilities {
        CapabilitiesBuilder::new().with_tools(false).build()
    }

    fn list_tools(&self) -> Vec<Tool> {
        REGISTRY.tools()
    }

    async fn call_tool(&self, tool_name: &str, arguments: Value) -> Result<Vec<Content>> {
        let kind = REGISTRY
            .get(tool_name)
            .ok_or_else(|| Error::ToolNotFound(tool_name.to_string()))?;

        let request = kind.prepare(arguments)?;
        debug!(tool = tool_name, "chart option built");
        self.output
            .normalize(tool_name, &request.option, &request.options)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::render::{ChartRenderer, RenderFormat, RenderOutput, RenderRequest};

    struct SvgRenderer;

    #[async_trait]
    impl ChartRenderer for SvgRenderer {
        async fn render(&self, request: RenderRequest) -> Result<RenderOutput> {
            Ok(match request.format {
                RenderFormat::Svg => RenderOutput::Markup("<svg></svg>".into()),
                RenderFormat::Png => RenderOutput::Raster(vec![1, 2, 3]),
            })
        }
    }

    fn router() -> ChartRouter {
        ChartRouter::new(OutputNormalizer::new(Arc::new(SvgRenderer), None))
    }

    #[tokio::test]
    async fn unknown_tools_are_reported() {
        let err = router().call_tool("generate_map_chart", json!({})).await.unwrap_err();
        assert!(matches!(err, Error::ToolNotFound(_)));
        assert_eq!(err.to_string(), "Tool generate_map_chart not found");
    }

    #[tokio::test]
    async fn validation_runs_before_rendering() {
        let err = router()
            .call_tool("generate_funnel_chart", json!({ "data": [] }))
            .await
            .unwrap_err();
        assert!(err.is_caller_error());
    }

    #[tokio::test]
    async fn svg_calls_return_markup() {
        let content = router()
            .call_tool(
                "generate_pie_chart",
                json!({ "data": [{ "category": "A", "value": 1 }], "outputType": "svg" }),
            )
            .await
            .unwrap();
        assert_eq!(content, vec![Content::text("<svg></svg>")]);
    }

    #[test]
    fn advertises_tools_only() {
        let caps = serde_json::to_value(router().capabilities()).unwrap();
        assert!(caps.get("tools").is_some());
        assert_eq!(router().list_tools().len(), 20);
    }
}
