#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use mcp_echarts_rs::{
    ChartRenderer, ChartRouter, ChartStore, OutputNormalizer, RenderFormat, RenderOutput,
    RenderRequest,
    core::protocol::message::{JsonRpcRequest, JsonRpcResponse},
    error::Result,
    server::router::RouterService,
};
use serde_json::{Value, json};
use tower_service::Service;

pub const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Answers every render with a fixed PNG header, or a tiny SVG that echoes
/// the requested size.
#[derive(Default)]
pub struct StubRenderer {
    pub calls: AtomicUsize,
}

#[async_trait]
impl ChartRenderer for StubRenderer {
    async fn render(&self, request: RenderRequest) -> Result<RenderOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(match request.format {
            RenderFormat::Png => RenderOutput::Raster(PNG_MAGIC.to_vec()),
            RenderFormat::Svg => RenderOutput::Markup(format!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\"></svg>",
                request.width, request.height
            )),
        })
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub uploads: AtomicUsize,
}

#[async_trait]
impl ChartStore for MemoryStore {
    async fn store(&self, _bytes: &[u8], extension: &str, _content_type: &str) -> Result<String> {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(format!("http://localhost:9000/mcp-echarts/charts/{n}.{extension}"))
    }
}

pub fn router(store: Option<Arc<MemoryStore>>) -> ChartRouter {
    let store = store.map(|s| s as Arc<dyn ChartStore>);
    ChartRouter::new(OutputNormalizer::new(Arc::new(StubRenderer::default()), store))
}

pub async fn rpc(router: ChartRouter, method: &str, params: Value) -> JsonRpcResponse {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: Some(json!(1)),
        method: method.to_string(),
        params: Some(params),
    };
    RouterService(router).call(request).await.unwrap()
}

pub async fn call_tool(router: ChartRouter, name: &str, arguments: Value) -> JsonRpcResponse {
    rpc(router, "tools/call", json!({ "name": name, "arguments": arguments })).await
}

/// A small valid argument set for every tool.
pub fn sample_arguments() -> Vec<(&'static str, Value)> {
    vec![
        (
            "generate_echarts",
            json!({
                "echartsOption": r#"{"xAxis":{"data":["a","b"]},"yAxis":{},"series":[{"type":"bar","data":[5,20]}]}"#,
            }),
        ),
        (
            "generate_line_chart",
            json!({ "data": [{ "time": "2015", "value": 23 }, { "time": "2016", "value": 32 }] }),
        ),
        (
            "generate_bar_chart",
            json!({ "data": [{ "category": "A", "value": 10 }, { "category": "B", "value": 20 }] }),
        ),
        (
            "generate_pie_chart",
            json!({ "data": [{ "category": "Rent", "value": 40 }, { "category": "Food", "value": 20 }] }),
        ),
        (
            "generate_radar_chart",
            json!({ "data": [{ "name": "Speed", "value": 80 }, { "name": "Power", "value": 60 }] }),
        ),
        (
            "generate_scatter_chart",
            json!({ "data": [{ "x": 10, "y": 15 }, { "x": 20, "y": 25 }] }),
        ),
        (
            "generate_sankey_chart",
            json!({ "data": [{ "source": "Landing", "target": "Signup", "value": 30 }] }),
        ),
        (
            "generate_funnel_chart",
            json!({ "data": [{ "category": "Visit", "value": 100 }, { "category": "Buy", "value": 10 }] }),
        ),
        ("generate_gauge_chart", json!({ "data": [{ "name": "CPU", "value": 72 }] })),
        (
            "generate_treemap_chart",
            json!({ "data": [{ "name": "Design", "value": 70 }, { "name": "Build", "value": 30 }] }),
        ),
        (
            "generate_sunburst_chart",
            json!({
                "data": [{
                    "name": "Tech",
                    "value": 100,
                    "children": [{ "name": "Frontend", "value": 60 }, { "name": "Backend", "value": 40 }],
                }],
            }),
        ),
        (
            "generate_heatmap_chart",
            json!({
                "data": [
                    { "x": "Mon", "y": "AM", "value": 5 },
                    { "x": "Tue", "y": "AM", "value": 3 },
                    { "x": "Mon", "y": "PM", "value": 1 },
                ],
            }),
        ),
        (
            "generate_candlestick_chart",
            json!({
                "data": [
                    { "date": "2023-01-02", "open": 105, "high": 108, "low": 99, "close": 100 },
                    { "date": "2023-01-01", "open": 100, "high": 110, "low": 95, "close": 105 },
                ],
            }),
        ),
        (
            "generate_boxplot_chart",
            json!({ "data": [{ "category": "A", "value": 10 }, { "category": "A", "value": 14 }] }),
        ),
        (
            "generate_graph_chart",
            json!({
                "data": {
                    "nodes": [{ "id": "a", "name": "A" }, { "id": "b", "name": "B" }],
                    "edges": [{ "source": "a", "target": "b" }],
                },
            }),
        ),
        (
            "generate_parallel_chart",
            json!({
                "dimensions": ["Price", "Quality"],
                "data": [{ "name": "Product A", "values": [4.2, 3.4] }],
            }),
        ),
        (
            "generate_effectScatter_chart",
            json!({ "data": [{ "x": 10, "y": 15, "value": 20 }] }),
        ),
        (
            "generate_tree_chart",
            json!({ "data": { "name": "Root", "children": [{ "name": "Leaf" }] } }),
        ),
        (
            "generate_pictorialBar_chart",
            json!({ "data": [{ "category": "A", "value": 10, "symbol": "circle" }] }),
        ),
        (
            "generate_themeRiver_chart",
            json!({ "data": [{ "date": "2023-01-01", "value": 100, "name": "Category A" }] }),
        ),
    ]
}

/// Merges `extra` keys into a copy of `arguments`.
pub fn with(arguments: &Value, extra: Value) -> Value {
    let mut merged = arguments.clone();
    if let (Some(target), Value::Object(extra)) = (merged.as_object_mut(), extra) {
        target.extend(extra);
    }
    merged
}
