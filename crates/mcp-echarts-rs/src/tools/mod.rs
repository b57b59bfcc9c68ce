//! The chart families. Each module owns one tool: its parameter type and the
//! builder that turns validated parameters into an ECharts option.

pub mod bar;
pub mod boxplot;
pub mod candlestick;
pub mod echarts;
pub mod effect_scatter;
pub mod funnel;
pub mod gauge;
pub mod graph;
pub mod heatmap;
pub mod hierarchy;
pub mod line;
pub mod parallel;
pub mod pictorial_bar;
pub mod pie;
pub mod radar;
pub mod sankey;
pub mod scatter;
pub mod sunburst;
pub mod theme_river;
pub mod tree;
pub mod treemap;

mod group;

use mcp_error_rs::{Error, Result};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::schema::RenderOptions;

/// A chart tool: typed parameters that validate themselves and build an option.
pub trait ChartBuilder: DeserializeOwned + JsonSchema {
    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    /// Checks the constraints serde cannot express (non-empty data, size ranges).
    fn validate(&self) -> Result<()>;

    /// Builds the ECharts option. Only called after `validate` succeeded.
    fn build(&self) -> Result<Value>;

    fn render_options(&self) -> RenderOptions;
}

/// A validated call, ready for the output stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub option: Value,
    pub options: RenderOptions,
}

/// Every tool the server exposes, in listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Echarts,
    Line,
    Bar,
    Pie,
    Radar,
    Scatter,
    Sankey,
    Funnel,
    Gauge,
    Treemap,
    Sunburst,
    Heatmap,
    Candlestick,
    Boxplot,
    Graph,
    Parallel,
    EffectScatter,
    Tree,
    PictorialBar,
    ThemeRiver,
}

struct ToolEntry {
    name: &'static str,
    description: &'static str,
    schema: fn() -> Value,
    prepare: fn(Value) -> Result<ChartRequest>,
}

impl ToolEntry {
    fn of<B: ChartBuilder>() -> Self {
        Self {
            name: B::NAME,
            description: B::DESCRIPTION,
            schema: input_schema::<B>,
            prepare: prepare::<B>,
        }
    }
}

impl ChartKind {
    pub const ALL: [ChartKind; 20] = [
        ChartKind::Echarts,
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Pie,
        ChartKind::Radar,
        ChartKind::Scatter,
        ChartKind::Sankey,
        ChartKind::Funnel,
        ChartKind::Gauge,
        ChartKind::Treemap,
        ChartKind::Sunburst,
        ChartKind::Heatmap,
        ChartKind::Candlestick,
        ChartKind::Boxplot,
        ChartKind::Graph,
        ChartKind::Parallel,
        ChartKind::EffectScatter,
        ChartKind::Tree,
        ChartKind::PictorialBar,
        ChartKind::ThemeRiver,
    ];

    fn entry(self) -> ToolEntry {
        match self {
            ChartKind::Echarts => ToolEntry::of::<echarts::EchartsChart>(),
            ChartKind::Line => ToolEntry::of::<line::LineChart>(),
            ChartKind::Bar => ToolEntry::of::<bar::BarChart>(),
            ChartKind::Pie => ToolEntry::of::<pie::PieChart>(),
            ChartKind::Radar => ToolEntry::of::<radar::RadarChart>(),
            ChartKind::Scatter => ToolEntry::of::<scatter::ScatterChart>(),
            ChartKind::Sankey => ToolEntry::of::<sankey::SankeyChart>(),
            ChartKind::Funnel => ToolEntry::of::<funnel::FunnelChart>(),
            ChartKind::Gauge => ToolEntry::of::<gauge::GaugeChart>(),
            ChartKind::Treemap => ToolEntry::of::<treemap::TreemapChart>(),
            ChartKind::Sunburst => ToolEntry::of::<sunburst::SunburstChart>(),
            ChartKind::Heatmap => ToolEntry::of::<heatmap::HeatmapChart>(),
            ChartKind::Candlestick => ToolEntry::of::<candlestick::CandlestickChart>(),
            ChartKind::Boxplot => ToolEntry::of::<boxplot::BoxplotChart>(),
            ChartKind::Graph => ToolEntry::of::<graph::GraphChart>(),
            ChartKind::Parallel => ToolEntry::of::<parallel::ParallelChart>(),
            ChartKind::EffectScatter => ToolEntry::of::<effect_scatter::EffectScatterChart>(),
            ChartKind::Tree => ToolEntry::of::<tree::TreeChart>(),
            ChartKind::PictorialBar => ToolEntry::of::<pictorial_bar::PictorialBarChart>(),
            ChartKind::ThemeRiver => ToolEntry::of::<theme_river::ThemeRiverChart>(),
        }
    }

    pub fn name(self) -> &'static str {
        self.entry().name
    }

    pub fn description(self) -> &'static str {
        self.entry().description
    }

    /// JSON Schema of the tool's arguments, as advertised by `tools/list`.
    pub fn input_schema(self) -> Value {
        (self.entry().schema)()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Deserializes, validates and builds; no rendering happens here.
    pub fn prepare(self, arguments: Value) -> Result<ChartRequest> {
        (self.entry().prepare)(arguments)
    }
}

fn input_schema<B: ChartBuilder>() -> Value {
    let schema = schemars::schema_for!(B);
    serde_json::to_value(&schema).unwrap_or_else(|_| json!({ "type": "object" }))
}

fn prepare<B: ChartBuilder>(arguments: Value) -> Result<ChartRequest> {
    let params: B = serde_json::from_value(arguments)
        .map_err(|e| Error::InvalidParameters(format!("Invalid chart arguments: {}", e)))?;
    params.validate()?;
    Ok(ChartRequest {
        option: params.build()?,
        options: params.render_options(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_are_unique_and_round_trip() {
        let names: HashSet<_> = ChartKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names.len(), ChartKind::ALL.len());

        for kind in ChartKind::ALL {
            assert_eq!(ChartKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ChartKind::from_name("generate_nope_chart"), None);
    }

    #[test]
    fn schemas_are_objects_with_properties() {
        for kind in ChartKind::ALL {
            let schema = kind.input_schema();
            assert_eq!(schema["type"], "object", "{}", kind.name());
            assert!(schema["properties"].is_object(), "{}", kind.name());
        }
    }

    #[test]
    fn bar_schema_requires_data_and_documents_defaults() {
        let schema = ChartKind::Bar.input_schema();
        let required: Vec<_> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(required, vec!["data"]);
        assert_eq!(schema["properties"]["width"]["default"], 800);
        assert_eq!(schema["properties"]["outputType"]["default"], "png");
    }

    #[test]
    fn prepare_rejects_wrong_types() {
        let err = ChartKind::Pie
            .prepare(json!({ "data": [{ "category": "A", "value": "ten" }] }))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameters(_)));
        assert!(err.to_string().contains("Invalid chart arguments"));
    }
}
