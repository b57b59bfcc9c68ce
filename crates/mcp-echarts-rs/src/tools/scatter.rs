use mcp_error_rs::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::ChartBuilder;
use crate::schema::{
    AxisTitles, CommonOptions, RenderOptions, ensure_non_empty, num, title_block,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScatterPoint {
    #[schemars(description = "X coordinate value of the data point.")]
    pub x: f64,
    #[schemars(description = "Y coordinate value of the data point.")]
    pub y: f64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ScatterChart {
    #[schemars(
        description = "Data for scatter chart, such as, [{ x: 10, y: 15 }, { x: 20, y: 25 }].",
        length(min = 1)
    )]
    pub data: Vec<ScatterPoint>,

    #[serde(flatten)]
    pub axes: AxisTitles,

    #[serde(flatten)]
    pub common: CommonOptions,
}

impl ChartBuilder for ScatterChart {
    const NAME: &'static str = "generate_scatter_chart";
    const DESCRIPTION: &'static str = "Generate a scatter chart to show the relationship between two variables, helps discover their relationship or trends, such as, the strength of correlation, data distribution patterns.";

    fn validate(&self) -> Result<()> {
        self.common.validate()?;
        ensure_non_empty(&self.data, "Scatter chart data cannot be empty.")
    }

    fn build(&self) -> Result<Value> {
        let data: Vec<Value> = self
            .data
            .iter()
            .map(|p| json!([num(p.x), num(p.y)]))
            .collect();

        Ok(json!({
            "series": [{
                "data": data,
                "type": "scatter",
                "symbolSize": 8,
                "emphasis": {
                    "focus": "series",
                    "itemStyle": {
                        "shadowBlur": 10,
                        "shadowOffsetX": 0,
                        "shadowColor": "rgba(0, 0, 0, 0.5)",
                    },
                },
            }],
            "title": title_block(self.common.title.as_deref()),
            "tooltip": { "trigger": "item" },
            "xAxis": { "name": self.axes.axis_x_title, "type": "value", "scale": true },
            "yAxis": { "name": self.axes.axis_y_title, "type": "value", "scale": true },
        }))
    }

    fn render_options(&self) -> RenderOptions {
        self.common.render_options()
    }
}
