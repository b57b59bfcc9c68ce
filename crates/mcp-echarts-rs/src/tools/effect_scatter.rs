use mcp_error_rs::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::ChartBuilder;
use crate::schema::{
    AxisTitles, CommonOptions, RenderOptions, ensure_non_empty, num, title_block,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RipplePoint {
    pub x: f64,
    pub y: f64,
    #[schemars(description = "Value determines the size and effect intensity.")]
    pub value: f64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EffectScatterChart {
    #[schemars(
        description = "Data for effect scatter chart, such as, [{ x: 10, y: 15, value: 20 }, { x: 20, y: 25, value: 30 }].",
        length(min = 1)
    )]
    pub data: Vec<RipplePoint>,

    #[serde(flatten)]
    pub axes: AxisTitles,

    #[serde(flatten)]
    pub common: CommonOptions,
}

fn value_axis(name: &str) -> Value {
    json!({
        "name": name,
        "type": "value",
        "scale": true,
        "splitLine": { "lineStyle": { "type": "dashed" } },
    })
}

impl ChartBuilder for EffectScatterChart {
    const NAME: &'static str = "generate_effectScatter_chart";
    const DESCRIPTION: &'static str = "Generate an effect scatter chart with ripple animation effects, such as, highlighting important data points or showing dynamic data changes.";

    fn validate(&self) -> Result<()> {
        self.common.validate()?;
        ensure_non_empty(&self.data, "Effect scatter chart data cannot be empty.")
    }

    fn build(&self) -> Result<Value> {
        let points: Vec<Value> = self
            .data
            .iter()
            .map(|p| {
                json!({
                    "value": [num(p.x), num(p.y), num(p.value)],
                    "symbolSize": num(p.value.sqrt() * 5.0),
                })
            })
            .collect();

        Ok(json!({
            "series": [{
                "type": "effectScatter",
                "data": points,
                "showEffectOn": "render",
                "rippleEffect": { "brushType": "stroke" },
                "itemStyle": { "color": "#f4e925", "shadowBlur": 10, "shadowColor": "#333" },
                "emphasis": { "scale": true },
            }],
            "title": title_block(self.common.title.as_deref()),
            "tooltip": { "trigger": "item" },
            "xAxis": value_axis(&self.axes.axis_x_title),
            "yAxis": value_axis(&self.axes.axis_y_title),
        }))
    }

    fn render_options(&self) -> RenderOptions {
        self.common.render_options()
    }
}
