use mcp_error_rs::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::ChartBuilder;
use crate::schema::{
    AxisTitles, CommonOptions, RenderOptions, ensure_non_empty, num, title_block,
};

const DEFAULT_SYMBOL: &str = "rect";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PictorialDatum {
    pub category: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Symbol for this bar, such as 'circle', 'rect', 'triangle'. Default is 'rect'.")]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PictorialBarChart {
    #[schemars(
        description = "Data for pictorial bar chart, such as, [{ category: 'A', value: 10, symbol: 'circle' }].",
        length(min = 1)
    )]
    pub data: Vec<PictorialDatum>,

    #[serde(flatten)]
    pub axes: AxisTitles,

    #[serde(flatten)]
    pub common: CommonOptions,
}

impl ChartBuilder for PictorialBarChart {
    const NAME: &'static str = "generate_pictorialBar_chart";
    const DESCRIPTION: &'static str = "Generate a pictorial bar chart to display data using custom symbols and shapes, such as, visualizing data with icons or custom graphics.";

    fn validate(&self) -> Result<()> {
        self.common.validate()?;
        ensure_non_empty(&self.data, "Pictorial bar chart data cannot be empty.")
    }

    fn build(&self) -> Result<Value> {
        let categories: Vec<&str> = self.data.iter().map(|d| d.category.as_str()).collect();
        let bars: Vec<Value> = self
            .data
            .iter()
            .map(|d| {
                // An empty symbol falls back too.
                let symbol = d.symbol.as_deref().filter(|s| !s.is_empty()).unwrap_or(DEFAULT_SYMBOL);
                json!({
                    "value": num(d.value),
                    "symbol": symbol,
                    "symbolSize": ["100%", "100%"],
                    "symbolPosition": "start",
                    "symbolOffset": [0, 0],
                })
            })
            .collect();

        Ok(json!({
            "grid": { "left": "3%", "right": "4%", "bottom": "3%", "containLabel": true },
            "series": [{
                "type": "pictorialBar",
                "data": bars,
                "barWidth": "60%",
                "itemStyle": { "color": "#4a90e2" },
                "emphasis": { "itemStyle": { "opacity": 0.8 } },
                "animationEasing": "elasticOut",
            }],
            "title": title_block(self.common.title.as_deref()),
            "tooltip": { "trigger": "item" },
            "xAxis": {
                "type": "category",
                "data": categories,
                "name": self.axes.axis_x_title,
                "axisLine": { "show": true, "lineStyle": { "color": "#999" } },
                "axisTick": { "show": false },
            },
            "yAxis": {
                "type": "value",
                "name": self.axes.axis_y_title,
                "axisLine": { "show": false },
                "axisTick": { "show": false },
                "splitLine": { "lineStyle": { "color": "#e6e6e6", "type": "dashed" } },
            },
        }))
    }

    fn render_options(&self) -> RenderOptions {
        self.common.render_options()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_default_to_rect() {
        let chart: PictorialBarChart = serde_json::from_value(json!({
            "data": [
                { "category": "Cups", "value": 10, "symbol": "circle" },
                { "category": "Plates", "value": 4.5 },
            ],
        }))
        .unwrap();
        let option = chart.build().unwrap();
        let bars = &option["series"][0]["data"];

        assert_eq!(option["xAxis"]["data"], json!(["Cups", "Plates"]));
        assert_eq!(bars[0]["symbol"], "circle");
        assert_eq!(bars[1]["symbol"], DEFAULT_SYMBOL);
        assert_eq!(bars[1]["value"], 4.5);
        assert_eq!(bars[1]["symbolSize"], json!(["100%", "100%"]));
    }

    #[test]
    fn empty_data_is_rejected() {
        let chart: PictorialBarChart = serde_json::from_value(json!({ "data": [] })).unwrap();
        let err = chart.validate().unwrap_err();
        assert!(err.to_string().contains("Pictorial bar chart data cannot be empty."));
    }
}
