use mcp_error_rs::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::ChartBuilder;
use crate::schema::{CommonOptions, RenderOptions, ensure_non_empty, num, num_label, title_block};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PieSlice {
    #[schemars(description = "Category of the data point, such as 'Category A'.")]
    pub category: String,
    #[schemars(description = "Value of the data point, such as 27.")]
    pub value: f64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PieChart {
    #[schemars(
        description = "Data for pie chart, such as, [{ category: 'Category A', value: 27 }, { category: 'Category B', value: 25 }].",
        length(min = 1)
    )]
    pub data: Vec<PieSlice>,

    #[serde(default)]
    #[schemars(
        description = "Set the innerRadius of pie chart, the value between 0 and 1. Set the pie chart as a donut chart. Set the value to 0.6 or number in [0 ,1] to enable it."
    )]
    pub inner_radius: f64,

    #[serde(flatten)]
    pub common: CommonOptions,
}

impl ChartBuilder for PieChart {
    const NAME: &'static str = "generate_pie_chart";
    const DESCRIPTION: &'static str = "Generate a pie chart to show the proportion of parts, such as, market share and budget allocation.";

    fn validate(&self) -> Result<()> {
        self.common.validate()?;
        ensure_non_empty(&self.data, "Pie chart data cannot be empty.")
    }

    fn build(&self) -> Result<Value> {
        let data: Vec<Value> = self
            .data
            .iter()
            .map(|s| json!({ "name": s.category, "value": num(s.value) }))
            .collect();

        let radius = if self.inner_radius > 0.0 {
            json!([format!("{}%", num_label(self.inner_radius * 100.0)), "70%"])
        } else {
            json!("70%")
        };

        Ok(json!({
            "legend": { "left": "center", "orient": "horizontal", "top": "bottom" },
            "series": [{
                "data": data,
                "radius": radius,
                "type": "pie",
                "emphasis": {
                    "itemStyle": {
                        "shadowBlur": 10,
                        "shadowOffsetX": 0,
                        "shadowColor": "rgba(0, 0, 0, 0.5)",
                    },
                },
            }],
            "title": title_block(self.common.title.as_deref()),
            "tooltip": { "trigger": "item", "formatter": "{a} <br/>{b}: {c} ({d}%)" },
        }))
    }

    fn render_options(&self) -> RenderOptions {
        self.common.render_options()
    }
}
