use mcp_error_rs::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::ChartBuilder;
use crate::schema::{CommonOptions, RenderOptions, ensure_non_empty, num, title_block};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FunnelStage {
    #[schemars(description = "Stage category name, such as 'Browse Website'.")]
    pub category: String,
    #[schemars(description = "Value at this stage, such as 50000.")]
    pub value: f64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FunnelChart {
    #[schemars(
        description = "Data for funnel chart, such as, [{ category: 'Browse Website', value: 50000 }, { category: 'Add to Cart', value: 35000 }, { category: 'Generate Order', value: 25000 }].",
        length(min = 1)
    )]
    pub data: Vec<FunnelStage>,

    #[serde(flatten)]
    pub common: CommonOptions,
}

impl ChartBuilder for FunnelChart {
    const NAME: &'static str = "generate_funnel_chart";
    const DESCRIPTION: &'static str = "Generate a funnel chart to visualize the progressive reduction of data as it passes through stages, such as, the conversion rates of users from visiting a website to completing a purchase.";

    fn validate(&self) -> Result<()> {
        self.common.validate()?;
        ensure_non_empty(&self.data, "Funnel chart data cannot be empty.")
    }

    fn build(&self) -> Result<Value> {
        let data: Vec<Value> = self
            .data
            .iter()
            .map(|s| json!({ "name": s.category, "value": num(s.value) }))
            .collect();
        let names: Vec<&str> = self.data.iter().map(|s| s.category.as_str()).collect();
        let max = self
            .data
            .iter()
            .map(|s| s.value)
            .fold(f64::NEG_INFINITY, f64::max);

        Ok(json!({
            "series": [{
                "type": "funnel",
                "data": data,
                "left": "10%",
                "top": 60,
                "width": "80%",
                "height": "80%",
                "min": 0,
                "max": num(max),
                "minSize": "0%",
                "maxSize": "100%",
                "sort": "descending",
                "gap": 2,
                "label": { "show": true, "position": "inside", "fontSize": 12, "color": "#fff" },
                "labelLine": { "length": 10, "lineStyle": { "width": 1, "type": "solid" } },
                "itemStyle": { "borderColor": "#fff", "borderWidth": 1 },
                "emphasis": { "label": { "fontSize": 16 } },
            }],
            "title": title_block(self.common.title.as_deref()),
            "tooltip": { "trigger": "item" },
            "legend": {
                "left": "center",
                "orient": "horizontal",
                "bottom": 10,
                "data": names,
            },
        }))
    }

    fn render_options(&self) -> RenderOptions {
        self.common.render_options()
    }
}
