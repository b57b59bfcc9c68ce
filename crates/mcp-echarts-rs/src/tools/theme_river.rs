use mcp_error_rs::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::ChartBuilder;
use crate::schema::{CommonOptions, RenderOptions, ensure_non_empty, num, title_block};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RiverPoint {
    #[schemars(description = "Date string, such as '2023-01-01'.")]
    pub date: String,
    #[schemars(description = "Value at this date, such as 100.")]
    pub value: f64,
    #[schemars(description = "Category or series name, such as 'Category A'.")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ThemeRiverChart {
    #[schemars(
        description = "Data for theme river chart, such as, [{ date: '2023-01-01', value: 100, name: 'Category A' }].",
        length(min = 1)
    )]
    pub data: Vec<RiverPoint>,

    #[serde(flatten)]
    pub common: CommonOptions,
}

impl ChartBuilder for ThemeRiverChart {
    const NAME: &'static str = "generate_themeRiver_chart";
    const DESCRIPTION: &'static str = "Generate a theme river chart to show changes in data over time across different categories, such as, showing trends of different topics or categories flowing over time.";

    fn validate(&self) -> Result<()> {
        self.common.validate()?;
        ensure_non_empty(&self.data, "Theme river chart data cannot be empty.")
    }

    fn build(&self) -> Result<Value> {
        let mut names: Vec<&str> = Vec::new();
        for point in &self.data {
            if !names.contains(&point.name.as_str()) {
                names.push(&point.name);
            }
        }
        let triples: Vec<Value> = self
            .data
            .iter()
            .map(|p| json!([p.date, num(p.value), p.name]))
            .collect();

        Ok(json!({
            "legend": { "data": names, "bottom": 10 },
            "series": [{
                "type": "themeRiver",
                "data": triples,
                "emphasis": {
                    "itemStyle": { "shadowBlur": 20, "shadowColor": "rgba(0, 0, 0, 0.8)" },
                },
            }],
            "singleAxis": {
                "top": 50,
                "bottom": 50,
                "axisTick": {},
                "axisLabel": {},
                "type": "time",
                "axisPointer": { "animation": true, "label": { "show": true } },
                "splitLine": { "show": true, "lineStyle": { "type": "dashed", "opacity": 0.2 } },
            },
            "title": title_block(self.common.title.as_deref()),
            "tooltip": { "trigger": "item", "triggerOn": "mousemove" },
        }))
    }

    fn render_options(&self) -> RenderOptions {
        self.common.render_options()
    }
}
