use mcp_error_rs::Result;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ChartBuilder, hierarchy::ValuedNode};
use crate::schema::{CommonOptions, RenderOptions, ensure_non_empty, title_block};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SunburstChart {
    #[schemars(
        description = "Data for sunburst chart, such as, [{ name: 'Technology', value: 100, children: [{ name: 'Frontend', value: 60, children: [{ name: 'React', value: 30 }] }] }].",
        length(min = 1)
    )]
    pub data: Vec<ValuedNode>,

    #[serde(flatten)]
    pub common: CommonOptions,
}

impl ChartBuilder for SunburstChart {
    const NAME: &'static str = "generate_sunburst_chart";
    const DESCRIPTION: &'static str = "Generate a sunburst chart to display multi-level hierarchical data, such as, organizational structure, file system hierarchy, or category breakdown.";

    fn validate(&self) -> Result<()> {
        self.common.validate()?;
        ensure_non_empty(&self.data, "Sunburst chart data cannot be empty.")
    }

    fn build(&self) -> Result<Value> {
        let data: Vec<Value> = self.data.iter().map(ValuedNode::to_option).collect();

        Ok(json!({
            "series": [{
                "type": "sunburst",
                "data": data,
                "radius": [0, "90%"],
                "center": ["50%", "50%"],
                "emphasis": { "focus": "ancestor" },
                "label": { "show": true, "fontSize": 12, "color": "#000", "minAngle": 10 },
                "itemStyle": { "borderRadius": 7, "borderWidth": 2, "borderColor": "#fff" },
                "levels": [
                    {},
                    {
                        "r0": "15%",
                        "r": "35%",
                        "itemStyle": { "borderWidth": 2 },
                        "label": { "rotate": "tangential" },
                    },
                    {
                        "r0": "35%",
                        "r": "70%",
                        "label": { "align": "right" },
                    },
                    {
                        "r0": "70%",
                        "r": "72%",
                        "label": { "position": "outside", "padding": 3, "silent": false },
                        "itemStyle": { "borderWidth": 3 },
                    },
                ],
            }],
            "title": title_block(self.common.title.as_deref()),
            "tooltip": { "trigger": "item" },
        }))
    }

    fn render_options(&self) -> RenderOptions {
        self.common.render_options()
    }
}
