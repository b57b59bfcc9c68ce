use mcp_error_rs::Result;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ChartBuilder, hierarchy::ValuedNode};
use crate::schema::{CommonOptions, RenderOptions, ensure_non_empty, title_block};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TreemapChart {
    #[schemars(
        description = "Data for treemap chart, such as, [{ name: 'Design', value: 70, children: [{ name: 'Tech', value: 20 }] }].",
        length(min = 1)
    )]
    pub data: Vec<ValuedNode>,

    #[serde(flatten)]
    pub common: CommonOptions,
}

impl ChartBuilder for TreemapChart {
    const NAME: &'static str = "generate_treemap_chart";
    const DESCRIPTION: &'static str = "Generate a treemap chart to display hierarchical data and can intuitively show comparisons between items at the same level, such as, show disk space usage with treemap.";

    fn validate(&self) -> Result<()> {
        self.common.validate()?;
        ensure_non_empty(&self.data, "Treemap chart data cannot be empty.")
    }

    fn build(&self) -> Result<Value> {
        let data: Vec<Value> = self.data.iter().map(ValuedNode::to_option).collect();

        Ok(json!({
            "series": [{
                "type": "treemap",
                "data": data,
                "left": "3%",
                "right": "3%",
                "bottom": "3%",
                "label": { "show": true, "formatter": "{b}", "fontSize": 12, "color": "#fff" },
                "emphasis": {
                    "focus": "descendant",
                    "itemStyle": { "borderWidth": 3 },
                    "label": { "fontSize": 16 },
                },
                "breadcrumb": { "show": false },
                "roam": false,
                "nodeClick": "zoomToNode",
            }],
            "title": title_block(self.common.title.as_deref()),
            "tooltip": { "trigger": "item" },
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
    fn passes_the_hierarchy_through() {
        let data = json!([{ "name": "Design", "value": 70, "children": [{ "name": "Tech", "value": 20 }] }]);
        let chart: TreemapChart = serde_json::from_value(json!({ "data": data })).unwrap();
        let option = chart.build().unwrap();

        assert_eq!(option["series"][0]["data"], data);
        assert_eq!(option["series"][0]["nodeClick"], "zoomToNode");
    }
}
