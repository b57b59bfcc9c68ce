use mcp_error_rs::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::ChartBuilder;
use crate::schema::{CommonOptions, RenderOptions, ensure_non_empty, num, title_block};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SankeyLink {
    #[schemars(description = "Source node name, such as 'Landing Page'.")]
    pub source: String,
    #[schemars(description = "Target node name, such as 'Product Page'.")]
    pub target: String,
    #[schemars(description = "Flow value between source and target, such as 50000.")]
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NodeAlign {
    Left,
    Right,
    #[default]
    Justify,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SankeyChart {
    #[schemars(
        description = "Data for sankey chart, such as, [{ source: 'Landing Page', target: 'Product Page', value: 50000 }, { source: 'Product Page', target: 'Add to Cart', value: 35000 }].",
        length(min = 1)
    )]
    pub data: Vec<SankeyLink>,

    #[serde(default)]
    #[schemars(
        description = "Alignment of nodes in the sankey chart, such as, 'left', 'right', or 'justify'."
    )]
    pub node_align: NodeAlign,

    #[serde(flatten)]
    pub common: CommonOptions,
}

impl ChartBuilder for SankeyChart {
    const NAME: &'static str = "generate_sankey_chart";
    const DESCRIPTION: &'static str = "Generate a sankey chart to visualize the flow of data between different stages or categories, such as, the user journey from landing on a page to completing a purchase.";

    fn validate(&self) -> Result<()> {
        self.common.validate()?;
        ensure_non_empty(&self.data, "Sankey chart data cannot be empty.")
    }

    fn build(&self) -> Result<Value> {
        // Nodes in first-seen order, sources before targets.
        let mut names: Vec<&str> = Vec::new();
        for link in &self.data {
            for name in [link.source.as_str(), link.target.as_str()] {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        let nodes: Vec<Value> = names.iter().map(|name| json!({ "name": name })).collect();
        let links: Vec<Value> = self
            .data
            .iter()
            .map(|l| json!({ "source": l.source, "target": l.target, "value": num(l.value) }))
            .collect();

        Ok(json!({
            "series": [{
                "type": "sankey",
                "data": nodes,
                "links": links,
                "emphasis": { "focus": "adjacency" },
                "nodeAlign": self.node_align,
                "left": "10%",
                "top": "10%",
                "right": "10%",
                "bottom": "10%",
                "label": { "position": "right", "color": "#000" },
                "lineStyle": { "color": "gradient", "curveness": 0.5 },
            }],
            "title": title_block(self.common.title.as_deref()),
            "tooltip": { "trigger": "item", "triggerOn": "mousemove" },
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
    fn nodes_are_deduplicated_in_first_seen_order() {
        let chart: SankeyChart = serde_json::from_value(json!({
            "data": [
                { "source": "Landing", "target": "Product", "value": 50000 },
                { "source": "Product", "target": "Cart", "value": 35000 },
            ],
        }))
        .unwrap();
        let option = chart.build().unwrap();
        let series = &option["series"][0];

        assert_eq!(
            series["data"],
            json!([{ "name": "Landing" }, { "name": "Product" }, { "name": "Cart" }])
        );
        assert_eq!(series["links"][1]["value"], 35000);
        assert_eq!(series["nodeAlign"], "justify");
    }

    #[test]
    fn rejects_unknown_alignment() {
        let parsed = serde_json::from_value::<SankeyChart>(json!({
            "nodeAlign": "center",
            "data": [{ "source": "a", "target": "b", "value": 1 }],
        }));
        assert!(parsed.is_err());
    }
}
