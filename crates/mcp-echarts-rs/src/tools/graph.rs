use std::collections::HashSet;

use mcp_error_rs::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::ChartBuilder;
use crate::schema::{CommonOptions, RenderOptions, ensure_non_empty, num, title_block};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GraphNode {
    #[schemars(description = "Unique identifier for the node.")]
    pub id: String,
    #[schemars(description = "Display name of the node.")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Value associated with the node (affects size).")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Category of the node (affects color).")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GraphEdge {
    #[schemars(description = "Source node id.")]
    pub source: String,
    #[schemars(description = "Target node id.")]
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Weight or value of the edge.")]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GraphData {
    #[schemars(description = "Array of nodes in the network.", length(min = 1))]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    #[schemars(description = "Array of edges connecting nodes.")]
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum GraphLayout {
    #[default]
    Force,
    Circular,
    None,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GraphChart {
    #[schemars(
        description = "Data for network graph chart, such as, { nodes: [{ id: 'node1', name: 'Node 1' }], edges: [{ source: 'node1', target: 'node2' }] }"
    )]
    pub data: GraphData,

    #[serde(default)]
    #[schemars(description = "Layout algorithm for the graph. Default is 'force'.")]
    pub layout: GraphLayout,

    #[serde(flatten)]
    pub common: CommonOptions,
}

impl GraphNode {
    fn to_option(&self) -> Value {
        // Zero and missing values both get the default size.
        let size = match self.value {
            Some(v) if v != 0.0 && !v.is_nan() => v.sqrt() * 10.0,
            _ => 20.0,
        };
        let mut node = json!({ "id": self.id, "name": self.name, "symbolSize": num(size) });
        if let Some(category) = &self.category {
            node["category"] = json!(category);
        }
        if let Some(value) = self.value {
            node["value"] = num(value);
        }
        node
    }
}

impl ChartBuilder for GraphChart {
    const NAME: &'static str = "generate_graph_chart";
    const DESCRIPTION: &'static str = "Generate a network graph chart to show relationships (edges) between entities (nodes), such as, relationships between people in social networks.";

    fn validate(&self) -> Result<()> {
        self.common.validate()?;
        ensure_non_empty(&self.data.nodes, "At least one node is required.")
    }

    fn build(&self) -> Result<Value> {
        let ids: HashSet<&str> = self.data.nodes.iter().map(|n| n.id.as_str()).collect();
        let links: Vec<Value> = self
            .data
            .edges
            .iter()
            .filter(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()))
            .map(|e| {
                let mut link = json!({ "source": e.source, "target": e.target });
                if let Some(value) = e.value {
                    link["value"] = num(value);
                }
                link
            })
            .collect();

        let mut categories: Vec<&str> = Vec::new();
        for category in self.data.nodes.iter().filter_map(|n| n.category.as_deref()) {
            if !category.is_empty() && !categories.contains(&category) {
                categories.push(category);
            }
        }

        let nodes: Vec<Value> = self.data.nodes.iter().map(GraphNode::to_option).collect();
        let mut series = json!({
            "type": "graph",
            "data": nodes,
            "links": links,
            "categories": categories.iter().map(|c| json!({ "name": c })).collect::<Vec<_>>(),
            "roam": true,
            "layout": self.layout,
            "label": { "show": true, "position": "right", "formatter": "{b}" },
            "lineStyle": { "color": "source", "curveness": 0.3 },
            "emphasis": { "focus": "adjacency", "label": { "fontSize": 16 } },
        });
        if self.layout == GraphLayout::Force {
            series["force"] = json!({
                "repulsion": 100,
                "gravity": 0.02,
                "edgeLength": 150,
                "layoutAnimation": true,
            });
        }

        let mut option = json!({
            "series": [series],
            "title": title_block(self.common.title.as_deref()),
            "tooltip": { "trigger": "item" },
        });
        if !categories.is_empty() {
            option["legend"] = json!({
                "left": "center",
                "orient": "horizontal",
                "bottom": 10,
                "data": categories,
            });
        }
        Ok(option)
    }

    fn render_options(&self) -> RenderOptions {
        self.common.render_options()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(args: Value) -> GraphChart {
        serde_json::from_value(args).unwrap()
    }

    #[test]
    fn edges_to_unknown_nodes_are_dropped() {
        let option = chart(json!({
            "data": {
                "nodes": [
                    { "id": "a", "name": "A", "value": 9, "category": "team" },
                    { "id": "b", "name": "B" },
                ],
                "edges": [
                    { "source": "a", "target": "b", "value": 2 },
                    { "source": "a", "target": "ghost" },
                ],
            },
        }))
        .build()
        .unwrap();
        let series = &option["series"][0];

        assert_eq!(series["data"].as_array().unwrap().len(), 2);
        assert_eq!(series["links"], json!([{ "source": "a", "target": "b", "value": 2 }]));
        assert_eq!(series["data"][0]["symbolSize"], 30);
        assert_eq!(series["data"][1], json!({ "id": "b", "name": "B", "symbolSize": 20 }));
        assert_eq!(series["categories"], json!([{ "name": "team" }]));
        assert_eq!(option["legend"]["data"], json!(["team"]));
        assert_eq!(series["force"]["repulsion"], 100);
    }

    #[test]
    fn circular_layout_has_no_force_block_or_legend() {
        let option = chart(json!({
            "layout": "circular",
            "data": { "nodes": [{ "id": "a", "name": "A", "value": 0 }] },
        }))
        .build()
        .unwrap();

        assert!(option["series"][0].get("force").is_none());
        assert!(option.get("legend").is_none());
        assert_eq!(option["series"][0]["data"][0]["value"], 0);
    }

    #[test]
    fn nodes_are_required() {
        let err = chart(json!({ "data": { "nodes": [] } })).validate().unwrap_err();
        assert!(err.to_string().contains("At least one node is required."));
    }
}
