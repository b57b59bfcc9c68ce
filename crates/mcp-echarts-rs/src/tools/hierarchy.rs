//! Self-similar node types for the hierarchical charts.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::schema::num;

/// A treemap or sunburst node; every level carries a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValuedNode {
    #[schemars(description = "Node name, such as 'Design'.")]
    pub name: String,
    #[schemars(description = "Node value, such as 70.")]
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Child nodes for hierarchical structure.")]
    pub children: Option<Vec<ValuedNode>>,
}

impl ValuedNode {
    pub fn to_option(&self) -> Value {
        let mut node = json!({ "name": self.name, "value": num(self.value) });
        if let Some(children) = &self.children {
            node["children"] = children.iter().map(Self::to_option).collect();
        }
        node
    }
}

/// A tree-chart node; the value is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TreeNode {
    #[schemars(description = "Node name, such as 'Root'.")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Node value (optional).")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Child nodes for hierarchical structure.")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    pub fn to_option(&self) -> Value {
        let mut node = json!({ "name": self.name });
        if let Some(value) = self.value {
            node["value"] = num(value);
        }
        if let Some(children) = &self.children {
            node["children"] = children.iter().map(Self::to_option).collect();
        }
        node
    }
}
