use mcp_error_rs::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{ChartBuilder, hierarchy::TreeNode};
use crate::schema::{CommonOptions, RenderOptions, title_block};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TreeLayout {
    #[default]
    Orthogonal,
    Radial,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum TreeOrient {
    #[default]
    LR,
    RL,
    TB,
    BT,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TreeChart {
    #[schemars(
        description = "Tree data structure, such as, { name: 'Root', children: [{ name: 'Child 1' }, { name: 'Child 2' }] }."
    )]
    pub data: TreeNode,

    #[serde(default)]
    #[schemars(description = "Tree layout type. Default is 'orthogonal'.")]
    pub layout: TreeLayout,

    #[serde(default)]
    #[schemars(
        description = "Tree orientation. LR=left-to-right, RL=right-to-left, TB=top-to-bottom, BT=bottom-to-top. Default is 'LR'."
    )]
    pub orient: TreeOrient,

    #[serde(flatten)]
    pub common: CommonOptions,
}

impl TreeChart {
    /// Label `(position, align)` so text sits beside nodes, away from the edges.
    fn label_placement(&self) -> (&'static str, &'static str) {
        if self.layout == TreeLayout::Radial {
            return ("top", "center");
        }
        match self.orient {
            TreeOrient::LR => ("right", "left"),
            TreeOrient::RL => ("left", "right"),
            TreeOrient::TB => ("bottom", "center"),
            TreeOrient::BT => ("top", "center"),
        }
    }
}

impl ChartBuilder for TreeChart {
    const NAME: &'static str = "generate_tree_chart";
    const DESCRIPTION: &'static str = "Generate a tree chart to display hierarchical data structure, such as, organizational chart, family tree, or file directory structure.";

    fn validate(&self) -> Result<()> {
        self.common.validate()
    }

    fn build(&self) -> Result<Value> {
        let (position, align) = self.label_placement();

        Ok(json!({
            "series": [{
                "type": "tree",
                "data": [self.data.to_option()],
                "layout": self.layout,
                "orient": self.orient,
                "symbol": "emptyCircle",
                "symbolSize": 7,
                "initialTreeDepth": -1,
                "itemStyle": { "color": "#4154f3", "borderWidth": 2 },
                "lineStyle": { "color": "#ccc", "width": 1.5, "curveness": 0.5 },
                "label": {
                    "position": position,
                    "verticalAlign": "middle",
                    "align": align,
                    "fontSize": 12,
                },
                "leaves": {
                    "label": {
                        "position": position,
                        "verticalAlign": "middle",
                        "align": align,
                    },
                },
                "emphasis": { "focus": "descendant" },
                "expandAndCollapse": true,
                "animationDuration": 550,
                "animationDurationUpdate": 750,
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

    fn chart(args: Value) -> TreeChart {
        serde_json::from_value(args).unwrap()
    }

    #[test]
    fn labels_follow_orientation() {
        let option = chart(json!({
            "orient": "RL",
            "data": { "name": "Root", "children": [{ "name": "A" }] },
        }))
        .build()
        .unwrap();
        let series = &option["series"][0];

        assert_eq!(series["orient"], "RL");
        assert_eq!(series["layout"], "orthogonal");
        assert_eq!(series["label"]["position"], "left");
        assert_eq!(series["leaves"]["label"]["align"], "right");
        assert_eq!(
            series["data"],
            json!([{ "name": "Root", "children": [{ "name": "A" }] }])
        );
    }

    #[test]
    fn radial_layout_centers_labels() {
        let option = chart(json!({ "layout": "radial", "orient": "TB", "data": { "name": "Root" } }))
            .build()
            .unwrap();
        assert_eq!(option["series"][0]["label"]["position"], "top");
        assert_eq!(option["series"][0]["label"]["align"], "center");
    }

    #[test]
    fn data_must_be_a_single_root() {
        let parsed = serde_json::from_value::<TreeChart>(json!({ "data": [{ "name": "Root" }] }));
        assert!(parsed.is_err());
    }
}
