use std::collections::{BTreeSet, HashMap};

use mcp_error_rs::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{
    ChartBuilder,
    group::{Grouped, has_groups},
};
use crate::schema::{CommonOptions, RenderOptions, ensure_non_empty, num, title_block};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RadarDatum {
    #[schemars(description = "Dimension name, such as 'Design'.")]
    pub name: String,
    #[schemars(description = "Value of the dimension, such as 70.")]
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Group name for multiple series, used for comparing different entities")]
    pub group: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RadarChart {
    #[schemars(
        description = "Data for radar chart, such as, [{ name: 'Design', value: 70 }, { name: 'Performance', value: 85 }] or [{ name: 'Design', value: 70, group: 'iPhone' }].",
        length(min = 1)
    )]
    pub data: Vec<RadarDatum>,

    #[serde(flatten)]
    pub common: CommonOptions,
}

/// One scale for every indicator: 20% headroom over the largest value,
/// rounded up to a multiple of ten.
fn unified_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(f64::NEG_INFINITY, f64::max);
    (max * 1.2 / 10.0).ceil() * 10.0
}

impl ChartBuilder for RadarChart {
    const NAME: &'static str = "generate_radar_chart";
    const DESCRIPTION: &'static str = "Generate a radar chart to display multidimensional data (four dimensions or more), such as, evaluate Huawei and Apple phones in terms of five dimensions: ease of use, functionality, camera, benchmark scores, and battery life.";

    fn validate(&self) -> Result<()> {
        self.common.validate()?;
        ensure_non_empty(&self.data, "Radar chart data cannot be empty.")
    }

    fn build(&self) -> Result<Value> {
        let dimensions: Vec<&str> = self
            .data
            .iter()
            .map(|d| d.name.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let max = num(unified_max(self.data.iter().map(|d| d.value)));
        let indicator: Vec<Value> = dimensions
            .iter()
            .map(|name| json!({ "name": name, "max": max }))
            .collect();

        let fill = |values: &HashMap<String, f64>| -> Vec<Value> {
            dimensions
                .iter()
                .map(|d| values.get(*d).map_or(json!(0), |v| num(*v)))
                .collect()
        };

        let multi = has_groups(self.data.iter().map(|d| d.group.as_deref()));
        let series_data: Vec<Value> = if multi {
            Grouped::split(
                self.data
                    .iter()
                    .map(|d| (d.group.as_deref(), d.name.as_str(), d.value)),
            )
            .groups
            .iter()
            .map(|(name, values)| json!({ "name": name, "value": fill(values) }))
            .collect()
        } else {
            let values: HashMap<String, f64> =
                self.data.iter().map(|d| (d.name.clone(), d.value)).collect();
            let name = match self.common.title.as_deref() {
                Some(title) if !title.is_empty() => title,
                _ => "Data",
            };
            vec![json!({ "value": fill(&values), "name": name })]
        };

        let mut title = title_block(self.common.title.as_deref());
        title["top"] = json!("5%");

        let mut option = json!({
            "radar": {
                "indicator": indicator,
                "radius": "60%",
                "splitNumber": 4,
                "axisName": { "formatter": "{value}", "color": "#666" },
                "splitArea": {
                    "areaStyle": {
                        "color": ["rgba(250, 250, 250, 0.3)", "rgba(200, 200, 200, 0.3)"],
                    },
                },
            },
            "series": [{ "data": series_data, "type": "radar" }],
            "title": title,
            "tooltip": { "trigger": "item" },
        });
        if multi {
            option["legend"] = json!({ "left": "center", "orient": "horizontal", "bottom": "5%" });
        }
        Ok(option)
    }

    fn render_options(&self) -> RenderOptions {
        self.common.render_options()
    }
}
