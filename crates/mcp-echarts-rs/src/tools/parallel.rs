use mcp_error_rs::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::ChartBuilder;
use crate::schema::{CommonOptions, RenderOptions, ensure_non_empty, num, title_block};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ParallelLine {
    #[schemars(description = "Name or identifier for this data series.")]
    pub name: String,
    #[schemars(description = "Array of values for each dimension.")]
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ParallelChart {
    #[schemars(
        description = "Data for parallel chart, such as, [{ name: 'Product A', values: [4.2, 3.4, 2.3, 1.8] }].",
        length(min = 1)
    )]
    pub data: Vec<ParallelLine>,

    #[schemars(
        description = "Names of the dimensions/axes, such as, ['Price', 'Quality', 'Service', 'Value'].",
        length(min = 1)
    )]
    pub dimensions: Vec<String>,

    #[serde(flatten)]
    pub common: CommonOptions,
}

impl ParallelChart {
    /// One axis per dimension, padded by a tenth of the observed range on
    /// both ends. A dimension no line reaches gets no bounds.
    fn axes(&self) -> Vec<Value> {
        self.dimensions
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let mut axis = json!({ "dim": index, "name": name, "nameLocation": "start" });
                let values = self.data.iter().filter_map(|line| line.values.get(index));
                if let Some((min, max)) = values.fold(None, |acc: Option<(f64, f64)>, &v| {
                    Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
                }) {
                    let pad = (max - min) * 0.1;
                    axis["min"] = num(min - pad);
                    axis["max"] = num(max + pad);
                }
                axis
            })
            .collect()
    }
}

impl ChartBuilder for ParallelChart {
    const NAME: &'static str = "generate_parallel_chart";
    const DESCRIPTION: &'static str = "Generate a parallel coordinates chart to display multi-dimensional data, such as, comparing different products across multiple attributes.";

    fn validate(&self) -> Result<()> {
        self.common.validate()?;
        ensure_non_empty(&self.data, "Parallel chart data cannot be empty.")?;
        ensure_non_empty(&self.dimensions, "At least one dimension is required.")
    }

    fn build(&self) -> Result<Value> {
        let series: Vec<Value> = self
            .data
            .iter()
            .map(|line| {
                let values: Vec<Value> = line.values.iter().copied().map(num).collect();
                json!({
                    "name": line.name,
                    "type": "parallel",
                    "data": [{ "name": line.name, "value": values }],
                    "lineStyle": { "width": 2, "opacity": 0.7 },
                    "emphasis": { "lineStyle": { "width": 4, "opacity": 1 } },
                    "smooth": true,
                })
            })
            .collect();
        let names: Vec<&str> = self.data.iter().map(|line| line.name.as_str()).collect();

        Ok(json!({
            "parallelAxis": self.axes(),
            "parallel": {
                "left": "5%",
                "right": "13%",
                "bottom": "20%",
                "top": "15%",
                "parallelAxisDefault": {
                    "type": "value",
                    "nameLocation": "end",
                    "nameGap": 20,
                    "nameTextStyle": { "fontSize": 12 },
                    "axisLine": { "lineStyle": { "color": "#aaa" } },
                    "axisTick": { "lineStyle": { "color": "#777" } },
                    "splitLine": { "show": false },
                    "axisLabel": { "color": "#999" },
                },
            },
            "series": series,
            "title": title_block(self.common.title.as_deref()),
            "tooltip": { "trigger": "item" },
            "legend": { "bottom": 30, "data": names },
        }))
    }

    fn render_options(&self) -> RenderOptions {
        self.common.render_options()
    }
}
