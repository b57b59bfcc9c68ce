use std::{collections::HashMap, fmt};

use mcp_error_rs::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::ChartBuilder;
use crate::schema::{
    AxisTitles, CommonOptions, RenderOptions, ensure_non_empty, num, num_label, title_block,
};

/// A heatmap axis label, given either as text (`"Mon"`) or as a number (`0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AxisValue {
    Number(f64),
    Text(String),
}

impl AxisValue {
    fn to_option(&self) -> Value {
        match self {
            AxisValue::Number(n) => num(*n),
            AxisValue::Text(s) => json!(s),
        }
    }
}

impl fmt::Display for AxisValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisValue::Number(n) => f.write_str(&num_label(*n)),
            AxisValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HeatCell {
    #[schemars(description = "X axis value, such as 'Mon' or 0.")]
    pub x: AxisValue,
    #[schemars(description = "Y axis value, such as 'AM' or 0.")]
    pub y: AxisValue,
    #[schemars(description = "Heat value at this position, such as 5.")]
    pub value: f64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct HeatmapChart {
    #[schemars(
        description = "Data for heatmap chart, such as, [{ x: 'Mon', y: '12AM', value: 5 }, { x: 'Tue', y: '1AM', value: 3 }].",
        length(min = 1)
    )]
    pub data: Vec<HeatCell>,

    #[serde(flatten)]
    pub axes: AxisTitles,

    #[serde(flatten)]
    pub common: CommonOptions,
}

/// Distinct values in label order, the way a default lexicographic sort
/// orders mixed text and numbers.
fn sorted_distinct<'a>(values: impl Iterator<Item = &'a AxisValue>) -> Vec<&'a AxisValue> {
    let mut distinct: Vec<&AxisValue> = Vec::new();
    for value in values {
        if !distinct.contains(&value) {
            distinct.push(value);
        }
    }
    distinct.sort_by_cached_key(|v| v.to_string());
    distinct
}

const HEAT_COLORS: [&str; 11] = [
    "#313695", "#4575b4", "#74add1", "#abd9e9", "#e0f3f8", "#ffffcc", "#fee090", "#fdae61",
    "#f46d43", "#d73027", "#a50026",
];

impl ChartBuilder for HeatmapChart {
    const NAME: &'static str = "generate_heatmap_chart";
    const DESCRIPTION: &'static str = "Generate a heatmap chart to display data density or intensity distribution, such as, user activity patterns by time and day, or correlation matrix.";

    fn validate(&self) -> Result<()> {
        self.common.validate()?;
        ensure_non_empty(&self.data, "Heatmap chart data cannot be empty.")
    }

    fn build(&self) -> Result<Value> {
        let xs = sorted_distinct(self.data.iter().map(|c| &c.x));
        let ys = sorted_distinct(self.data.iter().map(|c| &c.y));

        let cells: HashMap<(String, String), f64> = self
            .data
            .iter()
            .map(|c| ((c.x.to_string(), c.y.to_string()), c.value))
            .collect();

        // Full grid; absent cells read as zero.
        let mut grid = Vec::with_capacity(xs.len() * ys.len());
        for (i, x) in xs.iter().enumerate() {
            for (j, y) in ys.iter().enumerate() {
                let value = cells
                    .get(&(x.to_string(), y.to_string()))
                    .copied()
                    .unwrap_or(0.0);
                grid.push(json!([i, j, num(value)]));
            }
        }

        let (min, max) = self
            .data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
                (lo.min(c.value), hi.max(c.value))
            });

        let mut title = title_block(self.common.title.as_deref());
        title["top"] = json!("3%");

        Ok(json!({
            "grid": { "height": "60%", "top": "15%", "right": "15%", "bottom": "10%" },
            "series": [{
                "type": "heatmap",
                "data": grid,
                "label": { "show": true, "fontSize": 10 },
                "emphasis": {
                    "itemStyle": { "shadowBlur": 10, "shadowColor": "rgba(0, 0, 0, 0.5)" },
                },
            }],
            "title": title,
            "tooltip": { "position": "top" },
            "visualMap": {
                "min": num(min),
                "max": num(max),
                "calculable": true,
                "orient": "horizontal",
                "left": "center",
                "bottom": "15%",
                "inRange": { "color": HEAT_COLORS },
            },
            "xAxis": {
                "type": "category",
                "data": xs.iter().map(|v| v.to_option()).collect::<Vec<_>>(),
                "name": self.axes.axis_x_title,
                "splitArea": { "show": true },
            },
            "yAxis": {
                "type": "category",
                "data": ys.iter().map(|v| v.to_option()).collect::<Vec<_>>(),
                "name": self.axes.axis_y_title,
                "splitArea": { "show": true },
            },
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
    fn sparse_input_is_densified_with_zeros() {
        let chart: HeatmapChart = serde_json::from_value(json!({
            "data": [
                { "x": "Mon", "y": "AM", "value": 5 },
                { "x": "Tue", "y": "AM", "value": 3 },
                { "x": "Mon", "y": "PM", "value": 1 },
            ],
        }))
        .unwrap();
        let option = chart.build().unwrap();

        assert_eq!(option["xAxis"]["data"], json!(["Mon", "Tue"]));
        assert_eq!(option["yAxis"]["data"], json!(["AM", "PM"]));
        assert_eq!(
            option["series"][0]["data"],
            json!([[0, 0, 5], [0, 1, 1], [1, 0, 3], [1, 1, 0]])
        );
        assert_eq!(option["visualMap"]["min"], 1);
        assert_eq!(option["visualMap"]["max"], 5);
    }

    #[test]
    fn numeric_axes_sort_by_label() {
        let chart: HeatmapChart = serde_json::from_value(json!({
            "data": [
                { "x": 10, "y": 0, "value": 1 },
                { "x": 9, "y": 0, "value": 2 },
            ],
        }))
        .unwrap();
        let option = chart.build().unwrap();

        assert_eq!(option["xAxis"]["data"], json!([10, 9]));
        assert_eq!(option["series"][0]["data"], json!([[0, 0, 1], [1, 0, 2]]));
    }
}
