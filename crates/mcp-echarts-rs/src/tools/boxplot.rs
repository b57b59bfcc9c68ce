use std::collections::{BTreeMap, BTreeSet};

use mcp_error_rs::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{
    ChartBuilder,
    group::{group_name, has_groups},
};
use crate::schema::{
    AxisTitles, CommonOptions, RenderOptions, ensure_non_empty, num, title_block,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BoxplotDatum {
    #[schemars(description = "Category of the data point, such as 'Category A'.")]
    pub category: String,
    #[schemars(description = "Value of the data point, such as 10.")]
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Optional group for the data point, used for grouping in the boxplot.")]
    pub group: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BoxplotChart {
    #[schemars(
        description = "Data for boxplot chart, such as, [{ category: 'Category A', value: 10 }, { category: 'Category B', value: 20, group: 'Group A' }].",
        length(min = 1)
    )]
    pub data: Vec<BoxplotDatum>,

    #[serde(flatten)]
    pub axes: AxisTitles,

    #[serde(flatten)]
    pub common: CommonOptions,
}

/// `[min, Q1, median, Q3, max]` with positional quartiles:
/// `Q1 = v[n/4]`, `Q3 = v[3n/4]`, no interpolation. `values` must be sorted.
pub fn boxplot_stats(values: &[f64]) -> [f64; 5] {
    let n = values.len();
    if n == 0 {
        return [f64::NAN; 5];
    }
    let median = if n % 2 == 0 {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    } else {
        values[n / 2]
    };
    [values[0], values[n / 4], median, values[3 * n / 4], values[n - 1]]
}

fn summarize(mut values: Vec<f64>) -> Vec<Value> {
    values.sort_by(f64::total_cmp);
    boxplot_stats(&values).into_iter().map(num).collect()
}

impl ChartBuilder for BoxplotChart {
    const NAME: &'static str = "generate_boxplot_chart";
    const DESCRIPTION: &'static str = "Generate a boxplot chart to show data for statistical summaries among different categories, such as, comparing the distribution of data points across categories.";

    fn validate(&self) -> Result<()> {
        self.common.validate()?;
        ensure_non_empty(&self.data, "Boxplot chart data cannot be empty.")
    }

    fn build(&self) -> Result<Value> {
        let (categories, boxes): (Vec<String>, Vec<Value>) =
            if has_groups(self.data.iter().map(|d| d.group.as_deref())) {
                // One box per (category, group) pair, in first-seen order.
                let mut pairs: Vec<((&str, &str), Vec<f64>)> = Vec::new();
                let mut categories = BTreeSet::new();
                for d in &self.data {
                    let key = (d.category.as_str(), group_name(d.group.as_deref()));
                    match pairs.iter_mut().find(|(k, _)| *k == key) {
                        Some((_, values)) => values.push(d.value),
                        None => pairs.push((key, vec![d.value])),
                    }
                    categories.insert(d.category.clone());
                }
                let boxes = pairs
                    .into_iter()
                    .map(|((category, group), values)| {
                        json!({ "name": format!("{category}-{group}"), "value": summarize(values) })
                    })
                    .collect();
                (categories.into_iter().collect(), boxes)
            } else {
                let mut by_category: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
                for d in &self.data {
                    by_category.entry(d.category.as_str()).or_default().push(d.value);
                }
                let categories = by_category.keys().map(|c| c.to_string()).collect();
                let boxes = by_category
                    .into_iter()
                    .map(|(category, values)| json!({ "name": category, "value": summarize(values) }))
                    .collect();
                (categories, boxes)
            };

        Ok(json!({
            "series": [{
                "type": "boxplot",
                "data": boxes,
                "itemStyle": { "borderWidth": 2 },
                "emphasis": {
                    "itemStyle": {
                        "borderWidth": 3,
                        "shadowBlur": 5,
                        "shadowColor": "rgba(0, 0, 0, 0.3)",
                    },
                },
            }],
            "title": title_block(self.common.title.as_deref()),
            "tooltip": { "trigger": "item" },
            "xAxis": {
                "type": "category",
                "data": categories,
                "name": self.axes.axis_x_title,
                "boundaryGap": true,
                "nameGap": 30,
                "splitArea": { "show": false },
                "splitLine": { "show": false },
            },
            "yAxis": {
                "type": "value",
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
    fn positional_quartiles() {
        assert_eq!(boxplot_stats(&[1.0, 9.0, 13.0, 22.0, 30.0]), [1.0, 9.0, 13.0, 22.0, 30.0]);
        // Even length: median averages the middle pair.
        assert_eq!(boxplot_stats(&[1.0, 2.0, 3.0, 4.0]), [1.0, 2.0, 2.5, 4.0, 4.0]);
        assert_eq!(boxplot_stats(&[7.0]), [7.0; 5]);
    }

    #[test]
    fn categories_sorted_and_values_sorted_before_summary() {
        let chart: BoxplotChart = serde_json::from_value(json!({
            "data": [
                { "category": "B", "value": 30 },
                { "category": "B", "value": 1 },
                { "category": "B", "value": 22 },
                { "category": "B", "value": 9 },
                { "category": "B", "value": 13 },
                { "category": "A", "value": 5 },
            ],
        }))
        .unwrap();
        let option = chart.build().unwrap();

        assert_eq!(option["xAxis"]["data"], json!(["A", "B"]));
        assert_eq!(
            option["series"][0]["data"][1],
            json!({ "name": "B", "value": [1, 9, 13, 22, 30] })
        );
    }

    #[test]
    fn grouped_boxes_are_named_category_dash_group() {
        let chart: BoxplotChart = serde_json::from_value(json!({
            "data": [
                { "category": "Q_1", "value": 3, "group": "east" },
                { "category": "Q_1", "value": 5 },
                { "category": "Q_1", "value": 4, "group": "east" },
            ],
        }))
        .unwrap();
        let option = chart.build().unwrap();
        let boxes = option["series"][0]["data"].as_array().unwrap();

        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0]["name"], "Q_1-east");
        assert_eq!(boxes[0]["value"], json!([3, 3, 3.5, 4, 4]));
        assert_eq!(boxes[1]["name"], "Q_1-Default");
    }
}
