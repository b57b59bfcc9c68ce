use mcp_error_rs::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{
    ChartBuilder,
    group::{Grouped, has_groups},
};
use crate::schema::{
    AxisTitles, CommonOptions, RenderOptions, ensure_non_empty, num, title_block,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BarDatum {
    #[schemars(description = "Category of the data point, such as 'Category A'.")]
    pub category: String,
    #[schemars(description = "Value of the data point, such as 10.")]
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Group name for multiple series, used for grouping or stacking")]
    pub group: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BarChart {
    #[schemars(
        description = "Data for bar chart, such as, [{ category: 'Category A', value: 10 }, { category: 'Category B', value: 20 }] or [{ category: 'Category A', value: 10, group: 'Group A' }].",
        length(min = 1)
    )]
    pub data: Vec<BarDatum>,

    #[serde(default)]
    #[schemars(
        description = "Whether grouping is enabled. When enabled, bar charts require a 'group' field in the data. When `group` is true, `stack` should be false."
    )]
    pub group: bool,

    #[serde(default)]
    #[schemars(
        description = "Whether stacking is enabled. When enabled, bar charts require a 'group' field in the data. When `stack` is true, `group` should be false."
    )]
    pub stack: bool,

    #[serde(flatten)]
    pub axes: AxisTitles,

    #[serde(flatten)]
    pub common: CommonOptions,
}

impl ChartBuilder for BarChart {
    const NAME: &'static str = "generate_bar_chart";
    const DESCRIPTION: &'static str = "Generate a bar chart to show data for numerical comparisons among different categories, such as, comparing categorical data and for horizontal comparisons.";

    fn validate(&self) -> Result<()> {
        self.common.validate()?;
        ensure_non_empty(&self.data, "Bar chart data cannot be empty.")
    }

    fn build(&self) -> Result<Value> {
        let multi = (self.group || self.stack)
            && has_groups(self.data.iter().map(|d| d.group.as_deref()));

        let (categories, series) = if multi {
            let grouped = Grouped::split(
                self.data
                    .iter()
                    .map(|d| (d.group.as_deref(), d.category.as_str(), d.value)),
            );
            let series: Vec<Value> = grouped
                .groups
                .iter()
                .map(|(name, values)| {
                    let data: Vec<Value> = grouped
                        .categories
                        .iter()
                        .map(|c| values.get(c).map_or(json!(0), |v| num(*v)))
                        .collect();
                    let mut series = json!({ "data": data, "name": name, "type": "bar" });
                    if self.stack {
                        series["stack"] = json!("Total");
                    }
                    series
                })
                .collect();
            (grouped.categories, series)
        } else {
            let categories = self.data.iter().map(|d| d.category.clone()).collect();
            let data: Vec<Value> = self.data.iter().map(|d| num(d.value)).collect();
            (categories, vec![json!({ "data": data, "type": "bar" })])
        };

        let mut option = json!({
            "series": series,
            "title": title_block(self.common.title.as_deref()),
            "tooltip": { "trigger": "axis" },
            "xAxis": {
                "data": categories,
                "name": self.axes.axis_x_title,
                "type": "category",
            },
            "yAxis": {
                "name": self.axes.axis_y_title,
                "type": "value",
            },
        });
        if multi {
            option["legend"] = json!({ "left": "center", "orient": "horizontal", "bottom": 10 });
        }
        Ok(option)
    }

    fn render_options(&self) -> RenderOptions {
        self.common.render_options()
    }
}
