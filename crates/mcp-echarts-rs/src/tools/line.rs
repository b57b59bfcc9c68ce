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
pub struct LinePoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Group name for multiple series, required when stack is enabled")]
    pub group: Option<String>,
    pub time: String,
    pub value: f64,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineChart {
    #[schemars(
        description = "Data for line chart, such as, [{ time: '2015', value: 23 }, { time: '2016', value: 32 }]. For multiple series: [{ group: 'Series A', time: '2015', value: 23 }, { group: 'Series B', time: '2015', value: 18 }].",
        length(min = 1)
    )]
    pub data: Vec<LinePoint>,

    #[serde(default)]
    #[schemars(description = "Whether to fill the area under the line. Default is false.")]
    pub show_area: bool,

    #[serde(default = "default_true")]
    #[schemars(description = "Whether to show symbols on data points. Default is true.")]
    pub show_symbol: bool,

    #[serde(default)]
    #[schemars(description = "Whether to use a smooth curve. Default is false.")]
    pub smooth: bool,

    #[serde(default)]
    #[schemars(
        description = "Whether stacking is enabled. When enabled, line charts require a 'group' field in the data."
    )]
    pub stack: bool,

    #[serde(flatten)]
    pub axes: AxisTitles,

    #[serde(flatten)]
    pub common: CommonOptions,
}

impl LineChart {
    fn series(&self, data: Vec<Value>, name: Option<&str>) -> Value {
        let mut series = json!({
            "data": data,
            "showSymbol": self.show_symbol,
            "smooth": self.smooth,
            "type": "line",
        });
        if let Some(name) = name {
            series["name"] = json!(name);
            // Gaps stay gaps.
            series["connectNulls"] = json!(false);
        }
        if self.show_area {
            series["areaStyle"] = json!({});
        }
        if self.stack {
            series["stack"] = json!("Total");
        }
        series
    }
}

impl ChartBuilder for LineChart {
    const NAME: &'static str = "generate_line_chart";
    const DESCRIPTION: &'static str = "Generate a line chart to show trends over time, such as, the ratio of Apple computer sales to Apple's profits changed from 2000 to 2016.";

    fn validate(&self) -> Result<()> {
        self.common.validate()?;
        ensure_non_empty(&self.data, "Line chart data cannot be empty.")
    }

    fn build(&self) -> Result<Value> {
        let multi = has_groups(self.data.iter().map(|d| d.group.as_deref()));

        let (categories, series) = if multi {
            let grouped = Grouped::split(
                self.data
                    .iter()
                    .map(|d| (d.group.as_deref(), d.time.as_str(), d.value)),
            );
            let series: Vec<Value> = grouped
                .groups
                .iter()
                .map(|(name, values)| {
                    let data = grouped
                        .categories
                        .iter()
                        .map(|t| values.get(t).map_or(Value::Null, |v| num(*v)))
                        .collect();
                    self.series(data, Some(name))
                })
                .collect();
            (grouped.categories, series)
        } else {
            let categories = self.data.iter().map(|d| d.time.clone()).collect();
            let data = self.data.iter().map(|d| num(d.value)).collect();
            (categories, vec![self.series(data, None)])
        };

        let mut option = json!({
            "series": series,
            "title": title_block(self.common.title.as_deref()),
            "tooltip": { "trigger": "axis" },
            "xAxis": {
                "boundaryGap": false,
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

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(args: Value) -> LineChart {
        serde_json::from_value(args).unwrap()
    }

    #[test]
    fn missing_points_become_null_gaps() {
        let option = chart(json!({
            "data": [
                { "group": "A", "time": "2015", "value": 1 },
                { "group": "B", "time": "2015", "value": 2 },
                { "group": "B", "time": "2016", "value": 3 },
            ],
        }))
        .build()
        .unwrap();

        assert_eq!(option["xAxis"]["data"], json!(["2015", "2016"]));
        assert_eq!(option["series"][0]["data"], json!([1, null]));
        assert_eq!(option["series"][0]["connectNulls"], false);
        assert_eq!(option["series"][1]["data"], json!([2, 3]));
        assert!(option["legend"].is_object());
    }

    #[test]
    fn single_series_carries_style_flags() {
        let option = chart(json!({
            "showArea": true,
            "smooth": true,
            "stack": true,
            "data": [{ "time": "2015", "value": 23 }],
        }))
        .build()
        .unwrap();

        let series = &option["series"][0];
        assert_eq!(series["areaStyle"], json!({}));
        assert_eq!(series["showSymbol"], true);
        assert_eq!(series["smooth"], true);
        assert_eq!(series["stack"], "Total");
        assert!(series.get("connectNulls").is_none());
        assert_eq!(option["xAxis"]["boundaryGap"], false);
    }

    #[test]
    fn empty_data_is_rejected() {
        assert!(chart(json!({ "data": [] })).validate().is_err());
    }
}
