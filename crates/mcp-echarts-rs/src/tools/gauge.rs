use mcp_error_rs::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::ChartBuilder;
use crate::schema::{
    CommonOptions, RenderOptions, ensure_non_empty, num, num_label, title_block,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GaugeReading {
    #[schemars(description = "Indicator name, such as 'CPU Usage'.")]
    pub name: String,
    #[schemars(description = "Current value of the indicator, such as 75.")]
    pub value: f64,
}

fn default_max() -> f64 {
    100.0
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GaugeChart {
    #[schemars(
        description = "Data for gauge chart, such as, [{ name: 'CPU Usage', value: 75 }]. Multiple gauges can be displayed.",
        length(min = 1)
    )]
    pub data: Vec<GaugeReading>,

    #[serde(default = "default_max")]
    #[schemars(description = "Maximum value of the gauge, default is 100.")]
    pub max: f64,

    #[serde(default)]
    #[schemars(description = "Minimum value of the gauge, default is 0.")]
    pub min: f64,

    #[serde(flatten)]
    pub common: CommonOptions,
}

impl GaugeChart {
    fn gauge(&self, index: usize, reading: &GaugeReading) -> Value {
        let count = self.data.len();
        let multiple = count > 1;

        // Several gauges sit side by side on one row.
        let (center, radius) = if multiple {
            let x = 100.0 / (count as f64 + 1.0) * (index as f64 + 1.0);
            let r = (80.0 / count as f64).min(30.0);
            (
                json!([format!("{}%", num_label(x)), "60%"]),
                json!(format!("{}%", num_label(r))),
            )
        } else {
            (json!(["50%", "55%"]), json!("80%"))
        };

        json!({
            "name": reading.name,
            "type": "gauge",
            "data": [{ "name": reading.name, "value": num(reading.value) }],
            "center": center,
            "radius": radius,
            "min": num(self.min),
            "max": num(self.max),
            "startAngle": 180,
            "endAngle": 0,
            "axisLine": {
                "lineStyle": {
                    "width": 6,
                    "color": [[0.3, "#67e0e3"], [0.7, "#37a2da"], [1, "#fd666d"]],
                },
            },
            "pointer": { "itemStyle": { "color": "inherit" } },
            "axisTick": {
                "distance": -30,
                "length": 8,
                "lineStyle": { "color": "#fff", "width": 2 },
            },
            "splitLine": {
                "distance": -30,
                "length": 30,
                "lineStyle": { "color": "#fff", "width": 4 },
            },
            "axisLabel": {
                "color": "inherit",
                "distance": 40,
                "fontSize": if multiple { 10 } else { 12 },
            },
            "detail": {
                "valueAnimation": true,
                "formatter": "{value}",
                "color": "inherit",
                "fontSize": if multiple { 16 } else { 20 },
                "offsetCenter": [0, "30%"],
            },
            "title": {
                "offsetCenter": [0, "50%"],
                "fontSize": if multiple { 12 } else { 14 },
            },
        })
    }
}

impl ChartBuilder for GaugeChart {
    const NAME: &'static str = "generate_gauge_chart";
    const DESCRIPTION: &'static str = "Generate a gauge chart to display single indicator's current status, such as, CPU usage rate, completion progress, or performance scores.";

    fn validate(&self) -> Result<()> {
        self.common.validate()?;
        ensure_non_empty(&self.data, "Gauge chart data cannot be empty.")
    }

    fn build(&self) -> Result<Value> {
        let series: Vec<Value> = self
            .data
            .iter()
            .enumerate()
            .map(|(i, reading)| self.gauge(i, reading))
            .collect();

        let multiple = self.data.len() > 1;
        let mut title = title_block(self.common.title.as_deref());
        let mut option = json!({ "series": series });
        if multiple {
            title["top"] = json!("5%");
            let names: Vec<&str> = self.data.iter().map(|r| r.name.as_str()).collect();
            option["legend"] = json!({
                "bottom": 10,
                "left": "center",
                "orient": "horizontal",
                "data": names,
            });
        }
        option["title"] = title;
        Ok(option)
    }

    fn render_options(&self) -> RenderOptions {
        self.common.render_options()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_gauge_is_centered() {
        let chart: GaugeChart =
            serde_json::from_value(json!({ "data": [{ "name": "CPU", "value": 75 }] })).unwrap();
        let option = chart.build().unwrap();
        let series = &option["series"][0];

        assert_eq!(series["center"], json!(["50%", "55%"]));
        assert_eq!(series["radius"], "80%");
        assert_eq!(series["min"], 0);
        assert_eq!(series["max"], 100);
        assert!(option.get("legend").is_none());
    }

    #[test]
    fn multiple_gauges_share_a_row() {
        let chart: GaugeChart = serde_json::from_value(json!({
            "min": 10,
            "max": 50,
            "data": [
                { "name": "CPU", "value": 75 },
                { "name": "Memory", "value": 40 },
                { "name": "Disk", "value": 20 },
                { "name": "Net", "value": 5 },
            ],
        }))
        .unwrap();
        let option = chart.build().unwrap();

        assert_eq!(option["series"][0]["center"], json!(["20%", "60%"]));
        assert_eq!(option["series"][3]["center"], json!(["80%", "60%"]));
        assert_eq!(option["series"][0]["radius"], "20%");
        assert_eq!(option["series"][1]["max"], 50);
        assert_eq!(option["legend"]["data"], json!(["CPU", "Memory", "Disk", "Net"]));
        assert_eq!(option["title"]["top"], "5%");
    }
}
