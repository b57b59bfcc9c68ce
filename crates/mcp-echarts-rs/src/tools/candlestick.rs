use chrono::{DateTime, NaiveDate, NaiveDateTime};
use mcp_error_rs::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::ChartBuilder;
use crate::schema::{CommonOptions, RenderOptions, ensure_non_empty, num, title_block};

const UP_COLOR: &str = "#ef232a";
const DOWN_COLOR: &str = "#14b143";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Candle {
    #[schemars(description = "Date string, such as '2023-01-01'.")]
    pub date: String,
    #[schemars(description = "Opening price.")]
    pub open: f64,
    #[schemars(description = "Highest price.")]
    pub high: f64,
    #[schemars(description = "Lowest price.")]
    pub low: f64,
    #[schemars(description = "Closing price.")]
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Trading volume (optional).")]
    pub volume: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CandlestickChart {
    #[schemars(
        description = "Data for candlestick chart, such as, [{ date: '2023-01-01', open: 100, high: 110, low: 95, close: 105, volume: 10000 }].",
        length(min = 1)
    )]
    pub data: Vec<Candle>,

    #[serde(default)]
    #[schemars(description = "Whether to show volume chart below candlestick. Default is false.")]
    pub show_volume: bool,

    #[serde(flatten)]
    pub common: CommonOptions,
}

/// Milliseconds since the epoch for the date formats callers commonly send.
fn parse_timestamp(date: &str) -> Option<i64> {
    let date = date.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.timestamp_millis());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(date, fmt) {
            return d
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis());
        }
    }
    None
}

impl CandlestickChart {
    /// Candles in chronological order. Unparseable dates keep their relative
    /// order after every parseable one.
    fn sorted(&self) -> Vec<&Candle> {
        let mut candles: Vec<&Candle> = self.data.iter().collect();
        candles.sort_by_cached_key(|c| {
            let ts = parse_timestamp(&c.date);
            (ts.is_none(), ts.unwrap_or_default())
        });
        candles
    }
}

impl ChartBuilder for CandlestickChart {
    const NAME: &'static str = "generate_candlestick_chart";
    const DESCRIPTION: &'static str = "Generate a candlestick chart for financial data visualization, such as, stock prices, cryptocurrency prices, or other OHLC (Open-High-Low-Close) data.";

    fn validate(&self) -> Result<()> {
        self.common.validate()?;
        ensure_non_empty(&self.data, "Candlestick chart data cannot be empty.")
    }

    fn build(&self) -> Result<Value> {
        let candles = self.sorted();
        let dates: Vec<&str> = candles.iter().map(|c| c.date.as_str()).collect();
        let ohlc: Vec<Value> = candles
            .iter()
            .map(|c| json!([num(c.open), num(c.close), num(c.low), num(c.high)]))
            .collect();
        let volumes: Vec<f64> = candles.iter().map(|c| c.volume.unwrap_or(0.0)).collect();
        let with_volume = self.show_volume && volumes.iter().any(|v| *v > 0.0);

        let candle_style = json!({
            "color": UP_COLOR,
            "color0": DOWN_COLOR,
            "borderColor": UP_COLOR,
            "borderColor0": DOWN_COLOR,
        });
        let mut series = vec![json!({
            "name": "Candlestick",
            "type": "candlestick",
            "data": ohlc,
            "itemStyle": candle_style,
            "emphasis": { "itemStyle": candle_style },
        })];

        let axis_max = num(dates.len() as f64 - 0.8);
        let mut x_axis = vec![json!({
            "type": "category",
            "data": dates,
            "boundaryGap": true,
            "axisLine": { "onZero": false },
            "splitLine": { "show": false },
            "min": -0.2,
            "max": axis_max,
        })];
        let mut y_axis = vec![json!({ "scale": true, "splitArea": { "show": true } })];

        let (legend, grid) = if with_volume {
            let bars: Vec<Value> = candles
                .iter()
                .zip(&volumes)
                .map(|(c, v)| {
                    let color = if c.close >= c.open { UP_COLOR } else { DOWN_COLOR };
                    json!({ "value": num(*v), "itemStyle": { "color": color } })
                })
                .collect();
            series.push(json!({
                "name": "Volume",
                "type": "bar",
                "xAxisIndex": 1,
                "yAxisIndex": 1,
                "data": bars,
                "barWidth": "60%",
            }));
            x_axis.push(json!({
                "type": "category",
                "gridIndex": 1,
                "data": dates,
                "boundaryGap": true,
                "axisLine": { "onZero": false },
                "axisTick": { "show": false },
                "splitLine": { "show": false },
                "axisLabel": { "show": false },
                "min": -0.2,
                "max": axis_max,
            }));
            y_axis.push(json!({
                "scale": true,
                "gridIndex": 1,
                "splitNumber": 2,
                "axisLabel": { "show": false },
                "axisLine": { "show": false },
                "axisTick": { "show": false },
                "splitLine": { "show": false },
                "min": 0,
            }));
            (
                json!(["Candlestick", "Volume"]),
                json!([
                    { "left": "12%", "right": "10%", "top": "15%", "height": "50%" },
                    { "left": "12%", "right": "10%", "top": "75%", "height": "15%" },
                ]),
            )
        } else {
            (
                json!(["Candlestick"]),
                json!([{ "left": "12%", "right": "10%", "top": "15%", "bottom": "15%" }]),
            )
        };

        Ok(json!({
            "animation": false,
            "legend": { "bottom": 10, "left": "center", "data": legend },
            "tooltip": {
                "trigger": "axis",
                "axisPointer": { "type": "cross" },
                "borderWidth": 1,
                "borderColor": "#ccc",
                "padding": 10,
                "textStyle": { "color": "#000" },
            },
            "xAxis": x_axis,
            "yAxis": y_axis,
            "grid": grid,
            "series": series,
            "title": title_block(self.common.title.as_deref()),
        }))
    }

    fn render_options(&self) -> RenderOptions {
        self.common.render_options()
    }
}
