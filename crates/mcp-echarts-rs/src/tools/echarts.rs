//! The raw passthrough: callers hand over a complete ECharts option as a JSON
//! string and only get a structural sanity check before rendering.

use mcp_error_rs::{Error, Result};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::ChartBuilder;
use crate::schema::{DEFAULT_HEIGHT, DEFAULT_WIDTH, OutputType, RenderOptions, Theme};

const MIN_SIZE: u32 = 50;
const MAX_SIZE: u32 = 5000;

const EMPTY_OPTION: &str = "A valid ECharts option must be a valid JSON string, and cannot be empty.";
const INVALID_OPTION: &str = "Invalid ECharts option, a valid ECharts option must be a valid JSON string, and cannot be empty.";

const CARTESIAN_TYPES: [&str; 3] = ["bar", "line", "scatter"];

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EchartsChart {
    #[schemars(
        description = "ECharts option and configuration used to generate charts. For example:\n{\n  \"title\": {\n    \"text\": \"ECharts Entry Example\",\n    \"left\": \"center\",\n    \"top\": \"2%\"\n  },\n  \"tooltip\": {},\n  \"xAxis\": {\n    \"data\": [\"shirt\", \"cardigan\", \"chiffon\", \"pants\", \"heels\", \"socks\"]\n  },\n  \"yAxis\": {},\n  \"series\": [{\n    \"name\": \"Sales\",\n    \"type\": \"bar\",\n    \"data\": [5, 20, 36, 10, 10, 20]\n  }]\n}\n\nATTENTION: A valid ECharts option must be a valid JSON string, and cannot be empty.\n",
        length(min = 1)
    )]
    pub echarts_option: String,

    #[serde(default = "default_width")]
    #[schemars(
        description = "The width of the ECharts in pixels. Default is 800.",
        range(min = 50, max = 5000)
    )]
    pub width: u32,

    #[serde(default = "default_height")]
    #[schemars(
        description = "The height of the ECharts in pixels. Default is 600.",
        range(min = 50, max = 5000)
    )]
    pub height: u32,

    #[serde(default)]
    #[schemars(description = "ECharts theme, optional. Default is 'default'.")]
    pub theme: Theme,

    #[serde(default)]
    #[schemars(
        description = "The output type of the diagram. Can be 'png', 'svg' or 'option'. Default is 'png', 'png' will return the rendered PNG image, 'svg' will return the rendered SVG string, and 'option' will return the valid ECharts option."
    )]
    pub output_type: OutputType,
}

fn check_size(value: u32, label: &str) -> Result<()> {
    if value < MIN_SIZE {
        return Err(Error::InvalidParameters(format!(
            "{label} must be at least {MIN_SIZE} pixels to ensure proper chart rendering"
        )));
    }
    if value > MAX_SIZE {
        return Err(Error::InvalidParameters(format!(
            "{label} cannot exceed {MAX_SIZE} pixels"
        )));
    }
    Ok(())
}

/// Truthiness of a top-level key as a script engine would see it.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Parses the option and checks that cartesian series come with an axis.
/// Deeper malformation is left to the renderer.
fn parse_option(raw: &str) -> Result<Map<String, Value>> {
    let option = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(option)) => option,
        _ => return Err(Error::InvalidParameters(INVALID_OPTION.into())),
    };

    if let Some(Value::Array(series)) = option.get("series") {
        let cartesian = series.iter().any(|s| {
            s.get("type")
                .and_then(Value::as_str)
                .is_some_and(|t| CARTESIAN_TYPES.contains(&t))
        });
        if cartesian && !truthy(option.get("xAxis")) && !truthy(option.get("yAxis")) {
            debug!("cartesian series without an axis configuration");
            return Err(Error::InvalidParameters(INVALID_OPTION.into()));
        }
    }
    Ok(option)
}

impl ChartBuilder for EchartsChart {
    const NAME: &'static str = "generate_echarts";
    const DESCRIPTION: &'static str = "Generate visual charts using Apache ECharts with echarts option and configuration dynamically. Apache ECharts is an Open Source JavaScript Visualization Library, which is used to create interactive charts and visualizations in web applications. It supports a wide range of chart types, including line charts, bar charts, pie charts, scatter plots, and more. ECharts is highly customizable and can be integrated with various data sources to create dynamic visualizations.";

    fn validate(&self) -> Result<()> {
        if self.echarts_option.is_empty() {
            return Err(Error::InvalidParameters(EMPTY_OPTION.into()));
        }
        check_size(self.width, "Width")?;
        check_size(self.height, "Height")?;
        debug!(
            option_len = self.echarts_option.len(),
            width = self.width,
            height = self.height,
            theme = self.theme.as_str(),
            output_type = self.output_type.as_str(),
            "echarts passthrough called"
        );
        parse_option(&self.echarts_option).map(|_| ())
    }

    fn build(&self) -> Result<Value> {
        parse_option(&self.echarts_option).map(Value::Object)
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            width: self.width,
            height: self.height,
            theme: self.theme,
            output_type: self.output_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn chart(option: &str) -> EchartsChart {
        serde_json::from_value(json!({ "echartsOption": option })).unwrap()
    }

    #[test]
    fn passes_a_valid_option_through() {
        let raw = r#"{"xAxis":{"data":["a","b"]},"yAxis":{},"series":[{"type":"bar","data":[5,20]}]}"#;
        let params = chart(raw);
        params.validate().unwrap();

        assert_eq!(params.build().unwrap(), serde_json::from_str::<Value>(raw).unwrap());
        assert_eq!(params.render_options(), RenderOptions::default());
    }

    #[test]
    fn rejects_unparseable_and_non_object_options() {
        for raw in ["invalid json", "[1, 2]", "42", "null"] {
            let err = chart(raw).validate().unwrap_err();
            assert_eq!(err.to_string(), format!("invalid parameters: {INVALID_OPTION}"), "{raw}");
        }
        let err = chart("").validate().unwrap_err();
        assert!(err.to_string().contains(EMPTY_OPTION));
    }

    #[test]
    fn cartesian_series_need_some_axis() {
        assert!(chart(r#"{"series":[{"type":"line","data":[1]}]}"#).validate().is_err());
        assert!(chart(r#"{"xAxis":0,"yAxis":"","series":[{"type":"scatter"}]}"#).validate().is_err());
        assert!(chart(r#"{"yAxis":[],"series":[{"type":"line"}]}"#).validate().is_ok());
        assert!(chart(r#"{"series":[{"type":"pie","data":[1]}]}"#).validate().is_ok());
    }

    #[test]
    fn size_is_bounded() {
        let small: EchartsChart =
            serde_json::from_value(json!({ "echartsOption": "{}", "width": 49 })).unwrap();
        assert!(small.validate().unwrap_err().to_string().contains("Width must be at least 50 pixels"));

        let tall: EchartsChart =
            serde_json::from_value(json!({ "echartsOption": "{}", "height": 5001 })).unwrap();
        assert!(tall.validate().unwrap_err().to_string().contains("Height cannot exceed 5000 pixels"));
    }
}
