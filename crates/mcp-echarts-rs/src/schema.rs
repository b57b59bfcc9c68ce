//! Parameter fragments shared by every chart tool, plus the small value
//! helpers the builders use to emit chart options.

use mcp_error_rs::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value, json};

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Dark => "dark",
        }
    }
}

/// What a tool call hands back: a rendered PNG, SVG markup, or the option itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    #[default]
    Png,
    Svg,
    Option,
}

impl OutputType {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputType::Png => "png",
            OutputType::Svg => "svg",
            OutputType::Option => "option",
        }
    }
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

/// Title, size, theme and output format accepted by every chart tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommonOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Set the title of the chart.")]
    pub title: Option<String>,

    #[serde(default = "default_width")]
    #[schemars(
        description = "Set the width of the chart, default is 800px.",
        range(min = 1)
    )]
    pub width: u32,

    #[serde(default = "default_height")]
    #[schemars(
        description = "Set the height of the chart, default is 600px.",
        range(min = 1)
    )]
    pub height: u32,

    #[serde(default)]
    #[schemars(description = "Set the theme for the chart, optional, default is 'default'.")]
    pub theme: Theme,

    #[serde(default)]
    #[schemars(
        description = "The output type of the diagram. Can be 'png', 'svg' or 'option'. Default is 'png', 'png' will return the rendered PNG image, 'svg' will return the rendered SVG string, and 'option' will return the valid ECharts option."
    )]
    pub output_type: OutputType,
}

impl Default for CommonOptions {
    fn default() -> Self {
        Self {
            title: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            theme: Theme::default(),
            output_type: OutputType::default(),
        }
    }
}

/// Everything the output stage needs besides the option itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub theme: Theme,
    pub output_type: OutputType,
}

impl Default for RenderOptions {
    fn default() -> Self {
        CommonOptions::default().render_options()
    }
}

impl CommonOptions {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            width: self.width,
            height: self.height,
            theme: self.theme,
            output_type: self.output_type,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(Error::InvalidParameters(
                "width must be a positive integer".into(),
            ));
        }
        if self.height == 0 {
            return Err(Error::InvalidParameters(
                "height must be a positive integer".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AxisTitles {
    #[serde(default)]
    #[schemars(description = "Set the x-axis title of chart.")]
    pub axis_x_title: String,

    #[serde(default)]
    #[schemars(description = "Set the y-axis title of chart.")]
    pub axis_y_title: String,
}

/// Rejects an empty data collection with the tool's own message.
pub fn ensure_non_empty<T>(items: &[T], message: &str) -> Result<()> {
    if items.is_empty() {
        return Err(Error::InvalidParameters(message.to_string()));
    }
    Ok(())
}

/// Emits a number the way a JSON writer in a dynamic language would:
/// integral values without a fraction, non-finite values as `null`.
pub fn num(value: f64) -> Value {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        return Value::from(value as i64);
    }
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

/// Formats a number for use inside a label such as `"60%"`.
pub fn num_label(value: f64) -> String {
    match num(value) {
        Value::Number(n) => n.to_string(),
        _ => value.to_string(),
    }
}

/// The centered title block every chart carries; `text` only when set.
pub fn title_block(title: Option<&str>) -> Value {
    let mut block = json!({ "left": "center" });
    if let Some(text) = title {
        block["text"] = json!(text);
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_options_fill_defaults() {
        let opts: CommonOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(opts, CommonOptions::default());
        assert_eq!(opts.width, 800);
        assert_eq!(opts.height, 600);
        assert_eq!(opts.output_type, OutputType::Png);
    }

    #[test]
    fn rejects_unknown_theme_and_zero_width() {
        assert!(serde_json::from_value::<CommonOptions>(json!({ "theme": "neon" })).is_err());

        let opts: CommonOptions = serde_json::from_value(json!({ "width": 0 })).unwrap();
        assert!(matches!(opts.validate(), Err(Error::InvalidParameters(_))));
    }

    #[test]
    fn numbers_keep_integers_integral() {
        assert_eq!(num(10.0), json!(10));
        assert_eq!(num(2.5), json!(2.5));
        assert_eq!(num(f64::NAN), Value::Null);
        assert_eq!(num_label(60.0), "60");
        assert_eq!(num_label(2.5), "2.5");
    }

    #[test]
    fn title_block_omits_missing_text() {
        assert_eq!(title_block(None), json!({ "left": "center" }));
        assert_eq!(
            title_block(Some("Sales")),
            json!({ "left": "center", "text": "Sales" })
        );
    }
}
