use std::sync::Arc;

use mcp_core_rs::content::{Content, PNG_MIME_TYPE};
use mcp_error_rs::{Error, Result};
use serde_json::Value;
use tracing::debug;

use crate::{
    render::{ChartRenderer, RenderFormat, RenderOutput, RenderRequest},
    schema::{OutputType, RenderOptions},
    storage::ChartStore,
};

/// Turns a built option into the single content block a tool call returns.
#[derive(Clone)]
pub struct OutputNormalizer {
    renderer: Arc<dyn ChartRenderer>,
    store: Option<Arc<dyn ChartStore>>,
}

impl OutputNormalizer {
    pub fn new(renderer: Arc<dyn ChartRenderer>, store: Option<Arc<dyn ChartStore>>) -> Self {
        Self { renderer, store }
    }

    pub async fn normalize(
        &self,
        tool: &str,
        option: &Value,
        options: &RenderOptions,
    ) -> Result<Vec<Content>> {
        let keys: Vec<&str> = option
            .as_object()
            .map(|o| o.keys().map(String::as_str).collect())
            .unwrap_or_default();
        debug!(
            tool,
            width = options.width,
            height = options.height,
            theme = options.theme.as_str(),
            output_type = options.output_type.as_str(),
            ?keys,
            "generating chart"
        );

        let format = match options.output_type {
            // Echo the option as built; nothing is rendered.
            OutputType::Option => {
                let text = serde_json::to_string_pretty(option)?;
                debug!(tool, len = text.len(), "returning option");
                return Ok(vec![Content::text(text)]);
            }
            OutputType::Svg => RenderFormat::Svg,
            OutputType::Png => RenderFormat::Png,
        };

        let output = self.render(option, options, format).await?;
        let content = match (format, output) {
            (RenderFormat::Svg, RenderOutput::Markup(svg)) => {
                if !svg.contains("<svg") {
                    return Err(Error::Render("renderer did not return SVG markup".into()));
                }
                debug!(tool, len = svg.len(), "svg rendered");
                Content::text(svg)
            }
            (RenderFormat::Png, RenderOutput::Raster(bytes)) => match &self.store {
                Some(store) => {
                    let url = store.store(&bytes, "png", PNG_MIME_TYPE).await?;
                    debug!(tool, %url, "png offloaded");
                    Content::text(url)
                }
                None => {
                    debug!(tool, len = bytes.len(), "png rendered");
                    Content::png(&bytes)
                }
            },
            (format, _) => {
                return Err(Error::Render(format!(
                    "renderer returned the wrong kind of output for {:?}",
                    format
                )));
            }
        };
        Ok(vec![content])
    }

    async fn render(
        &self,
        option: &Value,
        options: &RenderOptions,
        format: RenderFormat,
    ) -> Result<RenderOutput> {
        // Static output: no animation frames.
        let mut option = option.clone();
        if let Some(map) = option.as_object_mut() {
            map.insert("animation".to_string(), Value::Bool(false));
        }

        let request = RenderRequest {
            option,
            width: options.width,
            height: options.height,
            theme: options.theme,
            format,
        };
        self.renderer.render(request).await.map_err(|e| match e {
            Error::Render(_) => e,
            other => Error::Render(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde_json::json;

    use super::*;
    use crate::schema::Theme;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    #[derive(Default)]
    struct FakeRenderer {
        seen: Mutex<Vec<RenderRequest>>,
    }

    #[async_trait]
    impl ChartRenderer for FakeRenderer {
        async fn render(&self, request: RenderRequest) -> Result<RenderOutput> {
            let format = request.format;
            self.seen.lock().unwrap().push(request);
            Ok(match format {
                RenderFormat::Png => RenderOutput::Raster(PNG_MAGIC.to_vec()),
                RenderFormat::Svg => RenderOutput::Markup("<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>".into()),
            })
        }
    }

    struct BrokenRenderer;

    #[async_trait]
    impl ChartRenderer for BrokenRenderer {
        async fn render(&self, _request: RenderRequest) -> Result<RenderOutput> {
            Err(Error::Io(std::io::Error::other("canvas exhausted")))
        }
    }

    struct FakeStore;

    #[async_trait]
    impl ChartStore for FakeStore {
        async fn store(&self, bytes: &[u8], extension: &str, content_type: &str) -> Result<String> {
            assert_eq!(content_type, PNG_MIME_TYPE);
            Ok(format!("http://minio.local:9000/charts/{}.{}", bytes.len(), extension))
        }
    }

    fn options(output_type: OutputType) -> RenderOptions {
        RenderOptions {
            output_type,
            theme: Theme::Dark,
            ..RenderOptions::default()
        }
    }

    #[tokio::test]
    async fn option_output_echoes_without_rendering() {
        let renderer = Arc::new(FakeRenderer::default());
        let normalizer = OutputNormalizer::new(renderer.clone(), None);
        let option = json!({ "series": [{ "type": "pie" }] });

        let content = normalizer
            .normalize("generate_pie_chart", &option, &options(OutputType::Option))
            .await
            .unwrap();

        assert_eq!(content.len(), 1);
        let text = content[0].as_text().unwrap();
        assert_eq!(serde_json::from_str::<Value>(text).unwrap(), option);
        assert!(renderer.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn png_is_inlined_as_base64_and_rendered_without_animation() {
        let renderer = Arc::new(FakeRenderer::default());
        let normalizer = OutputNormalizer::new(renderer.clone(), None);

        let content = normalizer
            .normalize("generate_bar_chart", &json!({ "series": [] }), &options(OutputType::Png))
            .await
            .unwrap();

        let (data, mime) = content[0].as_image().unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(STANDARD.decode(data).unwrap(), PNG_MAGIC);

        let seen = renderer.seen.lock().unwrap();
        assert_eq!(seen[0].option["animation"], false);
        assert_eq!(seen[0].theme, Theme::Dark);
        assert_eq!((seen[0].width, seen[0].height), (800, 600));
    }

    #[tokio::test]
    async fn png_goes_to_the_store_when_configured() {
        let normalizer =
            OutputNormalizer::new(Arc::new(FakeRenderer::default()), Some(Arc::new(FakeStore)));
        let content = normalizer
            .normalize("generate_bar_chart", &json!({}), &options(OutputType::Png))
            .await
            .unwrap();

        assert_eq!(content[0].as_text(), Some("http://minio.local:9000/charts/8.png"));
    }

    #[tokio::test]
    async fn svg_is_returned_as_text() {
        let normalizer =
            OutputNormalizer::new(Arc::new(FakeRenderer::default()), Some(Arc::new(FakeStore)));
        let content = normalizer
            .normalize("generate_line_chart", &json!({}), &options(OutputType::Svg))
            .await
            .unwrap();

        assert!(content[0].as_text().unwrap().starts_with("<svg"));
    }

    #[tokio::test]
    async fn renderer_failures_are_wrapped_once() {
        let normalizer = OutputNormalizer::new(Arc::new(BrokenRenderer), None);
        let err = normalizer
            .normalize("generate_bar_chart", &json!({}), &options(OutputType::Png))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Render(_)));
        assert_eq!(err.to_string(), "Chart rendering failed: IO error: canvas exhausted");
    }
}
