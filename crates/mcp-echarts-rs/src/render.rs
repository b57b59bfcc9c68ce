//! The rendering seam. Turning an option into pixels needs a real chart
//! engine, so it lives behind [`ChartRenderer`]; [`CommandRenderer`] drives
//! an external one over stdin/stdout.

use std::{io, process::Stdio};

use async_trait::async_trait;
use mcp_error_rs::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use tokio::{io::AsyncWriteExt, process::Command};
use tracing::debug;

use crate::schema::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    Png,
    Svg,
}

/// One render job, serialized as-is for external renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderRequest {
    pub option: Value,
    pub width: u32,
    pub height: u32,
    pub theme: Theme,
    pub format: RenderFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutput {
    /// Encoded PNG bytes.
    Raster(Vec<u8>),
    /// SVG markup.
    Markup(String),
}

#[async_trait]
pub trait ChartRenderer: Send + Sync {
    async fn render(&self, request: RenderRequest) -> Result<RenderOutput>;
}

/// Spawns `program` once per render, writes the request as JSON to its
/// stdin and reads the PNG bytes or SVG markup back from stdout.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
}

impl CommandRenderer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl ChartRenderer for CommandRenderer {
    async fn render(&self, request: RenderRequest) -> Result<RenderOutput> {
        let payload = serde_json::to_vec(&request)?;
        debug!(program = %self.program, format = ?request.format, "spawning renderer");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::Render(format!("failed to spawn {}: {}", self.program, e)))?;

        // Feed stdin while stdout and stderr drain, so a renderer that streams
        // output before reading all of its input cannot fill a pipe and stall.
        let stdin = child.stdin.take();
        let feed = async move {
            let Some(mut stdin) = stdin else {
                return Ok(());
            };
            match stdin.write_all(&payload).await {
                // Exited without reading everything; its status and stderr say why.
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    debug!("renderer closed stdin early");
                    Ok(())
                }
                other => other,
            }
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output =
            output.map_err(|e| Error::Render(format!("renderer did not finish: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Render(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        fed.map_err(|e| Error::Render(format!("write renderer stdin failed: {}", e)))?;

        match request.format {
            RenderFormat::Png => Ok(RenderOutput::Raster(output.stdout)),
            RenderFormat::Svg => String::from_utf8(output.stdout)
                .map(RenderOutput::Markup)
                .map_err(|e| Error::Render(format!("renderer emitted invalid UTF-8: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;

    fn request(format: RenderFormat) -> RenderRequest {
        RenderRequest {
            option: json!({ "series": [] }),
            width: 800,
            height: 600,
            theme: Theme::Dark,
            format,
        }
    }

    #[test]
    fn request_wire_shape() {
        assert_eq!(
            serde_json::to_value(request(RenderFormat::Svg)).unwrap(),
            json!({
                "option": { "series": [] },
                "width": 800,
                "height": 600,
                "theme": "dark",
                "format": "svg",
            })
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn echoes_stdout_back() {
        let renderer = CommandRenderer::new("cat", vec![]);
        let out = renderer.render(request(RenderFormat::Svg)).await.unwrap();
        let RenderOutput::Markup(text) = out else {
            panic!("expected markup");
        };
        assert!(text.contains("\"format\":\"svg\""));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_process_is_a_render_error() {
        let renderer = CommandRenderer::new("sh", vec![
            "-c".into(),
            "cat >/dev/null; echo boom >&2; exit 3".into(),
        ]);
        let err = renderer.render(request(RenderFormat::Png)).await.unwrap_err();
        assert!(matches!(err, Error::Render(_)));
        assert!(err.to_string().contains("boom"));
    }

    /// A request far larger than a pipe buffer, echoed back while it is still
    /// being written.
    fn oversized(format: RenderFormat) -> RenderRequest {
        RenderRequest {
            option: json!({ "series": [{ "type": "bar", "name": "x".repeat(1 << 20) }] }),
            ..request(format)
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn streaming_renderer_does_not_stall_on_large_requests() {
        let renderer = CommandRenderer::new("cat", vec![]);
        let request = oversized(RenderFormat::Svg);
        let expected = serde_json::to_string(&request).unwrap();

        let out = tokio::time::timeout(Duration::from_secs(30), renderer.render(request))
            .await
            .expect("renderer stalled")
            .unwrap();
        assert_eq!(out, RenderOutput::Markup(expected));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn early_exit_reports_the_renderers_own_error() {
        let renderer = CommandRenderer::new("sh", vec![
            "-c".into(),
            "echo 'unknown series type foo' >&2; exit 2".into(),
        ]);
        let err = tokio::time::timeout(
            Duration::from_secs(30),
            renderer.render(oversized(RenderFormat::Png)),
        )
        .await
        .expect("renderer stalled")
        .unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("Chart rendering failed: sh exited with"), "{message}");
        assert!(message.contains("unknown series type foo"), "{message}");
        assert!(!message.contains("Broken pipe"), "{message}");
    }

    #[tokio::test]
    async fn missing_program_is_a_render_error() {
        let renderer = CommandRenderer::new("definitely-not-a-renderer-binary", vec![]);
        let err = renderer.render(request(RenderFormat::Png)).await.unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }
}
