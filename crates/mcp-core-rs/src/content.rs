use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

pub const PNG_MIME_TYPE: &str = "image/png";

/// One block of a `tools/call` result. Charts come back either as text
/// (SVG markup, an option JSON document, a storage URL) or as an inline image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Content {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Image { data: String, mime_type: String },
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    pub fn image(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Content::Image {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Inline PNG, base64 encoded with the standard padded alphabet.
    pub fn png(bytes: &[u8]) -> Self {
        Self::image(STANDARD.encode(bytes), PNG_MIME_TYPE)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text { text } => Some(text),
            Content::Image { .. } => None,
        }
    }

    /// `(data, mime_type)` of an image block.
    pub fn as_image(&self) -> Option<(&str, &str)> {
        match self {
            Content::Image { data, mime_type } => Some((data, mime_type)),
            Content::Text { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn png_block_is_base64_with_mime_type() {
        let block = Content::png(b"hello");
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({ "type": "image", "data": "aGVsbG8=", "mimeType": "image/png" })
        );
    }

    #[test]
    fn svg_markup_travels_as_text() {
        let block = Content::text("<svg></svg>");
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({ "type": "text", "text": "<svg></svg>" })
        );
        assert_eq!(block.as_text(), Some("<svg></svg>"));
        assert!(block.as_image().is_none());
    }
}
