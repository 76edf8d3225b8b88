use serde::{Deserialize, Serialize};

use super::{ClipKind, DataUrl};
use crate::analysis::AnalysisResult;
use crate::ids::ClipId;

/// A unit of copied content tracked by the application.
///
/// The serialized form (camelCase, kind under `type`) is shared by the local
/// store and the peer wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub id: ClipId,
    /// Text content, or a base64 data URL for images.
    pub content: String,
    #[serde(rename = "type")]
    pub kind: ClipKind,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub device_id: String,
    pub device_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    /// Removal deadline for ephemeral clips, in milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl Clip {
    pub fn is_ephemeral(&self) -> bool {
        self.expires_at.is_some()
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        matches!(self.expires_at, Some(deadline) if deadline <= now_ms)
    }

    pub fn apply_analysis(&mut self, result: &AnalysisResult) {
        self.kind = result.kind;
        self.summary = Some(result.summary.clone());
        self.tags = result.tags.clone();
    }

    /// Summary worth showing next to the content, i.e. present and not a copy of it.
    pub fn distinct_summary(&self) -> Option<&str> {
        self.summary
            .as_deref()
            .filter(|summary| *summary != self.content)
    }

    /// Single-line preview for list rendering.
    pub fn preview(&self, max_chars: usize) -> String {
        if self.kind.is_image() {
            return match DataUrl::parse(&self.content) {
                Ok(url) => format!("[{} image, {} KB]", url.mime, url.decoded_len().div_ceil(1024)),
                Err(_) => "[image]".to_string(),
            };
        }

        let flattened: String = self
            .content
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let prefix = char_prefix(&flattened, max_chars);
        if prefix.len() < flattened.len() {
            format!("{prefix}...")
        } else {
            flattened
        }
    }
}

/// Returns the first `max_chars` characters of `s` without splitting a code point.
pub fn char_prefix(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_clip(content: &str) -> Clip {
        Clip {
            id: ClipId::from("c1"),
            content: content.to_string(),
            kind: ClipKind::Text,
            timestamp: 1_000,
            device_id: "local".to_string(),
            device_name: "MacBook Pro".to_string(),
            summary: None,
            tags: vec![],
            is_favorite: false,
            expires_at: None,
        }
    }

    #[test]
    fn serializes_with_original_field_names() {
        let mut clip = text_clip("hello");
        clip.expires_at = Some(61_000);
        let value = serde_json::to_value(&clip).unwrap();

        assert_eq!(value["type"], "TEXT");
        assert_eq!(value["deviceId"], "local");
        assert_eq!(value["deviceName"], "MacBook Pro");
        assert_eq!(value["isFavorite"], false);
        assert_eq!(value["expiresAt"], 61_000);
        assert!(value.get("summary").is_none());
    }

    #[test]
    fn deserializes_records_without_optional_fields() {
        let json = r#"{"id":"x","content":"hi","type":"URL","timestamp":5,
            "deviceId":"d","deviceName":"Pixel","isFavorite":true}"#;
        let clip: Clip = serde_json::from_str(json).unwrap();
        assert_eq!(clip.kind, ClipKind::Url);
        assert!(clip.tags.is_empty());
        assert!(clip.summary.is_none());
        assert!(clip.is_favorite);
    }

    #[test]
    fn expiry_is_inclusive_of_deadline() {
        let mut clip = text_clip("secret");
        assert!(!clip.is_expired(i64::MAX));

        clip.expires_at = Some(10_000);
        assert!(!clip.is_expired(9_999));
        assert!(clip.is_expired(10_000));
    }

    #[test]
    fn apply_analysis_overwrites_kind_summary_and_tags() {
        let mut clip = text_clip("https://example.com");
        clip.apply_analysis(&AnalysisResult {
            kind: ClipKind::Url,
            summary: "Example site".to_string(),
            tags: vec!["web".to_string()],
        });
        assert_eq!(clip.kind, ClipKind::Url);
        assert_eq!(clip.summary.as_deref(), Some("Example site"));
        assert_eq!(clip.tags, vec!["web".to_string()]);
    }

    #[test]
    fn distinct_summary_hides_summary_equal_to_content() {
        let mut clip = text_clip("same");
        clip.summary = Some("same".to_string());
        assert!(clip.distinct_summary().is_none());
        clip.summary = Some("other".to_string());
        assert_eq!(clip.distinct_summary(), Some("other"));
    }

    #[test]
    fn preview_flattens_and_truncates() {
        let clip = text_clip("fn main() {\n    println!(\"héllo\");\n}");
        assert_eq!(clip.preview(12), "fn main() { ...");
        assert_eq!(text_clip("short").preview(12), "short");
    }

    #[test]
    fn char_prefix_respects_code_points() {
        assert_eq!(char_prefix("héllo", 2), "hé");
        assert_eq!(char_prefix("abc", 10), "abc");
    }
}
