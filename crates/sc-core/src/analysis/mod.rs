//! Content analysis results.

use serde::{Deserialize, Serialize};

use crate::clip::{char_prefix, ClipKind};

/// Tag attached to clips whose analysis failed.
pub const UNPROCESSED_TAG: &str = "Unprocessed";

/// Number of leading characters kept in the fallback summary of text clips.
const FALLBACK_SUMMARY_CHARS: usize = 30;

/// Classification of a clip's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "type")]
    pub kind: ClipKind,
    pub summary: String,
    pub tags: Vec<String>,
}

impl AnalysisResult {
    /// Label used when the analyzer could not process the content.
    pub fn unprocessed(content: &str, input_kind: ClipKind) -> Self {
        let summary = if input_kind.is_image() {
            "Image".to_string()
        } else {
            format!("{}...", char_prefix(content, FALLBACK_SUMMARY_CHARS))
        };

        Self {
            kind: input_kind,
            summary,
            tags: vec![UNPROCESSED_TAG.to_string()],
        }
    }

    /// Result for image input that is not a decodable data URL.
    pub fn image_upload() -> Self {
        Self {
            kind: ClipKind::Image,
            summary: "Image upload".to_string(),
            tags: vec!["image".to_string()],
        }
    }

    pub fn is_unprocessed(&self) -> bool {
        self.tags.iter().any(|tag| tag == UNPROCESSED_TAG)
    }
}
