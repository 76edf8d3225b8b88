use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use sc_core::ports::{AnalysisError, ContentAnalyzerPort};
use sc_core::{AnalysisResult, ClipKind};

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://)([-a-zA-Z0-9]+\.)+[a-zA-Z0-9]+(:\d+)?([-a-zA-Z0-9@:%_\+.~#?&/=]*)$")
        .unwrap()
});

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").unwrap());

/// Common keywords and punctuation of source code.
static CODE_SNIPPET_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(\{|\}|function\s+\w+\s*\(|class\s+\w+|public\s+|private\s+|def\s+\w+|fn\s+\w+|impl\s|struct\s|enum\s|=>|import\s+\w+|#include|for\s+.*\{|if\s+.*\{|while\s+.*\{|match\s+.*\{|;\s*$)",
    )
    .unwrap()
});

/// Classifies text by shape alone, in priority order URL, email, code.
pub fn detect_kind(content: &str) -> ClipKind {
    let content = content.trim();
    if content.is_empty() {
        return ClipKind::Text;
    }

    if URL_REGEX.is_match(content) {
        ClipKind::Url
    } else if EMAIL_REGEX.is_match(content) {
        ClipKind::Email
    } else if content.len() > 10 && CODE_SNIPPET_REGEX.is_match(content) {
        ClipKind::Code
    } else {
        ClipKind::Text
    }
}

/// Offline analyzer used when no API key is configured.
///
/// Detects the kind locally and labels the clip like a failed remote analysis.
#[derive(Debug, Default)]
pub struct HeuristicAnalyzer;

#[async_trait]
impl ContentAnalyzerPort for HeuristicAnalyzer {
    async fn analyze(
        &self,
        content: &str,
        input_kind: ClipKind,
    ) -> Result<AnalysisResult, AnalysisError> {
        let kind = if input_kind.is_image() {
            ClipKind::Image
        } else {
            detect_kind(content)
        };

        let mut result = AnalysisResult::unprocessed(content, input_kind);
        result.kind = kind;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_core::analysis::UNPROCESSED_TAG;

    #[test]
    fn detects_urls() {
        assert_eq!(detect_kind("https://example.com/path?q=1"), ClipKind::Url);
        assert_eq!(detect_kind("  http://localhost.dev:8080  "), ClipKind::Url);
        assert_eq!(detect_kind("see https://example.com"), ClipKind::Text);
    }

    #[test]
    fn detects_emails() {
        assert_eq!(detect_kind("jane.doe+clips@example.co.uk"), ClipKind::Email);
        assert_eq!(detect_kind("not an @email"), ClipKind::Text);
    }

    #[test]
    fn detects_code() {
        assert_eq!(detect_kind("fn main() { println!(\"hi\"); }"), ClipKind::Code);
        assert_eq!(detect_kind("def handler(event):\n    return event"), ClipKind::Code);
        assert_eq!(detect_kind("const total = items.length;"), ClipKind::Code);
        assert_eq!(detect_kind("Meeting moved to Thursday"), ClipKind::Text);
    }

    #[tokio::test]
    async fn analysis_is_labelled_unprocessed() {
        let result = HeuristicAnalyzer
            .analyze("https://example.com", ClipKind::Text)
            .await
            .unwrap();

        assert_eq!(result.kind, ClipKind::Url);
        assert_eq!(result.summary, "https://example.com...");
        assert_eq!(result.tags, vec![UNPROCESSED_TAG.to_string()]);
    }

    #[tokio::test]
    async fn images_stay_images() {
        let result = HeuristicAnalyzer
            .analyze("data:image/png;base64,AAAA", ClipKind::Image)
            .await
            .unwrap();

        assert_eq!(result.kind, ClipKind::Image);
        assert_eq!(result.summary, "Image");
    }
}
