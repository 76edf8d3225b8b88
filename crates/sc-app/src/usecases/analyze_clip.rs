use std::sync::Arc;

use sc_core::ports::ContentAnalyzerPort;
use sc_core::{AnalysisResult, ClipId, ClipKind};
use tokio::task::JoinHandle;
use tracing::{debug, info_span, warn, Instrument};

use crate::history_store::HistoryStore;

/// Classifies a clip and merges the result into the history.
///
/// Analysis never fails from the caller's point of view: when the analyzer
/// errors the clip is labelled with [`AnalysisResult::unprocessed`].
#[derive(Clone)]
pub struct AnalyzeClip {
    analyzer: Arc<dyn ContentAnalyzerPort>,
    history: Arc<HistoryStore>,
}

impl AnalyzeClip {
    pub fn new(analyzer: Arc<dyn ContentAnalyzerPort>, history: Arc<HistoryStore>) -> Self {
        Self { analyzer, history }
    }

    pub async fn execute(&self, clip_id: &ClipId, content: &str, kind: ClipKind) -> AnalysisResult {
        let span = info_span!(
            "usecase.clip.analyze.execute",
            clip_id = %clip_id,
            input_kind = %kind,
        );

        async move {
            let result = match self.analyzer.analyze(content, kind).await {
                Ok(result) => result,
                Err(err) => {
                    warn!(error = %err, "Analysis failed, labelling clip as unprocessed");
                    AnalysisResult::unprocessed(content, kind)
                }
            };

            let applied = self
                .history
                .update(|history| history.apply_analysis(clip_id, &result))
                .await;
            if applied {
                debug!(kind = %result.kind, summary = %result.summary, "Analysis applied");
            } else {
                debug!("Clip left the history before analysis finished");
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Runs [`AnalyzeClip::execute`] in the background.
    pub fn spawn(&self, clip_id: ClipId, content: String, kind: ClipKind) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            this.execute(&clip_id, &content, kind).await;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{remote_clip, Harness, StubAnalyzer};
    use sc_core::analysis::UNPROCESSED_TAG;

    #[tokio::test]
    async fn merges_analysis_into_the_clip() {
        let harness = Harness::new();
        let history = harness.history();
        history
            .update(|h| h.insert_remote(remote_clip("c1", "fn main() {}")))
            .await;
        let usecase = AnalyzeClip::new(harness.analyzer.clone(), history.clone());

        let result = usecase
            .execute(&ClipId::from("c1"), "fn main() {}", ClipKind::Text)
            .await;

        assert_eq!(result.kind, ClipKind::Code);
        let clip = history.read(|h| h.get(&"c1".into()).cloned()).await.unwrap();
        assert_eq!(clip.kind, ClipKind::Code);
        assert_eq!(clip.summary.as_deref(), Some("Rust snippet"));
        assert_eq!(clip.tags, vec!["rust".to_string()]);
        assert_eq!(
            harness.analyzer.calls(),
            vec![("fn main() {}".to_string(), ClipKind::Text)]
        );
    }

    #[tokio::test]
    async fn analyzer_failure_labels_clip_unprocessed() {
        let harness = Harness::new();
        let history = harness.history();
        let content = "a fairly long piece of text that will be truncated";
        history
            .update(|h| h.insert_remote(remote_clip("c1", content)))
            .await;
        let usecase = AnalyzeClip::new(Arc::new(StubAnalyzer::failing()), history.clone());

        usecase
            .execute(&ClipId::from("c1"), content, ClipKind::Text)
            .await;

        let clip = history.read(|h| h.get(&"c1".into()).cloned()).await.unwrap();
        assert_eq!(clip.kind, ClipKind::Text);
        assert_eq!(
            clip.summary.as_deref(),
            Some("a fairly long piece of text th...")
        );
        assert_eq!(clip.tags, vec![UNPROCESSED_TAG.to_string()]);
    }

    #[tokio::test]
    async fn removed_clip_is_not_resurrected() {
        let harness = Harness::new();
        let history = harness.history();
        let usecase = AnalyzeClip::new(harness.analyzer.clone(), history.clone());

        usecase
            .execute(&ClipId::from("gone"), "text", ClipKind::Text)
            .await;

        assert!(history.read(|h| h.is_empty()).await);
        assert_eq!(harness.storage.writes(), 0);
    }
}
