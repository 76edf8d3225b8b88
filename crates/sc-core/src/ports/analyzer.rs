use async_trait::async_trait;
use thiserror::Error;

use crate::analysis::AnalysisResult;
use crate::clip::ClipKind;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis request failed: {0}")]
    Transport(String),

    #[error("analysis service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("empty response from analysis service")]
    EmptyResponse,

    #[error("malformed analysis response: {0}")]
    Malformed(String),
}

/// Classifies clip content and produces a summary and tags.
#[async_trait]
pub trait ContentAnalyzerPort: Send + Sync {
    async fn analyze(
        &self,
        content: &str,
        input_kind: ClipKind,
    ) -> Result<AnalysisResult, AnalysisError>;
}
