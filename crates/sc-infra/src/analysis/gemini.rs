use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use sc_core::clip::char_prefix;
use sc_core::config::AnalysisConfig;
use sc_core::ports::{AnalysisError, ContentAnalyzerPort};
use sc_core::{AnalysisResult, ClipKind, DataUrl};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info_span, Instrument};

const IMAGE_PROMPT: &str = "Analyze this image. Provide a very short summary (max 10 words) of what is visible. Suggest 1-3 tags.";

/// Longest error body kept in [`AnalysisError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Classifies clips with the Gemini `generateContent` REST API.
#[derive(Clone)]
pub struct GeminiAnalyzer {
    http: Client,
    endpoint: String,
    model: String,
    api_key: String,
    max_text_chars: usize,
}

impl GeminiAnalyzer {
    pub fn new(config: &AnalysisConfig, api_key: impl Into<String>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build HTTP client for the analysis service")?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
            max_text_chars: config.max_text_chars,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }

    fn text_prompt(&self, content: &str) -> String {
        format!(
            "Analyze the following clipboard text and categorize it.\n\
             Provide a very short summary (max 10 words).\n\
             Determine if it is a URL, Source Code, Email Address, or General Text.\n\
             Suggest 1-3 short tags.\n\n\
             Text to analyze:\n{}",
            char_prefix(content, self.max_text_chars)
        )
    }

    async fn generate(&self, parts: Vec<Value>) -> Result<AnalysisResult, AnalysisError> {
        let body = json!({
            "contents": [{ "parts": parts }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
            },
        });

        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| AnalysisError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                body: char_prefix(&body, MAX_ERROR_BODY_CHARS).to_string(),
            });
        }

        let payload = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|err| AnalysisError::Malformed(err.to_string()))?;
        let text = payload.text().ok_or(AnalysisError::EmptyResponse)?;

        serde_json::from_str(&text).map_err(|err| AnalysisError::Malformed(err.to_string()))
    }
}

#[async_trait]
impl ContentAnalyzerPort for GeminiAnalyzer {
    async fn analyze(
        &self,
        content: &str,
        input_kind: ClipKind,
    ) -> Result<AnalysisResult, AnalysisError> {
        let span = info_span!("infra.analysis.gemini", model = %self.model, input_kind = %input_kind);

        async move {
            let parts = if input_kind.is_image() {
                match DataUrl::parse(content) {
                    Ok(url) => vec![
                        json!({ "inlineData": { "mimeType": url.mime, "data": url.data } }),
                        json!({ "text": IMAGE_PROMPT }),
                    ],
                    Err(_) => {
                        debug!("Image content is not a data URL, skipping remote analysis");
                        return Ok(AnalysisResult::image_upload());
                    }
                }
            } else {
                vec![json!({ "text": self.text_prompt(content) })]
            };

            let mut result = self.generate(parts).await?;
            if input_kind.is_image() {
                result.kind = ClipKind::Image;
            }
            debug!(kind = %result.kind, "Analysis received");
            Ok(result)
        }
        .instrument(span)
        .await
    }
}

fn response_schema() -> Value {
    let kinds: Vec<&str> = ClipKind::ALL.iter().map(ClipKind::as_str).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "type": {
                "type": "STRING",
                "enum": kinds,
                "description": "The category of the content. If input was image, must be IMAGE.",
            },
            "summary": {
                "type": "STRING",
                "description": "A very brief summary of the content (max 10 words)",
            },
            "tags": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "1-3 keywords describing the content",
            },
        },
        "required": ["type", "summary", "tags"],
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}
