//! HTTP client for the academic-assistance backend.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use paperdesk_core::analysis::{AnalysisKind, AnalysisResult};
use paperdesk_core::config::BackendConfig;
use paperdesk_core::error::{PaperdeskError, Result};
use paperdesk_core::generation::GenerationInput;
use paperdesk_core::review::ReviewPayload;
use paperdesk_core::source::{PaperSource, PDF_MIME};

use crate::protocol::*;

/// The operations the backend offers, one call each.
///
/// Orchestrators hold an `Arc<dyn Backend>` so tests can substitute an
/// in-memory implementation.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Generate a paper; returns LaTeX source.
    async fn generate_paper(&self, input: &GenerationInput) -> Result<String>;

    /// Render a LaTeX document; returns the PDF bytes.
    async fn render_latex(&self, latex: &str) -> Result<Vec<u8>>;

    async fn summarize(&self, source: &PaperSource) -> Result<String>;

    async fn review(&self, source: &PaperSource) -> Result<ReviewPayload>;

    async fn analyze(&self, text: &str, kind: AnalysisKind) -> Result<AnalysisResult>;

    /// Ask the assistant a question. `None` when the backend sent no reply.
    async fn chat(&self, message: &str) -> Result<Option<String>>;
}

/// reqwest-backed [`Backend`] bound to one origin.
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Self {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        read_json(resp, path).await
    }

    /// Post an arXiv id as JSON or an uploaded PDF as multipart.
    async fn post_source<R>(&self, path: &str, source: &PaperSource) -> Result<R>
    where
        R: DeserializeOwned,
    {
        match source {
            PaperSource::Arxiv(id) => self.post_json(path, &ArxivRequest { arxiv_id: id }).await,
            PaperSource::Upload(file) => {
                let part = Part::bytes(file.bytes().to_vec())
                    .file_name(file.name().to_string())
                    .mime_str(PDF_MIME)
                    .map_err(transport)?;
                let form = Form::new().part(PAPER_FILE_FIELD, part);
                let resp = self
                    .client
                    .post(self.url(path))
                    .multipart(form)
                    .send()
                    .await
                    .map_err(transport)?;
                read_json(resp, path).await
            }
        }
    }
}

#[async_trait]
impl Backend for BackendClient {
    #[instrument(skip(self, input), fields(topic = %input.topic, style = %input.style))]
    async fn generate_paper(&self, input: &GenerationInput) -> Result<String> {
        let resp: GeneratePaperResponse = self.post_json(GENERATE_PAPER_PATH, input).await?;
        let paper = settle(
            resp.success,
            resp.paper,
            resp.error,
            "paper",
            "Failed to generate paper",
        )?;
        debug!(chars = paper.len(), "Paper generated");
        Ok(paper)
    }

    #[instrument(skip(self, latex), fields(chars = latex.len()))]
    async fn render_latex(&self, latex: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .post(self.url(LATEX_TO_PDF_PATH))
            .json(&LatexToPdfRequest { latex })
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.map_err(transport)?;
            let failure: RenderFailure = serde_json::from_str(&body).unwrap_or_else(|e| {
                warn!(status = %status, "Render failure body was not JSON: {}", e);
                RenderFailure::default()
            });
            return Err(PaperdeskError::Render(failure.into_message()));
        }

        let bytes = resp.bytes().await.map_err(transport)?;
        debug!(bytes = bytes.len(), "Preview rendered");
        Ok(bytes.to_vec())
    }

    #[instrument(skip(self, source))]
    async fn summarize(&self, source: &PaperSource) -> Result<String> {
        let resp: SummarizeResponse = self.post_source(SUMMARIZE_PATH, source).await?;
        settle(
            resp.success,
            resp.summary,
            resp.error,
            "summary",
            "Failed to summarize paper",
        )
    }

    #[instrument(skip(self, source))]
    async fn review(&self, source: &PaperSource) -> Result<ReviewPayload> {
        let resp: ReviewResponse = self.post_source(REVIEW_PATH, source).await?;
        let raw = settle(
            resp.success,
            resp.review,
            resp.error,
            "review",
            "Failed to get review.",
        )?;
        ReviewPayload::from_value(raw)
    }

    #[instrument(skip(self, text), fields(words = text.split_whitespace().count()))]
    async fn analyze(&self, text: &str, kind: AnalysisKind) -> Result<AnalysisResult> {
        let req = AnalyzeRequest {
            input_text: text,
            kind,
        };
        let resp: AnalyzeResponse = self.post_json(ANALYZE_PATH, &req).await?;
        let raw = settle(
            resp.success,
            resp.analysis,
            resp.error,
            "analysis",
            "Analysis failed",
        )?;
        AnalysisResult::from_payload(kind, raw)
    }

    #[instrument(skip(self, message))]
    async fn chat(&self, message: &str) -> Result<Option<String>> {
        let resp: ChatResponse = self.post_json(CHATBOT_PATH, &ChatRequest { message }).await?;
        Ok(resp.reply.filter(|r| !r.trim().is_empty()))
    }
}

/// Decode a JSON body regardless of status; the backend reports failures in-band.
async fn read_json<R: DeserializeOwned>(resp: Response, path: &str) -> Result<R> {
    let status = resp.status();
    let body = resp.text().await.map_err(transport)?;
    serde_json::from_str(&body).map_err(|e| {
        warn!(path, status = %status, "Response was not valid JSON");
        PaperdeskError::Transport(format!(
            "Malformed response from {path} (HTTP {status}): {e}"
        ))
    })
}

fn transport(e: reqwest::Error) -> PaperdeskError {
    PaperdeskError::Transport(e.to_string())
}
