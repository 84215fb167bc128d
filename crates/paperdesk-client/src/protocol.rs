//! Request and response bodies for the backend HTTP API.
//!
//! Every JSON endpoint answers with a `success` flag plus either its payload
//! field or an `error` message, whatever the HTTP status.

use serde::{Deserialize, Serialize};

use paperdesk_core::analysis::AnalysisKind;
use paperdesk_core::error::{PaperdeskError, Result};

pub const GENERATE_PAPER_PATH: &str = "/api/generate-paper";
pub const LATEX_TO_PDF_PATH: &str = "/api/latex-to-pdf";
pub const SUMMARIZE_PATH: &str = "/api/summarize";
pub const REVIEW_PATH: &str = "/api/review";
pub const ANALYZE_PATH: &str = "/api/analyze";
pub const CHATBOT_PATH: &str = "/api/chatbot";

/// Multipart field name carrying an uploaded paper.
pub const PAPER_FILE_FIELD: &str = "paperFile";

// ── Paper Generation ────────────────────────────────────────────

// Request is paperdesk_core::generation::GenerationInput (serialized directly)

#[derive(Debug, Deserialize)]
pub struct GeneratePaperResponse {
    #[serde(default)]
    pub success: bool,
    pub paper: Option<String>,
    pub error: Option<String>,
}

// ── LaTeX Rendering ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LatexToPdfRequest<'a> {
    pub latex: &'a str,
}

/// Body of a non-2xx render response.
#[derive(Debug, Default, Deserialize)]
pub struct RenderFailure {
    pub error: Option<String>,
    /// Full rendering-engine output.
    pub log: Option<String>,
}

impl RenderFailure {
    /// The engine log is the actionable diagnostic, so it wins over the short error.
    pub fn into_message(self) -> String {
        self.log
            .filter(|log| !log.trim().is_empty())
            .or(self.error.filter(|err| !err.trim().is_empty()))
            .unwrap_or_else(|| "An unknown error occurred during PDF generation.".to_string())
    }
}

// ── Summarize / Review ──────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArxivRequest<'a> {
    pub arxiv_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeResponse {
    #[serde(default)]
    pub success: bool,
    pub summary: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewResponse {
    #[serde(default)]
    pub success: bool,
    /// Object, JSON-encoded string, or plain text.
    pub review: Option<serde_json::Value>,
    pub error: Option<String>,
}

// ── Analysis ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest<'a> {
    pub input_text: &'a str,
    #[serde(rename = "type")]
    pub kind: AnalysisKind,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub success: bool,
    pub analysis: Option<serde_json::Value>,
    pub error: Option<String>,
}

// ── Chat ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub reply: Option<String>,
}

/// Resolve a `success`/payload/`error` triple.
///
/// `success: false` becomes an application error carrying the backend's
/// message (or `fallback`); `success: true` without the payload field is
/// malformed.
pub fn settle<T>(
    success: bool,
    payload: Option<T>,
    error: Option<String>,
    field: &str,
    fallback: &str,
) -> Result<T> {
    if !success {
        let message = error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        return Err(PaperdeskError::Application(message));
    }
    payload.ok_or_else(|| {
        PaperdeskError::MalformedPayload(format!("response is missing `{field}`"))
    })
}
