use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use paperdesk_client::Backend;
use paperdesk_core::analysis::{AnalysisInput, AnalysisKind, AnalysisResult, ADVISORY_MIN_WORDS};
use paperdesk_core::request::RequestState;

use crate::lifecycle::{lock, Lifecycle, Outcome};
use crate::notice::{Notice, NoticeSender};

/// Plagiarism, novelty and citation analysis over one shared text box.
///
/// Each kind is triggered explicitly; changing the active tab neither
/// clears the text nor starts an analysis. A new analysis replaces the
/// previous result whatever its kind.
pub struct AnalyzeTool {
    backend: Arc<dyn Backend>,
    notices: NoticeSender,
    input: Mutex<AnalysisInput>,
    active: Mutex<AnalysisKind>,
    result: Lifecycle<AnalysisResult>,
}

impl AnalyzeTool {
    pub fn new(backend: Arc<dyn Backend>, notices: NoticeSender) -> Self {
        Self {
            backend,
            notices,
            input: Mutex::new(AnalysisInput::default()),
            active: Mutex::new(AnalysisKind::Plagiarism),
            result: Lifecycle::new(),
        }
    }

    pub fn set_text(&self, text: impl Into<String>) {
        lock(&self.input).text = text.into();
    }

    pub fn text(&self) -> String {
        lock(&self.input).text.clone()
    }

    pub fn active_tab(&self) -> AnalysisKind {
        *lock(&self.active)
    }

    pub fn select_tab(&self, kind: AnalysisKind) {
        *lock(&self.active) = kind;
    }

    pub fn state(&self) -> RequestState {
        self.result.state()
    }

    pub fn result(&self) -> Option<AnalysisResult> {
        self.result.result()
    }

    /// Run the analysis for the active tab.
    pub async fn submit_active(&self) -> Outcome {
        self.submit(self.active_tab()).await
    }

    pub async fn submit(&self, kind: AnalysisKind) -> Outcome {
        if self.result.is_busy() {
            return Outcome::Ignored;
        }

        let input = lock(&self.input).clone();
        if let Err(e) = input.validate() {
            let _ = self.notices.send(Notice::from_error("Analysis Failed", &e));
            return Outcome::Rejected;
        }
        if !input.meets_advisory_length() {
            warn!(
                words = input.word_count(),
                "Input is under {} words; results may be unreliable", ADVISORY_MIN_WORDS
            );
        }

        if !self.result.try_begin() {
            return Outcome::Ignored;
        }

        info!(kind = %kind, "Running analysis");
        match self.backend.analyze(&input.text, kind).await {
            Ok(result) => {
                self.result.succeed(result);
                let _ = self.notices.send(Notice::info(
                    "Analysis Complete",
                    format!("{kind} analysis completed successfully."),
                ));
                Outcome::Succeeded
            }
            Err(e) => {
                warn!(kind = %kind, "Analysis failed: {}", e);
                self.result.fail(e.user_message());
                let _ = self.notices.send(Notice::from_error("Analysis Failed", &e));
                Outcome::Failed
            }
        }
    }
}
