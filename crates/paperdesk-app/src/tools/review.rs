use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use paperdesk_client::Backend;
use paperdesk_core::request::RequestState;
use paperdesk_core::review::{ReviewPayload, ReviewResult};
use paperdesk_core::source::{SelectedFile, SourceSelection};

use crate::lifecycle::{lock, Lifecycle, Outcome};
use crate::notice::{Notice, NoticeSender};

pub struct ReviewTool {
    backend: Arc<dyn Backend>,
    notices: NoticeSender,
    selection: Mutex<SourceSelection>,
    review: Lifecycle<ReviewResult>,
}

impl ReviewTool {
    pub fn new(backend: Arc<dyn Backend>, notices: NoticeSender) -> Self {
        Self {
            backend,
            notices,
            selection: Mutex::new(SourceSelection::default()),
            review: Lifecycle::new(),
        }
    }

    pub fn edit<T>(&self, f: impl FnOnce(&mut SourceSelection) -> T) -> T {
        f(&mut lock(&self.selection))
    }

    /// Offer a file. Anything but a PDF is refused with an "Invalid File" notice.
    pub fn select_file(&self, file: SelectedFile) -> bool {
        let accepted = lock(&self.selection).select_file(file);
        match accepted {
            Ok(()) => true,
            Err(e) => {
                let _ = self.notices.send(Notice::from_error("Invalid File", &e));
                false
            }
        }
    }

    pub fn state(&self) -> RequestState {
        self.review.state()
    }

    pub fn review(&self) -> Option<ReviewResult> {
        self.review.result()
    }

    /// Request a review. A plain-text answer is shown as a notice and never
    /// becomes structured review state.
    pub async fn submit(&self) -> Outcome {
        if self.review.is_busy() {
            return Outcome::Ignored;
        }

        let source = lock(&self.selection).resolve("review");
        let source = match source {
            Ok(source) => source,
            Err(e) => {
                let _ = self.notices.send(Notice::from_error("Review Failed", &e));
                return Outcome::Rejected;
            }
        };

        if !self.review.try_begin() {
            return Outcome::Ignored;
        }

        info!("Requesting peer review");
        match self.backend.review(&source).await {
            Ok(ReviewPayload::Structured(review)) => {
                debug!(
                    score = review.score,
                    recommendation = %review.recommendation(),
                    "Review received"
                );
                self.review.succeed(review);
                let _ = self.notices.send(Notice::info(
                    "Review Complete",
                    "Peer review has been generated successfully.",
                ));
                Outcome::Succeeded
            }
            Ok(ReviewPayload::PlainText(text)) => {
                debug!("Review arrived as plain text");
                self.review.fail(text.clone());
                let _ = self.notices.send(Notice::info("Review Response", text));
                Outcome::Failed
            }
            Err(e) => {
                warn!("Review failed: {}", e);
                self.review.fail(e.user_message());
                let _ = self.notices.send(Notice::from_error("Review Failed", &e));
                Outcome::Failed
            }
        }
    }
}
