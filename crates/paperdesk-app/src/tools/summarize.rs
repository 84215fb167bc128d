use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use paperdesk_client::Backend;
use paperdesk_core::request::RequestState;
use paperdesk_core::source::{SelectedFile, SourceSelection};

use crate::lifecycle::{lock, Lifecycle, Outcome};
use crate::notice::{Notice, NoticeSender};

pub struct SummarizeTool {
    backend: Arc<dyn Backend>,
    notices: NoticeSender,
    selection: Mutex<SourceSelection>,
    summary: Lifecycle<String>,
}

impl SummarizeTool {
    pub fn new(backend: Arc<dyn Backend>, notices: NoticeSender) -> Self {
        Self {
            backend,
            notices,
            selection: Mutex::new(SourceSelection::default()),
            summary: Lifecycle::new(),
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
        self.summary.state()
    }

    pub fn summary(&self) -> Option<String> {
        self.summary.result()
    }

    pub async fn submit(&self) -> Outcome {
        if self.summary.is_busy() {
            return Outcome::Ignored;
        }

        let source = lock(&self.selection).resolve("summarize");
        let source = match source {
            Ok(source) => source,
            Err(e) => {
                let _ = self.notices.send(Notice::from_error("Summarization Failed", &e));
                return Outcome::Rejected;
            }
        };

        if !self.summary.try_begin() {
            return Outcome::Ignored;
        }

        info!("Summarizing paper");
        match self.backend.summarize(&source).await {
            Ok(summary) => {
                self.summary.succeed(summary);
                let _ = self
                    .notices
                    .send(Notice::info("Summary Generated", "Paper successfully summarized."));
                Outcome::Succeeded
            }
            Err(e) => {
                warn!("Summarization failed: {}", e);
                self.summary.fail(e.user_message());
                let _ = self
                    .notices
                    .send(Notice::from_error("Summarization Failed", &e));
                Outcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::notice_channel;
    use crate::testing::{drain, FakeBackend, Reply};
    use paperdesk_core::request::Status;
    use paperdesk_core::source::{SourceKind, PDF_MIME};
    use tokio::sync::Semaphore;

    #[tokio::test]
    async fn empty_arxiv_id_is_rejected_locally() {
        let backend = Arc::new(FakeBackend::new());
        let (tx, mut rx) = notice_channel();
        let tool = SummarizeTool::new(backend.clone(), tx);

        assert_eq!(tool.submit().await, Outcome::Rejected);
        assert_eq!(backend.call_count(), 0);
        assert_eq!(drain(&mut rx)[0].title, "arXiv ID Required");
    }

    #[tokio::test]
    async fn upload_requires_accepted_file() {
        let backend = Arc::new(FakeBackend::new());
        let (tx, mut rx) = notice_channel();
        let tool = SummarizeTool::new(backend.clone(), tx);
        tool.edit(|s| s.kind = SourceKind::Upload);

        assert!(!tool.select_file(SelectedFile {
            name: "notes.txt".into(),
            mime: "text/plain".into(),
            bytes: Vec::new(),
        }));
        assert!(tool.edit(|s| s.file().is_none()));

        assert_eq!(tool.submit().await, Outcome::Rejected);
        let titles: Vec<_> = drain(&mut rx).into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["Invalid File", "File Required"]);

        assert!(tool.select_file(SelectedFile {
            name: "paper.pdf".into(),
            mime: PDF_MIME.into(),
            bytes: b"%PDF-1.7".to_vec(),
        }));
        assert_eq!(tool.submit().await, Outcome::Succeeded);
        assert_eq!(backend.calls(), vec!["summarize:upload=paper.pdf".to_string()]);
    }

    #[tokio::test]
    async fn new_summary_replaces_previous_and_failure_clears_it() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_summary(Reply::Ok("first".into()));
        let (tx, mut rx) = notice_channel();
        let tool = SummarizeTool::new(backend.clone(), tx);
        tool.edit(|s| s.arxiv_id = "2106.15928".into());

        assert_eq!(tool.submit().await, Outcome::Succeeded);
        assert_eq!(tool.summary().as_deref(), Some("first"));

        backend.set_summary(Reply::Ok("second".into()));
        assert_eq!(tool.submit().await, Outcome::Succeeded);
        assert_eq!(tool.summary().as_deref(), Some("second"));
        drain(&mut rx);

        backend.set_summary(Reply::Transport("connection refused".into()));
        assert_eq!(tool.submit().await, Outcome::Failed);
        assert!(tool.summary().is_none());
        assert_eq!(tool.state().status, Status::Error);
        assert_eq!(drain(&mut rx)[0].title, "Summarization Failed");
    }

    #[tokio::test]
    async fn second_submit_while_busy_is_a_no_op() {
        let gate = Arc::new(Semaphore::new(0));
        let backend = Arc::new(FakeBackend::new().gated(gate.clone()));
        let (tx, _rx) = notice_channel();
        let tool = Arc::new(SummarizeTool::new(backend.clone(), tx));
        tool.edit(|s| s.arxiv_id = "2106.15928".into());

        let first = tokio::spawn({
            let tool = tool.clone();
            async move { tool.submit().await }
        });
        backend.started.notified().await;
        assert_eq!(tool.state().status, Status::Busy);

        assert_eq!(tool.submit().await, Outcome::Ignored);
        assert_eq!(backend.call_count(), 1);

        gate.add_permits(1);
        assert_eq!(first.await.unwrap(), Outcome::Succeeded);
        assert_eq!(backend.call_count(), 1);
        assert_eq!(tool.summary().as_deref(), Some("A summary."));
    }
}
