//! Paper generation and LaTeX preview.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use paperdesk_client::Backend;
use paperdesk_core::generation::GenerationInput;
use paperdesk_core::latex;
use paperdesk_core::request::RequestState;

use crate::lifecycle::{lock, Lifecycle, Outcome};
use crate::notice::{Notice, NoticeSender, EXTENDED_DURATION};
use crate::preview::PreviewDocument;

pub struct GenerateTool {
    backend: Arc<dyn Backend>,
    notices: NoticeSender,
    input: Mutex<GenerationInput>,
    /// Generated LaTeX source, stored verbatim.
    paper: Lifecycle<String>,
    preview: Lifecycle<PreviewDocument>,
    preview_dir: PathBuf,
}

impl GenerateTool {
    pub fn new(backend: Arc<dyn Backend>, notices: NoticeSender, preview_dir: PathBuf) -> Self {
        Self {
            backend,
            notices,
            input: Mutex::new(GenerationInput::default()),
            paper: Lifecycle::new(),
            preview: Lifecycle::new(),
            preview_dir,
        }
    }

    pub fn edit<T>(&self, f: impl FnOnce(&mut GenerationInput) -> T) -> T {
        f(&mut lock(&self.input))
    }

    pub fn input(&self) -> GenerationInput {
        lock(&self.input).clone()
    }

    pub fn state(&self) -> RequestState {
        self.paper.state()
    }

    pub fn paper(&self) -> Option<String> {
        self.paper.result()
    }

    /// Adopt previously generated LaTeX as the current paper, enabling preview.
    ///
    /// Refused while a preview is rendering.
    pub fn load_paper(&self, latex: String) -> bool {
        if self.preview.is_busy() {
            return false;
        }
        self.preview.take_result();
        self.paper.restore(latex)
    }

    /// Post the current configuration to the generation endpoint.
    ///
    /// Disabled while a preview is rendering, so no render of a discarded
    /// paper can settle after the new one arrives.
    pub async fn submit(&self) -> Outcome {
        if self.paper.is_busy() || self.preview.is_busy() {
            return Outcome::Ignored;
        }

        let input = self.input();
        if let Err(e) = input.validate() {
            let _ = self.notices.send(Notice::from_error("Generation Failed", &e));
            return Outcome::Rejected;
        }

        if !self.paper.try_begin() {
            return Outcome::Ignored;
        }
        // A preview of the discarded paper is stale.
        self.preview.take_result();

        info!(topic = %input.topic, style = %input.style, "Generating paper");
        match self.backend.generate_paper(&input).await {
            Ok(paper) => {
                self.paper.succeed(paper);
                let _ = self.notices.send(Notice::info(
                    "Paper Generated Successfully",
                    "Your research paper has been generated.",
                ));
                Outcome::Succeeded
            }
            Err(e) => {
                warn!("Paper generation failed: {}", e);
                self.paper.fail(e.user_message());
                let _ = self.notices.send(Notice::from_error("Generation Failed", &e));
                Outcome::Failed
            }
        }
    }

    pub fn preview_state(&self) -> RequestState {
        self.preview.state()
    }

    pub fn preview_path(&self) -> Option<PathBuf> {
        self.preview
            .with_result(|doc| doc.map(|d| d.path().to_path_buf()))
    }

    /// Run `f` against the current preview document, if any.
    pub fn with_preview<T>(&self, f: impl FnOnce(Option<&PreviewDocument>) -> T) -> T {
        self.preview.with_result(f)
    }

    /// The document the preview would send, or `None` before a paper exists.
    pub fn assembled_latex(&self) -> Option<String> {
        let paper = self.paper.result()?;
        Some(latex::assemble_preview(&self.input(), &paper, None))
    }

    /// Assemble the paper into the selected style's template and render it.
    ///
    /// Disabled until a paper has been generated. The previous preview is
    /// released before the render request is sent.
    pub async fn preview(&self) -> Outcome {
        if self.paper.is_busy() || self.preview.is_busy() {
            return Outcome::Ignored;
        }
        let Some(document) = self.assembled_latex() else {
            return Outcome::Ignored;
        };
        if !self.preview.try_begin() {
            return Outcome::Ignored;
        }

        let rendered = match self.backend.render_latex(&document).await {
            Ok(bytes) => PreviewDocument::write(&self.preview_dir, &bytes),
            Err(e) => Err(e),
        };

        match rendered {
            Ok(doc) => {
                info!(path = %doc.path().display(), "Preview ready");
                self.preview.succeed(doc);
                Outcome::Succeeded
            }
            Err(e) => {
                warn!("Preview failed: {}", e);
                self.preview.fail(e.user_message());
                let _ = self.notices.send(
                    Notice::from_error("PDF Preview Failed", &e).with_duration(EXTENDED_DURATION),
                );
                Outcome::Failed
            }
        }
    }

    /// Close the preview, releasing its document.
    pub fn dismiss_preview(&self) {
        drop(self.preview.take_result());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::{notice_channel, NoticeLevel};
    use crate::testing::{drain, FakeBackend, Reply};
    use paperdesk_core::generation::PaperStyle;
    use paperdesk_core::request::Status;
    use tokio::sync::Semaphore;

    fn tool(
        backend: Arc<FakeBackend>,
        dir: &std::path::Path,
    ) -> (GenerateTool, crate::notice::NoticeReceiver) {
        let (tx, rx) = notice_channel();
        (GenerateTool::new(backend, tx, dir.to_path_buf()), rx)
    }

    #[tokio::test]
    async fn blank_topic_never_reaches_backend() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FakeBackend::new());
        let (tool, mut rx) = tool(backend.clone(), dir.path());

        assert_eq!(tool.submit().await, Outcome::Rejected);
        assert_eq!(backend.call_count(), 0);
        let notices = drain(&mut rx);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].title, "Topic Required");
        assert_eq!(tool.state().status, Status::Idle);
    }

    #[tokio::test]
    async fn success_stores_paper_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FakeBackend::new());
        let (tool, mut rx) = tool(backend.clone(), dir.path());
        tool.edit(|i| i.topic = "Graph Learning".into());

        assert_eq!(tool.submit().await, Outcome::Succeeded);
        assert_eq!(tool.paper().as_deref(), Some("\\section{Intro}"));
        assert_eq!(backend.calls(), vec!["generate:Graph Learning".to_string()]);
        assert_eq!(drain(&mut rx)[0].title, "Paper Generated Successfully");
    }

    #[tokio::test]
    async fn backend_error_text_is_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FakeBackend::new());
        backend.set_paper(Reply::Application("Gemini API key is not configured.".into()));
        let (tool, mut rx) = tool(backend, dir.path());
        tool.edit(|i| i.topic = "Graphs".into());

        assert_eq!(tool.submit().await, Outcome::Failed);
        assert!(tool.paper().is_none());
        let state = tool.state();
        assert_eq!(state.status, Status::Error);
        assert_eq!(
            state.error_message.as_deref(),
            Some("Gemini API key is not configured.")
        );
        let notice = &drain(&mut rx)[0];
        assert_eq!(notice.title, "Generation Failed");
        assert_eq!(notice.description, "Gemini API key is not configured.");
        assert_eq!(notice.level, NoticeLevel::Destructive);
    }

    #[tokio::test]
    async fn preview_disabled_before_generation() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FakeBackend::new());
        let (tool, _rx) = tool(backend.clone(), dir.path());

        assert_eq!(tool.preview().await, Outcome::Ignored);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn preview_sends_assembled_document_and_replaces_previous() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FakeBackend::new());
        let (tool, _rx) = tool(backend.clone(), dir.path());
        tool.edit(|i| {
            i.topic = "Graph Learning".into();
            i.style = PaperStyle::Springer;
        });
        tool.load_paper(
            "```latex\n\\documentclass{article}\n\\begin{document}\nBody\n\\end{document}\n```"
                .into(),
        );

        assert_eq!(tool.preview().await, Outcome::Succeeded);
        let first = tool.preview_path().unwrap();
        assert!(first.exists());

        let sent = &backend.calls()[0];
        assert!(sent.starts_with("render:\\documentclass{svjour3}"));
        assert!(sent.contains("\\title{Graph Learning}"));

        assert_eq!(tool.preview().await, Outcome::Succeeded);
        let second = tool.preview_path().unwrap();
        assert_ne!(first, second);
        assert!(!first.exists());
        assert!(second.exists());

        tool.dismiss_preview();
        assert!(!second.exists());
        assert!(tool.preview_path().is_none());
    }

    #[tokio::test]
    async fn preview_failure_shows_log_for_longer() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FakeBackend::new());
        backend.set_render(Reply::Render("! Undefined control sequence.".into()));
        let (tool, mut rx) = tool(backend, dir.path());
        tool.edit(|i| i.topic = "T".into());
        tool.load_paper("Body".into());

        assert_eq!(tool.preview().await, Outcome::Failed);
        assert!(tool.preview_path().is_none());
        let notice = &drain(&mut rx)[0];
        assert_eq!(notice.title, "PDF Preview Failed");
        assert_eq!(notice.description, "! Undefined control sequence.");
        assert_eq!(notice.duration, EXTENDED_DURATION);
    }

    #[tokio::test]
    async fn new_generation_releases_stale_preview() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FakeBackend::new());
        let (tool, _rx) = tool(backend, dir.path());
        tool.edit(|i| i.topic = "T".into());
        tool.load_paper("Body".into());
        assert_eq!(tool.preview().await, Outcome::Succeeded);
        let path = tool.preview_path().unwrap();

        assert_eq!(tool.submit().await, Outcome::Succeeded);
        assert!(!path.exists());
        assert!(tool.preview_path().is_none());
    }

    #[tokio::test]
    async fn generation_and_reload_refused_while_preview_renders() {
        let dir = tempfile::tempdir().unwrap();
        let gate = Arc::new(Semaphore::new(0));
        let backend = Arc::new(FakeBackend::new().gated(gate.clone()));
        let (tool, _rx) = tool(backend.clone(), dir.path());
        let tool = Arc::new(tool);
        tool.edit(|i| i.topic = "T".into());
        tool.load_paper("OLD BODY".into());

        let rendering = tokio::spawn({
            let tool = tool.clone();
            async move { tool.preview().await }
        });
        backend.started.notified().await;
        assert_eq!(tool.preview_state().status, Status::Busy);

        assert_eq!(tool.submit().await, Outcome::Ignored);
        assert!(!tool.load_paper("NEW BODY".into()));
        assert_eq!(tool.preview().await, Outcome::Ignored);
        assert_eq!(backend.call_count(), 1);

        gate.add_permits(1);
        assert_eq!(rendering.await.unwrap(), Outcome::Succeeded);
        assert_eq!(tool.paper().as_deref(), Some("OLD BODY"));
        let held = tool.preview_path().unwrap();

        gate.add_permits(1);
        assert_eq!(tool.submit().await, Outcome::Succeeded);
        assert!(!held.exists());
        assert!(tool.preview_path().is_none());
    }
}
