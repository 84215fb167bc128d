//! Scripted in-memory backend for orchestrator tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, Semaphore};

use paperdesk_client::Backend;
use paperdesk_core::analysis::{AnalysisKind, AnalysisResult};
use paperdesk_core::error::{PaperdeskError, Result};
use paperdesk_core::generation::GenerationInput;
use paperdesk_core::review::ReviewPayload;
use paperdesk_core::source::PaperSource;

use crate::notice::{Notice, NoticeReceiver};

/// A canned answer. `PaperdeskError` is not `Clone`, so failures are described instead.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Application(String),
    Transport(String),
    Render(String),
}

impl<T: Clone> Reply<T> {
    fn to_result(&self) -> Result<T> {
        match self {
            Reply::Ok(v) => Ok(v.clone()),
            Reply::Application(m) => Err(PaperdeskError::Application(m.clone())),
            Reply::Transport(m) => Err(PaperdeskError::Transport(m.clone())),
            Reply::Render(m) => Err(PaperdeskError::Render(m.clone())),
        }
    }
}

pub struct FakeBackend {
    paper: Mutex<Reply<String>>,
    render: Mutex<Reply<Vec<u8>>>,
    summary: Mutex<Reply<String>>,
    review: Mutex<Reply<ReviewPayload>>,
    analysis: Mutex<Reply<AnalysisResult>>,
    chat: Mutex<Reply<Option<String>>>,
    /// Every call, as `"<operation>:<detail>"`.
    calls: Mutex<Vec<String>>,
    /// Signalled when a call starts.
    pub started: Notify,
    /// When set, each call waits for a permit before answering.
    gate: Option<Arc<Semaphore>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            paper: Mutex::new(Reply::Ok("\\section{Intro}".into())),
            render: Mutex::new(Reply::Ok(b"%PDF-1.4".to_vec())),
            summary: Mutex::new(Reply::Ok("A summary.".into())),
            review: Mutex::new(Reply::Ok(ReviewPayload::PlainText("review".into()))),
            analysis: Mutex::new(Reply::Application("no analysis scripted".into())),
            chat: Mutex::new(Reply::Ok(Some("Hello!".into()))),
            calls: Mutex::new(Vec::new()),
            started: Notify::new(),
            gate: None,
        }
    }

    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn set_paper(&self, reply: Reply<String>) {
        *self.paper.lock().unwrap() = reply;
    }

    pub fn set_render(&self, reply: Reply<Vec<u8>>) {
        *self.render.lock().unwrap() = reply;
    }

    pub fn set_summary(&self, reply: Reply<String>) {
        *self.summary.lock().unwrap() = reply;
    }

    pub fn set_review(&self, reply: Reply<ReviewPayload>) {
        *self.review.lock().unwrap() = reply;
    }

    pub fn set_analysis(&self, reply: Reply<AnalysisResult>) {
        *self.analysis.lock().unwrap() = reply;
    }

    pub fn set_chat(&self, reply: Reply<Option<String>>) {
        *self.chat.lock().unwrap() = reply;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    async fn enter(&self, call: String) {
        self.calls.lock().unwrap().push(call);
        self.started.notify_one();
        if let Some(ref gate) = self.gate {
            gate.acquire().await.unwrap().forget();
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn generate_paper(&self, input: &GenerationInput) -> Result<String> {
        self.enter(format!("generate:{}", input.topic)).await;
        self.paper.lock().unwrap().to_result()
    }

    async fn render_latex(&self, latex: &str) -> Result<Vec<u8>> {
        self.enter(format!("render:{latex}")).await;
        self.render.lock().unwrap().to_result()
    }

    async fn summarize(&self, source: &PaperSource) -> Result<String> {
        self.enter(format!("summarize:{}", describe(source))).await;
        self.summary.lock().unwrap().to_result()
    }

    async fn review(&self, source: &PaperSource) -> Result<ReviewPayload> {
        self.enter(format!("review:{}", describe(source))).await;
        self.review.lock().unwrap().to_result()
    }

    async fn analyze(&self, text: &str, kind: AnalysisKind) -> Result<AnalysisResult> {
        self.enter(format!("analyze:{kind}:{text}")).await;
        self.analysis.lock().unwrap().to_result()
    }

    async fn chat(&self, message: &str) -> Result<Option<String>> {
        self.enter(format!("chat:{message}")).await;
        self.chat.lock().unwrap().to_result()
    }
}

fn describe(source: &PaperSource) -> String {
    match source {
        PaperSource::Arxiv(id) => format!("arxiv={id}"),
        PaperSource::Upload(file) => format!("upload={}", file.name()),
    }
}

/// Everything queued on the notice channel so far.
pub fn drain(rx: &mut NoticeReceiver) -> Vec<Notice> {
    let mut notices = Vec::new();
    while let Ok(notice) = rx.try_recv() {
        notices.push(notice);
    }
    notices
}
