//! One function per subcommand. Each drives a single tool and prints its result.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use paperdesk_app::{
    AnalyzeTool, ChatTool, GenerateTool, NoticeSender, Outcome, ReviewTool, SummarizeTool,
};
use paperdesk_client::Backend;
use paperdesk_core::generation::GenerationInput;
use paperdesk_core::source::{SelectedFile, SourceKind, SourceSelection};
use paperdesk_core::PaperdeskConfig;

use crate::{render, AnalyzeArgs, Command, GenerateArgs, PreviewArgs, SourceArgs};

pub(crate) async fn run(
    command: Command,
    backend: Arc<dyn Backend>,
    notices: NoticeSender,
    config: &PaperdeskConfig,
) -> Result<Outcome> {
    let preview_dir = config.preview.resolved_dir();
    match command {
        Command::Generate(args) => generate(args, backend, notices, preview_dir).await,
        Command::Preview(args) => preview(args, backend, notices, preview_dir).await,
        Command::Summarize(source) => summarize(source, backend, notices).await,
        Command::Review { source, json } => review(source, json, backend, notices).await,
        Command::Analyze(args) => analyze(args, backend, notices).await,
        Command::Chat { message } => chat(message, backend).await,
    }
}

async fn generate(
    args: GenerateArgs,
    backend: Arc<dyn Backend>,
    notices: NoticeSender,
    preview_dir: PathBuf,
) -> Result<Outcome> {
    let tool = GenerateTool::new(backend, notices, preview_dir);
    tool.edit(|input| {
        *input = GenerationInput {
            topic: args.topic,
            research_question: args.research_question,
            methodology: args.methodology,
            length: args.length,
            domain: args.domain,
            style: args.style,
            institution: args.institution,
            city: args.city,
            country: args.country,
            email: args.email,
        }
    });

    let outcome = tool.submit().await;
    let Some(paper) = tool.paper() else {
        return Ok(outcome);
    };

    match &args.latex_out {
        Some(path) => {
            std::fs::write(path, &paper)
                .with_context(|| format!("writing LaTeX to {}", path.display()))?;
            info!(path = %path.display(), "LaTeX saved");
        }
        None => println!("{paper}"),
    }

    match args.preview_out {
        Some(dest) => render_preview(&tool, &dest).await,
        None => Ok(outcome),
    }
}

async fn preview(
    args: PreviewArgs,
    backend: Arc<dyn Backend>,
    notices: NoticeSender,
    preview_dir: PathBuf,
) -> Result<Outcome> {
    let latex = std::fs::read_to_string(&args.latex)
        .with_context(|| format!("reading {}", args.latex.display()))?;
    let dest = args
        .out
        .clone()
        .unwrap_or_else(|| args.latex.with_extension("pdf"));

    let tool = GenerateTool::new(backend, notices, preview_dir);
    tool.edit(|input| {
        input.topic = args.topic;
        input.research_question = args.research_question;
        input.style = args.style;
        input.institution = args.institution;
        input.city = args.city;
        input.country = args.country;
        input.email = args.email;
    });
    tool.load_paper(latex);
    render_preview(&tool, &dest).await
}

async fn render_preview(tool: &GenerateTool, dest: &Path) -> Result<Outcome> {
    let outcome = tool.preview().await;
    if outcome.is_success() {
        let copied = tool.with_preview(|doc| doc.map(|d| d.persist(dest)).transpose())?;
        if copied.is_some() {
            eprintln!("Preview saved to {}", dest.display());
        }
    }
    tool.dismiss_preview();
    Ok(outcome)
}

/// The two tools that take an arXiv ID or an uploaded PDF.
trait SourceTool {
    fn edit_source(&self, f: impl FnOnce(&mut SourceSelection));
    fn offer_file(&self, file: SelectedFile) -> bool;
}

impl SourceTool for SummarizeTool {
    fn edit_source(&self, f: impl FnOnce(&mut SourceSelection)) {
        self.edit(f)
    }

    fn offer_file(&self, file: SelectedFile) -> bool {
        self.select_file(file)
    }
}

impl SourceTool for ReviewTool {
    fn edit_source(&self, f: impl FnOnce(&mut SourceSelection)) {
        self.edit(f)
    }

    fn offer_file(&self, file: SelectedFile) -> bool {
        self.select_file(file)
    }
}

/// Apply `--arxiv` or `--file` to a tool's source selection.
///
/// A rejected file leaves the selection empty, so the submit that follows
/// is refused with "File Required".
fn choose_source(tool: &impl SourceTool, args: SourceArgs) -> Result<()> {
    if let Some(id) = args.arxiv {
        tool.edit_source(|s| {
            s.kind = SourceKind::Arxiv;
            s.arxiv_id = id;
        });
    } else if let Some(path) = args.file {
        let file = SelectedFile::from_path(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        tool.edit_source(|s| s.kind = SourceKind::Upload);
        tool.offer_file(file);
    }
    Ok(())
}

async fn summarize(
    source: SourceArgs,
    backend: Arc<dyn Backend>,
    notices: NoticeSender,
) -> Result<Outcome> {
    let tool = SummarizeTool::new(backend, notices);
    choose_source(&tool, source)?;

    let outcome = tool.submit().await;
    if let Some(summary) = tool.summary() {
        println!("{summary}");
    }
    Ok(outcome)
}

async fn review(
    source: SourceArgs,
    json: bool,
    backend: Arc<dyn Backend>,
    notices: NoticeSender,
) -> Result<Outcome> {
    let tool = ReviewTool::new(backend, notices);
    choose_source(&tool, source)?;

    let outcome = tool.submit().await;
    if let Some(review) = tool.review() {
        if json {
            println!("{}", serde_json::to_string_pretty(&review)?);
        } else {
            println!("{}", render::review(&review));
        }
    }
    Ok(outcome)
}

async fn analyze(
    args: AnalyzeArgs,
    backend: Arc<dyn Backend>,
    notices: NoticeSender,
) -> Result<Outcome> {
    let text = match (args.input.text, args.input.input) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?,
        (None, None) => String::new(),
    };

    let tool = AnalyzeTool::new(backend, notices);
    tool.set_text(text);
    tool.select_tab(args.kind);

    let outcome = tool.submit_active().await;
    if let Some(result) = tool.result() {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{}", render::analysis(&result));
        }
    }
    Ok(outcome)
}

async fn chat(message: Option<String>, backend: Arc<dyn Backend>) -> Result<Outcome> {
    let tool = ChatTool::new(backend);

    if let Some(message) = message {
        let outcome = tool.send(&message).await;
        if let Some(reply) = tool.last_reply() {
            println!("{reply}");
        }
        return Ok(outcome);
    }

    if let Some(greeting) = tool.last_reply() {
        println!("{greeting}");
    }
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if tool.send(&line).await != Outcome::Ignored {
            if let Some(reply) = tool.last_reply() {
                println!("{reply}");
            }
        }
    }
    Ok(Outcome::Succeeded)
}
