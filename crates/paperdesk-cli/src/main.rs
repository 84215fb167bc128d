mod commands;
mod render;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use paperdesk_app::{notice_channel, NoticeLevel, NoticeReceiver, Outcome};
use paperdesk_client::BackendClient;
use paperdesk_core::analysis::AnalysisKind;
use paperdesk_core::generation::{PaperLength, PaperStyle};
use paperdesk_core::PaperdeskConfig;

/// paperdesk: generate, preview, summarize, review and analyze academic papers.
///
/// Every command talks to the paperdesk backend over HTTP. Results go to
/// stdout; notices and logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "paperdesk", version, about)]
struct Cli {
    /// Backend origin, e.g. http://localhost:5000 (overrides the config file).
    #[arg(long, env = "PAPERDESK_BACKEND_URL", global = true)]
    backend: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a paper from a research topic.
    Generate(GenerateArgs),
    /// Render a previously generated paper to PDF.
    Preview(PreviewArgs),
    /// Summarize an arXiv paper or an uploaded PDF.
    Summarize(SourceArgs),
    /// Peer-review an arXiv paper or an uploaded PDF.
    Review {
        #[command(flatten)]
        source: SourceArgs,
        /// Print the structured review as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Run a plagiarism, novelty or citation analysis.
    Analyze(AnalyzeArgs),
    /// Ask the research assistant. Reads questions from stdin when no message is given.
    Chat { message: Option<String> },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[arg(long)]
    topic: String,
    #[arg(long, default_value = "")]
    research_question: String,
    #[arg(long, default_value = "")]
    methodology: String,
    /// Length in pages: 3, 5, 8, 10 or 15.
    #[arg(long, default_value = "5")]
    length: PaperLength,
    #[arg(long, default_value = "")]
    domain: String,
    /// ieee, arxiv or springer.
    #[arg(long, default_value = "ieee")]
    style: PaperStyle,
    #[arg(long, default_value = "")]
    institution: String,
    #[arg(long, default_value = "")]
    city: String,
    #[arg(long, default_value = "")]
    country: String,
    #[arg(long, default_value = "")]
    email: String,
    /// Write the generated LaTeX here instead of stdout.
    #[arg(long)]
    latex_out: Option<PathBuf>,
    /// Also render a preview and save the PDF here.
    #[arg(long)]
    preview_out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// LaTeX produced by an earlier `generate`.
    #[arg(long)]
    latex: PathBuf,
    #[arg(long)]
    topic: String,
    #[arg(long, default_value = "")]
    research_question: String,
    #[arg(long, default_value = "ieee")]
    style: PaperStyle,
    #[arg(long, default_value = "")]
    institution: String,
    #[arg(long, default_value = "")]
    city: String,
    #[arg(long, default_value = "")]
    country: String,
    #[arg(long, default_value = "")]
    email: String,
    /// Where to save the PDF (defaults to the LaTeX path with a .pdf extension).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// arXiv paper ID, e.g. 2106.15928.
    #[arg(long)]
    arxiv: Option<String>,
    /// Local PDF to upload.
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    #[arg(long)]
    kind: AnalysisKind,
    #[command(flatten)]
    input: AnalyzeInput,
    /// Print the structured result as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct AnalyzeInput {
    #[arg(long)]
    text: Option<String>,
    /// Read the text to analyze from a file.
    #[arg(long)]
    input: Option<PathBuf>,
}

async fn print_notices(mut rx: NoticeReceiver) {
    while let Some(notice) = rx.recv().await {
        if notice.level == NoticeLevel::Destructive {
            tracing::debug!(title = %notice.title, "Destructive notice");
        }
        eprintln!("[{}] {}", notice.title, notice.description);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = PaperdeskConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
        PaperdeskConfig::default()
    });
    if let Some(url) = cli.backend {
        config = config.with_base_url(url);
    }

    tracing::info!(
        backend = %config.backend.base_url,
        "Starting paperdesk v{}",
        env!("CARGO_PKG_VERSION")
    );

    let backend = Arc::new(BackendClient::new(&config.backend));
    let (tx, rx) = notice_channel();
    let printer = tokio::spawn(print_notices(rx));

    // `tx` moves into the command; the printer ends once every tool is dropped.
    let outcome = commands::run(cli.command, backend, tx, &config).await;
    let _ = printer.await;

    match outcome? {
        Outcome::Succeeded | Outcome::Ignored => Ok(()),
        Outcome::Rejected | Outcome::Failed => std::process::exit(1),
    }
}
