//! CLI binary for resume-lens.
//!
//! A thin shim over the library: flags become an `AnalyzerConfig`, the file
//! and role become one `submit`, and the results view is drawn to stdout.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use resume_lens::{
    AnalysisResult, AnalyzerConfig, AppState, DocumentFile, IgnoreReason, Lifecycle, Renderer,
    Stage, SubmissionObserver, SubmitOutcome, View, ViewController,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn gold(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}

// ── Spinner observer ─────────────────────────────────────────────────────────

/// Shows the current stage on a spinner while a submission is in flight.
struct CliSpinner {
    bar: ProgressBar,
}

impl CliSpinner {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::hidden();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.yellow} {msg}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        Arc::new(Self { bar })
    }
}

impl SubmissionObserver for CliSpinner {
    fn on_lifecycle_change(&self, lifecycle: Lifecycle) {
        match lifecycle {
            Lifecycle::Submitting => {
                self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
                self.bar.enable_steady_tick(Duration::from_millis(80));
            }
            Lifecycle::Idle => self.bar.finish_and_clear(),
        }
    }

    fn on_stage(&self, stage: Stage) {
        self.bar.set_message(stage.message());
    }
}

// ── Renderers ────────────────────────────────────────────────────────────────

/// How the results view is drawn.
enum CliRenderer {
    Terminal,
    Json,
}

impl Renderer for CliRenderer {
    fn render(&self, state: &AppState) {
        match self {
            CliRenderer::Terminal => render_terminal(state),
            CliRenderer::Json => match &state.last_result {
                Some(result) => match serde_json::to_string_pretty(result) {
                    Ok(json) => println!("{json}"),
                    Err(e) => eprintln!("{} {}", red("✗"), e),
                },
                None => println!("null"),
            },
        }
    }
}

fn render_terminal(state: &AppState) {
    let Some(ref result) = state.last_result else {
        println!("{}", dim("No analysis yet. Upload a resume to get started."));
        return;
    };

    println!();
    println!("{}  {}", bold("ROLE"), state.selected_role);
    println!(
        "{}  {}/100    {}  {}",
        bold("SCORE"),
        gold(&result.score.to_string()),
        bold("MATCH"),
        gold(&result.role_alignment.match_level.to_string())
    );

    section("Overview");
    println!("  {}", result.overview);

    section("Strengths");
    bullets("●", &result.strengths);

    section("Skills");
    for (title, skills) in result.skills.buckets() {
        if !skills.is_empty() {
            println!("  {:<11} {}", dim(title), skills.join(", "));
        }
    }

    if !result.missing.is_empty() {
        section("Missing");
        for m in &result.missing {
            println!("  {} {}  {}", red("✗"), m.name, dim(&m.importance));
        }
    }

    render_improvements(result);

    section("Role alignment");
    bullets("-", &result.role_alignment.gaps);
    bullets("+", &result.role_alignment.suggestions);

    section("Action plan");
    for (i, step) in result.action_plan.iter().enumerate() {
        println!("  {} {}", gold(&format!("{}.", i + 1)), step);
    }
    println!();
}

fn render_improvements(result: &AnalysisResult) {
    if result.improvements.is_empty() {
        return;
    }
    section("Improvements");
    for imp in &result.improvements {
        println!("  {} {}", gold("IMP"), bold(&imp.recommendation));
        println!("      {} {}", dim("Why"), imp.reason);
        println!("      {} {}", dim("Act"), imp.action);
    }
}

fn section(title: &str) {
    println!();
    println!("{}", bold(&title.to_uppercase()));
}

fn bullets(marker: &str, items: &[String]) {
    for item in items {
        println!("  {} {}", dim(marker), item);
    }
}

// ── CLI ──────────────────────────────────────────────────────────────────────

const AFTER_HELP: &str = r#"EXAMPLES:
  # Critique a PDF resume for a role
  resume-lens resume.pdf --role "Backend Engineer"

  # Photographed resume (downscaled to 1500 px, sent as JPEG)
  resume-lens scan.jpg --role "Data Scientist"

  # Raw JSON for scripting
  resume-lens resume.pdf --role "SRE" --json > critique.json

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY   Google Gemini API key (required)
  RUST_LOG         Log filter, e.g. resume_lens=debug
"#;

/// Critique a resume against a target role using Gemini.
#[derive(Parser, Debug)]
#[command(
    name = "resume-lens",
    version,
    about = "Critique a resume (PDF or image) against a target job role using Gemini",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Resume file: PDF, PNG, JPEG, WebP or GIF.
    file: PathBuf,

    /// Target job role, e.g. "Backend Engineer".
    #[arg(short, long)]
    role: String,

    /// Gemini API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Override the MIME type inferred from the file extension.
    #[arg(long)]
    mime: Option<String>,

    /// Gemini model ID.
    #[arg(long, default_value = resume_lens::config::DEFAULT_MODEL)]
    model: String,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Longest image edge in pixels before upload.
    #[arg(long, default_value_t = 1500)]
    max_dimension: u32,

    /// JPEG quality (1–100) for re-encoded images.
    #[arg(long, default_value_t = 80, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Print the analysis as JSON instead of the formatted view.
    #[arg(long)]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except results and errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build controller ─────────────────────────────────────────────────
    let config = build_config(&cli)?;
    let renderer = if cli.json {
        CliRenderer::Json
    } else {
        CliRenderer::Terminal
    };
    let mut controller =
        ViewController::from_config(config, renderer).context("Failed to set up Gemini client")?;
    if show_progress {
        controller = controller.with_observer(CliSpinner::new());
    }

    let file = match cli.mime {
        Some(ref mime) => DocumentFile::with_mime(&cli.file, mime.clone()),
        None => DocumentFile::from_path(&cli.file),
    };

    // ── Run submission ───────────────────────────────────────────────────
    controller.navigate(View::Upload);
    match controller.submit(Some(file), &cli.role).await {
        SubmitOutcome::Completed => {
            if !cli.quiet && !cli.json {
                eprintln!("{} Analysis complete", green("✔"));
            }
            Ok(())
        }
        SubmitOutcome::Failed(kind) => {
            let message = controller
                .state()
                .last_error
                .unwrap_or_else(|| "An unknown error occurred".to_string());
            eprintln!("{} ERROR: {}", red("✘"), message);
            bail!("analysis failed ({kind:?})")
        }
        SubmitOutcome::Ignored(IgnoreReason::MissingRole) => bail!("--role must not be blank"),
        SubmitOutcome::Ignored(reason) => bail!("submission ignored: {reason:?}"),
    }
}

/// Map CLI args to `AnalyzerConfig`.
fn build_config(cli: &Cli) -> Result<AnalyzerConfig> {
    let mut builder = AnalyzerConfig::builder()
        .model(cli.model.clone())
        .request_timeout_secs(cli.timeout)
        .max_image_dimension(cli.max_dimension)
        .jpeg_quality(cli.quality);

    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key.clone());
    }

    builder.build().context("Invalid configuration")
}
