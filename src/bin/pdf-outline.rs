//! CLI binary for pdf-outline.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `OutlineConfig`, runs one document or a whole directory, and prints
//! results.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_outline::{
    extract_outline, extract_to_file, inspect, process_directory, BatchProgressCallback,
    ContinuationMerge, JoinPolicy, KeywordGate, OutlineConfig, ProgressCallback,
};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
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
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress for directory runs: one bar for the batch and a log
/// line per finished document. Documents finish out of order.
struct CliProgressCallback {
    bar: ProgressBar,
    start_times: Mutex<HashMap<String, Instant>>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS),
        );
        bar.set_prefix("Scanning");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
            errors: AtomicUsize::new(0),
        })
    }

    fn elapsed_secs(&self, name: &str) -> f64 {
        self.start_times
            .lock()
            .ok()
            .and_then(|mut times| times.remove(name))
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_documents: usize) {
        self.bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} PDFs  \
                 ⏱ {elapsed_precise}  ETA {eta_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(TICKS),
        );
        self.bar.set_length(total_documents as u64);
        self.bar.set_prefix("Outlining");
        self.bar.reset_eta();
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Processing {total_documents} PDFs…"))
        ));
    }

    fn on_document_start(&self, name: &str) {
        if let Ok(mut times) = self.start_times.lock() {
            times.insert(name.to_string(), Instant::now());
        }
        self.bar.set_message(name.to_string());
    }

    fn on_document_complete(&self, name: &str, headings: usize) {
        let secs = self.elapsed_secs(name);
        self.bar.println(format!(
            "  {} {:<40}  {}  {}",
            green("✓"),
            name,
            dim(&format!("{headings:>3} headings")),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_document_error(&self, name: &str, error: &str) {
        let secs = self.elapsed_secs(name);
        self.errors.fetch_add(1, Ordering::SeqCst);

        // First line only; the library's messages carry remediation hints below it.
        let first_line = error.lines().next().unwrap_or(error);
        let msg: String = if first_line.chars().count() > 80 {
            first_line.chars().take(79).chain(['…']).collect()
        } else {
            first_line.to_string()
        };

        self.bar.println(format!(
            "  {} {:<40}  {}  {}",
            red("✗"),
            name,
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_documents: usize, success_count: usize) {
        let failed = total_documents.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} PDFs outlined successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} PDFs outlined  ({} written as empty outlines)",
                if failed == total_documents {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_documents,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # One document, JSON on stdout
  pdf-outline document.pdf

  # One document to a file
  pdf-outline document.pdf -o document.json

  # Every PDF in a directory, one <stem>.json each
  pdf-outline input/ -o output/

  # CJK-heavy documents where fragments should always be glued
  pdf-outline --join concat report.pdf

  # Accept plain-styled "References", "目次", … as headings
  pdf-outline --keyword-gate always thesis.pdf

  # Only merge wrapped headings whose lines are close together
  pdf-outline --merge-max-gap 1.5 brochure.pdf

  # Inspect PDF metadata
  pdf-outline --inspect-only document.pdf

OUTPUT:
  {
    "title": "Understanding AI ",
    "outline": [
      { "level": "H1", "text": "1. Introduction ", "page": 1 },
      { "level": "H2", "text": "1.1 Scope ", "page": 2 }
    ]
  }

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to libpdfium (file or directory)
  RUST_LOG          Override the log filter (e.g. pdf_outline=trace)
  PDF_OUTLINE_*     Every flag, e.g. PDF_OUTLINE_CONCURRENCY=8
"#;

/// Infer document outlines (title + H1/H2/H3 headings) from PDFs.
#[derive(Parser, Debug)]
#[command(
    name = "pdf-outline",
    version,
    about = "Infer document outlines (title + H1/H2/H3 headings) from PDFs",
    long_about = "Reads the styled text layer of a PDF through pdfium and infers its title and \
a three-level heading outline from numbering, canonical section names and typography. Works \
on a single file or on every PDF in a directory.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// A PDF file, or a directory of PDFs.
    input: PathBuf,

    /// Output file (single PDF; default stdout) or directory (batch; default ./output).
    #[arg(short, long, env = "PDF_OUTLINE_OUTPUT")]
    output: Option<PathBuf>,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF_OUTLINE_PASSWORD")]
    password: Option<String>,

    /// PDFs processed concurrently in directory mode.
    #[arg(short, long, env = "PDF_OUTLINE_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// How text fragments are joined: auto (script-aware), space, concat.
    #[arg(long, env = "PDF_OUTLINE_JOIN", value_enum, default_value = "auto")]
    join: JoinArg,

    /// Styling a known section name needs: emphasized (bold or large), always.
    #[arg(long, env = "PDF_OUTLINE_KEYWORD_GATE", value_enum, default_value = "emphasized")]
    keyword_gate: KeywordGateArg,

    /// Accept numbered headings at any indentation.
    #[arg(long, env = "PDF_OUTLINE_NO_MARGIN_CHECK")]
    no_margin_check: bool,

    /// Never merge a numbered stub ("3.") with the line that follows it.
    #[arg(long, env = "PDF_OUTLINE_NO_MERGE")]
    no_merge: bool,

    /// Only merge when the continuation starts within this many font sizes
    /// below the stub.
    #[arg(long, env = "PDF_OUTLINE_MERGE_MAX_GAP")]
    merge_max_gap: Option<f32>,

    /// Words a numbered stub may carry after its number and still be merged.
    #[arg(long, env = "PDF_OUTLINE_MERGE_MAX_WORDS", default_value_t = 3)]
    merge_max_words: usize,

    /// Do not append a trailing space to the title and heading texts.
    #[arg(long, env = "PDF_OUTLINE_NO_TRAILING_SPACE")]
    no_trailing_space: bool,

    /// Disable the progress bar in directory mode.
    #[arg(long, env = "PDF_OUTLINE_NO_PROGRESS")]
    no_progress: bool,

    /// Print PDF metadata only.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF_OUTLINE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF_OUTLINE_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum JoinArg {
    Auto,
    Space,
    Concat,
}

impl From<JoinArg> for JoinPolicy {
    fn from(v: JoinArg) -> Self {
        match v {
            JoinArg::Auto => JoinPolicy::Auto,
            JoinArg::Space => JoinPolicy::Space,
            JoinArg::Concat => JoinPolicy::Concat,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum KeywordGateArg {
    Emphasized,
    Always,
}

impl From<KeywordGateArg> for KeywordGate {
    fn from(v: KeywordGateArg) -> Self {
        match v {
            KeywordGateArg::Emphasized => KeywordGate::Emphasized,
            KeywordGateArg::Always => KeywordGate::Always,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let batch = cli.input.is_dir();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar gives all the feedback that matters in directory
    // mode, so INFO-level library logs are suppressed while it is active.
    let show_progress = batch && !cli.quiet && !cli.no_progress;
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

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        if batch {
            bail!("--inspect-only takes a single PDF, got directory {:?}", cli.input);
        }
        let meta = inspect(&cli.input, cli.password.as_deref())
            .await
            .context("Failed to inspect PDF")?;

        println!("File:         {}", cli.input.display());
        for (label, value) in [
            ("Title:       ", &meta.title),
            ("Author:      ", &meta.author),
            ("Subject:     ", &meta.subject),
            ("Producer:    ", &meta.producer),
            ("Creator:     ", &meta.creator),
        ] {
            if let Some(v) = value {
                println!("{label} {v}");
            }
        }
        println!("Pages:        {}", meta.page_count);
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn BatchProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run ──────────────────────────────────────────────────────────────
    if batch {
        let output_dir = cli.output.clone().unwrap_or_else(|| PathBuf::from("output"));
        let report = process_directory(&cli.input, &output_dir, &config)
            .await
            .with_context(|| format!("Failed to process directory {:?}", cli.input))?;

        if !cli.quiet && !show_progress {
            eprintln!(
                "Outlined {}/{} PDFs in {}ms → {}",
                report.succeeded,
                report.documents.len(),
                report.total_duration_ms,
                output_dir.display()
            );
        }
        if !cli.quiet {
            for doc in report.documents.iter().filter(|d| d.error.is_some()) {
                eprintln!(
                    "  {} {}  {}",
                    red("✗"),
                    doc.input.display(),
                    dim("written as an empty outline")
                );
            }
        }
    } else if let Some(ref output_path) = cli.output {
        let start = Instant::now();
        let outline = extract_to_file(&cli.input, output_path, &config)
            .await
            .context("Outline extraction failed")?;

        if !cli.quiet {
            eprintln!(
                "{}  {} headings  {}ms  →  {}",
                green("✔"),
                outline.outline.len(),
                start.elapsed().as_millis(),
                bold(&output_path.display().to_string()),
            );
        }
    } else {
        let outline = extract_outline(&cli.input, &config)
            .await
            .context("Outline extraction failed")?;
        let json = outline.to_json_pretty().context("Failed to serialise outline")?;

        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{json}").context("Failed to write to stdout")?;
    }

    Ok(())
}

/// Map CLI args to `OutlineConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<OutlineConfig> {
    let continuation = if cli.no_merge {
        ContinuationMerge::disabled()
    } else {
        ContinuationMerge {
            enabled: true,
            max_stub_words: cli.merge_max_words,
            max_vertical_gap: cli.merge_max_gap,
        }
    };

    let mut builder = OutlineConfig::builder()
        .concurrency(cli.concurrency)
        .join(cli.join.into())
        .keyword_gate(cli.keyword_gate.into())
        .continuation(continuation)
        .trailing_space(!cli.no_trailing_space);

    if cli.no_margin_check {
        builder = builder.numbered_margin_tolerance(None);
    }
    if let Some(ref password) = cli.password {
        builder = builder.password(password.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
