//! CLI binary for mdpress.
//!
//! A thin shim over the library crate that maps CLI flags to a `RunConfig`,
//! resolves the paper format (flag, interactive prompt, or default), and
//! prints the batch result.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mdpress::{
    convert_dir, BatchProgress, BatchProgressCallback, BatchSummary, PaperFormat, RunConfig,
};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};
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
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
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

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar for the batch, one log line per
/// document. Documents are sequential, so there is no out-of-order handling
/// to worry about.
struct CliProgress {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgress {
    /// Create a callback whose bar length is set by `on_run_start` once the
    /// input directory has been listed.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Scanning input directory…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} documents  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
    }
}

impl BatchProgressCallback for CliProgress {
    fn on_run_start(&self, total_documents: usize) {
        if total_documents == 0 {
            return;
        }
        self.activate_bar(total_documents);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Converting {total_documents} document(s)…"))
        ));
    }

    fn on_document_start(&self, name: &str, _index: usize, _total: usize) {
        self.bar.set_message(name.to_string());
    }

    fn on_document_complete(&self, name: &str, index: usize, total: usize, artifact: &str) {
        self.bar.println(format!(
            "  {} {:>2}/{:<2}  {name}  {}",
            green("✓"),
            index,
            total,
            dim(&format!("→ {artifact}")),
        ));
        self.bar.inc(1);
    }

    fn on_document_error(&self, name: &str, index: usize, total: usize, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);

        // First line only; browser errors can be multi-line essays.
        let first_line = error.lines().next().unwrap_or(error);
        let msg = if first_line.len() > 80 {
            format!("{}\u{2026}", &first_line[..79])
        } else {
            first_line.to_string()
        };

        self.bar.println(format!(
            "  {} {:>2}/{:<2}  {name}  {}",
            red("✗"),
            index,
            total,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, total_documents: usize, converted: usize) {
        let failed = total_documents.saturating_sub(converted);
        self.bar.finish_and_clear();

        if total_documents == 0 {
            // Nothing discovered; the summary printer has the message.
        } else if failed == 0 {
            eprintln!(
                "{} {} document(s) converted successfully",
                green("✔"),
                bold(&converted.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} document(s) converted  ({} failed)",
                if failed == total_documents {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&converted.to_string()),
                total_documents,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert ./markdown → ./pdf; prompts for a format when run interactively
  mdpress

  # Explicit format, no prompt
  mdpress --format A4

  # Custom directories
  mdpress --format a5 --input-dir docs --output-dir dist

  # Machine-readable summary for automation
  mdpress --format A4 --json --quiet

  # Inside a container without a Chrome on PATH
  mdpress --format A4 --browser-path /usr/bin/chromium --browser-arg --no-sandbox

PAPER FORMATS:
  Choice  Format  Margin   Base font  Size
  ──────  ──────  ──────   ─────────  ─────────────
  1       A2      25 mm    22 px      420 × 594 mm
  2       A3      22 mm    18 px      297 × 420 mm
  3       A4      20 mm    14 px      210 × 297 mm   (default)
  4       A5      12 mm    11 px      148 × 210 mm

  An unrecognised --format value logs a warning and falls back to A4.

OUTPUT:
  Artifacts are named <source-basename>.<format>.pdf (e.g. notes.a4.pdf).
  The output directory is created if missing and swept of *.pdf files
  before each run, so its contents always reflect the current input set.

ENVIRONMENT VARIABLES:
  MDPRESS_FORMAT       Paper format (same values as --format)
  MDPRESS_INPUT_DIR    Input directory
  MDPRESS_OUTPUT_DIR   Output directory
  MDPRESS_BROWSER      Path to a Chrome/Chromium executable

EXIT CODES:
  0  every discovered document converted (or none were found)
  1  at least one document failed to convert
  2  input directory unreadable or configuration invalid
"#;

/// Convert a directory of Markdown files to paginated PDFs.
#[derive(Parser, Debug)]
#[command(
    name = "mdpress",
    version,
    about = "Convert a directory of Markdown files to paginated PDFs via headless Chromium",
    long_about = "Convert every Markdown file in a directory into a paginated, print-styled PDF. \
Local image references (./path.png) are embedded as data URIs, the document is wrapped in a \
per-format print stylesheet, and a headless Chrome/Chromium instance prints it to PDF.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Paper format: A2, A3, A4, or A5 (case-insensitive).
    #[arg(
        short,
        long,
        env = "MDPRESS_FORMAT",
        long_help = "Paper format: A2, A3, A4, or A5 (case-insensitive).\n\
          Without this flag an interactive prompt is shown when stdin is a terminal;\n\
          otherwise A4 is used. Unrecognised values warn and fall back to A4."
    )]
    format: Option<String>,

    /// Directory scanned (non-recursively) for *.md files.
    #[arg(short, long, env = "MDPRESS_INPUT_DIR", default_value = "markdown")]
    input_dir: PathBuf,

    /// Directory receiving the PDFs; swept of stale *.pdf files first.
    #[arg(short, long, env = "MDPRESS_OUTPUT_DIR", default_value = "pdf")]
    output_dir: PathBuf,

    /// Path to a Chrome/Chromium executable (auto-detected if omitted).
    #[arg(long, env = "MDPRESS_BROWSER")]
    browser_path: Option<PathBuf>,

    /// Extra argument for the browser process (repeatable), e.g. --no-sandbox.
    #[arg(long, value_name = "ARG", allow_hyphen_values = true)]
    browser_arg: Vec<String>,

    /// Seconds to wait for the browser to launch.
    #[arg(long, env = "MDPRESS_LAUNCH_TIMEOUT", default_value_t = 30)]
    launch_timeout: u64,

    /// Output the batch summary as JSON on stdout.
    #[arg(long, env = "MDPRESS_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "MDPRESS_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MDPRESS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MDPRESS_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the progress bar is active;
    // the bar and its per-document lines carry the same information.
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

    match run(cli, show_progress).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", red("error:"));
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli, show_progress: bool) -> Result<ExitCode> {
    let format = resolve_format(&cli);

    let progress: Option<BatchProgress> = if show_progress {
        Some(CliProgress::new_dynamic() as Arc<dyn BatchProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, format, progress).context("Invalid configuration")?;

    let summary = convert_dir(&config).await.context("Conversion run failed")?;

    if cli.json {
        let json =
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?;
        println!("{json}");
    } else if !cli.quiet {
        print_summary(&cli, &summary, show_progress);
    }

    Ok(if summary.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Map CLI args to a `RunConfig`.
fn build_config(
    cli: &Cli,
    format: PaperFormat,
    progress: Option<BatchProgress>,
) -> Result<RunConfig> {
    let mut builder = RunConfig::builder()
        .input_dir(&cli.input_dir)
        .output_dir(&cli.output_dir)
        .format(format)
        .launch_timeout_secs(cli.launch_timeout);

    if let Some(ref path) = cli.browser_path {
        builder = builder.browser_executable(path);
    }
    for arg in &cli.browser_arg {
        builder = builder.browser_arg(arg.as_str());
    }
    if let Some(cb) = progress {
        builder = builder.progress(cb);
    }

    Ok(builder.build()?)
}

/// Resolve the paper format from the flag, the interactive prompt, or the default.
///
/// An unrecognised flag value never aborts: the run was explicitly
/// non-interactive, so it warns and proceeds at A4. The prompt only appears
/// when no flag was given and stdin is a terminal.
fn resolve_format(cli: &Cli) -> PaperFormat {
    match cli.format.as_deref() {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            eprintln!("{} {e}", yellow("warning:"));
            eprintln!("{} using {} instead", yellow("warning:"), PaperFormat::A4);
            PaperFormat::A4
        }),
        None if io::stdin().is_terminal() && !cli.quiet => prompt_for_format(),
        None => PaperFormat::A4,
    }
}

/// Interactive numeric format menu: 1–4, default 3 (A4).
fn prompt_for_format() -> PaperFormat {
    eprintln!("{}", bold("Select a paper format:"));
    for (i, format) in PaperFormat::ALL.iter().enumerate() {
        eprintln!(
            "  {}. {:<3} {}",
            i + 1,
            format.css_size(),
            dim(format.description())
        );
    }
    eprint!("Choice [1-4, default 3]: ");
    io::stderr().flush().ok();

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        return PaperFormat::A4;
    }
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return PaperFormat::A4;
    }

    match trimmed
        .parse::<u32>()
        .ok()
        .and_then(PaperFormat::from_menu_choice)
    {
        Some(format) => format,
        None => {
            eprintln!(
                "{} unrecognised choice '{trimmed}', using {}",
                yellow("warning:"),
                PaperFormat::A4
            );
            PaperFormat::A4
        }
    }
}

/// Human-readable run summary on stderr.
fn print_summary(cli: &Cli, summary: &BatchSummary, show_progress: bool) {
    if summary.discovered == 0 {
        eprintln!(
            "No Markdown documents found in '{}'. Nothing to do.",
            cli.input_dir.display()
        );
        return;
    }

    // The progress callback already printed per-document lines and the final
    // tick; only add the sweep count it does not know about.
    if show_progress {
        if summary.swept_artifacts > 0 {
            eprintln!(
                "   {}",
                dim(&format!(
                    "{} stale PDF(s) swept from {}",
                    summary.swept_artifacts,
                    cli.output_dir.display()
                ))
            );
        }
        return;
    }

    eprintln!(
        "Converted {}/{} document(s) in {}ms ({} stale PDF(s) swept)",
        summary.converted, summary.discovered, summary.total_duration_ms, summary.swept_artifacts
    );
    for outcome in summary.outcomes.iter().filter(|o| !o.succeeded()) {
        eprintln!(
            "  {} {}: {}",
            red("✗"),
            outcome.source,
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }
}
