//! # mdpress
//!
//! Convert a directory of Markdown documents into paginated PDF files by
//! rendering print-styled HTML through a headless Chromium instance.
//!
//! ## Why a browser?
//!
//! Pure-Rust PDF writers force you to reimplement layout: line breaking,
//! table flow, page-break heuristics, image scaling. A browser engine already
//! does all of that, and `Page.printToPDF` exposes it with real CSS paged
//! media support (`@page`, `page-break-*`). mdpress keeps its own job small:
//! turn Markdown into a self-contained HTML document and drive the print.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input dir
//!  │
//!  ├─ 1. Discover  list *.md files (non-recursive, sorted)
//!  ├─ 2. Inline    ![alt](./img.png) → base64 data: URI
//!  ├─ 3. Parse     Markdown → HTML fragment (pulldown-cmark)
//!  ├─ 4. Compose   fragment + per-format print stylesheet → full document
//!  ├─ 5. Print     headless Chromium, Page.printToPDF
//!  └─ 6. Output    <basename>.<format>.pdf (stale PDFs swept before the run)
//! ```
//!
//! Documents are processed strictly one at a time; each gets a fresh browser
//! that is torn down before the next document starts, so a long batch never
//! accumulates renderer processes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mdpress::{convert_dir, PaperFormat, RunConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RunConfig::builder()
//!         .input_dir("markdown")
//!         .output_dir("pdf")
//!         .format(PaperFormat::A4)
//!         .build()?;
//!     let summary = convert_dir(&config).await?;
//!     println!("{}/{} documents converted", summary.converted, summary.discovered);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `mdpress` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! mdpress = { version = "0.4", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PaperFormat, RunConfig, RunConfigBuilder};
pub use convert::{convert_dir, convert_dir_sync, convert_document};
pub use error::MdpressError;
pub use output::{artifact_file_name, BatchSummary, DocumentOutcome};
pub use progress::{BatchProgress, BatchProgressCallback, NoopBatchProgress};
