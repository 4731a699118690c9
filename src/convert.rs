//! Conversion entry points: one document, or a whole directory.
//!
//! [`convert_dir`] is the batch driver the CLI uses: discover, sweep, then
//! one document at a time through the full pipeline. A document failure is
//! recorded and the batch moves on; the browser for a failed document has
//! already been torn down inside the print stage, so nothing leaks across
//! documents. Only an unreadable input directory (or an uncreatable output
//! directory) aborts the run itself.

use crate::config::RunConfig;
use crate::error::MdpressError;
use crate::output::{artifact_file_name, BatchSummary, DocumentOutcome};
use crate::pipeline::{compose, discover, inline, print, sweep};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert a single Markdown file to a PDF in `config.output_dir`.
///
/// This is the per-document pipeline; it does not sweep the output
/// directory. Use [`convert_dir`] for the full batch behaviour.
///
/// # Errors
/// Any [`MdpressError`] here aborts only this document. The caller decides
/// whether that stops a batch; [`convert_dir`] does not.
pub async fn convert_document(
    source: &Path,
    config: &RunConfig,
) -> Result<DocumentOutcome, MdpressError> {
    let start = Instant::now();
    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string());
    info!("Converting: {}", source.display());

    // ── Step 1: Read the document ────────────────────────────────────────
    let text = match tokio::fs::read_to_string(source).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(MdpressError::MissingInput {
                path: source.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(MdpressError::InputRead {
                path: source.to_path_buf(),
                source: e,
            });
        }
    };

    // ── Step 2: Inline local images ──────────────────────────────────────
    // File reads happen inside the rewrite, so move the pass off the async
    // worker threads.
    let base_dir = source
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let inlined = tokio::task::spawn_blocking(move || inline::inline_images(&text, &base_dir))
        .await
        .map_err(|e| MdpressError::Internal(format!("Inline task panicked: {e}")))?;
    debug!(
        "{file_name}: {} image(s) inlined, {} left as-is",
        inlined.inlined, inlined.skipped
    );

    // ── Step 3: Parse Markdown to an HTML fragment ───────────────────────
    let body = compose::markdown_to_html(&inlined.markdown);

    // ── Step 4: Compose the printable document ───────────────────────────
    let html = compose::compose_document(&body, config.format);

    // ── Step 5: Print via the headless browser ───────────────────────────
    let artifact = config
        .output_dir
        .join(artifact_file_name(&file_name, config.format));
    if let Some(parent) = artifact.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| MdpressError::OutputDirUnwritable {
                path: parent.to_path_buf(),
                source: e,
            })?;
    }
    print::print_to_pdf(&html, &artifact, config).await?;

    let duration_ms = start.elapsed().as_millis() as u64;
    info!("Wrote {} in {duration_ms}ms", artifact.display());

    Ok(DocumentOutcome {
        source: file_name,
        artifact: Some(artifact.display().to_string()),
        images_inlined: inlined.inlined,
        images_skipped: inlined.skipped,
        duration_ms,
        error: None,
    })
}

/// Convert every Markdown file in `config.input_dir`.
///
/// Runs the pre-run sweep, then processes documents strictly sequentially.
/// Per-document failures land in the returned [`BatchSummary`]; check
/// [`BatchSummary::is_clean`] if any failure should fail your caller.
///
/// # Errors
/// * [`MdpressError::InputDirUnreadable`] — input directory cannot be listed.
/// * [`MdpressError::OutputDirUnwritable`] — output directory cannot be
///   created or listed for the sweep.
pub async fn convert_dir(config: &RunConfig) -> Result<BatchSummary, MdpressError> {
    let run_start = Instant::now();

    // ── Step 1: Discover documents ───────────────────────────────────────
    let documents = discover::discover_documents(&config.input_dir).await?;
    if documents.is_empty() {
        info!(
            "No Markdown documents found in {}; nothing to do",
            config.input_dir.display()
        );
        if let Some(ref cb) = config.progress {
            cb.on_run_start(0);
            cb.on_run_complete(0, 0);
        }
        return Ok(BatchSummary::empty());
    }
    info!(
        "Discovered {} document(s) in {}",
        documents.len(),
        config.input_dir.display()
    );

    // ── Step 2: Sweep stale artifacts ────────────────────────────────────
    let swept_artifacts = sweep::sweep_output_dir(&config.output_dir).await?;

    let total = documents.len();
    if let Some(ref cb) = config.progress {
        cb.on_run_start(total);
    }

    // ── Step 3: Convert, one document at a time ──────────────────────────
    let mut outcomes: Vec<DocumentOutcome> = Vec::with_capacity(total);
    for (idx, document) in documents.iter().enumerate() {
        let name = document
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| document.display().to_string());
        let doc_start = Instant::now();

        if let Some(ref cb) = config.progress {
            cb.on_document_start(&name, idx + 1, total);
        }

        match convert_document(document, config).await {
            Ok(outcome) => {
                if let Some(ref cb) = config.progress {
                    cb.on_document_complete(
                        &name,
                        idx + 1,
                        total,
                        outcome.artifact.as_deref().unwrap_or(""),
                    );
                }
                outcomes.push(outcome);
            }
            Err(e) => {
                warn!("Skipping '{name}': {e}");
                if let Some(ref cb) = config.progress {
                    cb.on_document_error(&name, idx + 1, total, &e.to_string());
                }
                outcomes.push(DocumentOutcome::failed(
                    name,
                    &e,
                    doc_start.elapsed().as_millis() as u64,
                ));
            }
        }
    }

    // ── Step 4: Summarise ────────────────────────────────────────────────
    let converted = outcomes.iter().filter(|o| o.succeeded()).count();
    let failed = total - converted;
    if let Some(ref cb) = config.progress {
        cb.on_run_complete(total, converted);
    }

    let summary = BatchSummary {
        discovered: total,
        converted,
        failed,
        swept_artifacts,
        total_duration_ms: run_start.elapsed().as_millis() as u64,
        outcomes,
    };
    info!(
        "Run complete: {}/{} document(s) converted in {}ms",
        summary.converted, summary.discovered, summary.total_duration_ms
    );
    Ok(summary)
}

/// Synchronous wrapper around [`convert_dir`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_dir_sync(config: &RunConfig) -> Result<BatchSummary, MdpressError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| MdpressError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(convert_dir(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_input_dir_returns_empty_summary_without_touching_output() {
        let input = tempfile::tempdir().unwrap();
        let output_parent = tempfile::tempdir().unwrap();
        let output = output_parent.path().join("pdf");

        let config = RunConfig::builder()
            .input_dir(input.path())
            .output_dir(&output)
            .build()
            .unwrap();

        let summary = convert_dir(&config).await.unwrap();
        assert_eq!(summary.discovered, 0);
        assert_eq!(summary.converted, 0);
        assert!(summary.is_clean());
        // No documents means no sweep: the output directory is not created.
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn missing_input_dir_is_fatal() {
        let config = RunConfig::builder()
            .input_dir("/definitely/not/a/real/dir")
            .build()
            .unwrap();
        let err = convert_dir(&config).await.unwrap_err();
        assert!(matches!(err, MdpressError::InputDirUnreadable { .. }));
    }

    #[tokio::test]
    async fn missing_document_reports_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::builder()
            .input_dir(dir.path())
            .output_dir(dir.path().join("pdf"))
            .build()
            .unwrap();

        let err = convert_document(&dir.path().join("ghost.md"), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, MdpressError::MissingInput { .. }));
    }
}
