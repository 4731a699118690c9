//! Result records for a conversion run.
//!
//! [`convert_dir`](crate::convert::convert_dir) never aborts the batch for a
//! single bad document; instead every document's fate lands in a
//! [`DocumentOutcome`] inside the run's [`BatchSummary`]. Callers decide
//! their own tolerance: inspect `failed`, walk `outcomes`, or serialise the
//! whole summary (the CLI's `--json` output is exactly this struct).

use crate::config::PaperFormat;
use crate::error::MdpressError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The result of converting (or failing to convert) one Markdown document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentOutcome {
    /// Source file name, e.g. `notes.md`.
    pub source: String,
    /// Path of the written PDF; `None` when the document failed.
    pub artifact: Option<String>,
    /// Local image references successfully embedded as data URIs.
    pub images_inlined: usize,
    /// Image references left untouched because their file could not be read.
    pub images_skipped: usize,
    /// Wall-clock time for this document, including browser launch/teardown.
    pub duration_ms: u64,
    /// The error that stopped this document, if any.
    pub error: Option<String>,
}

impl DocumentOutcome {
    /// Record a document that never produced an artifact.
    pub fn failed(source: impl Into<String>, error: &MdpressError, duration_ms: u64) -> Self {
        Self {
            source: source.into(),
            artifact: None,
            images_inlined: 0,
            images_skipped: 0,
            duration_ms,
            error: Some(error.to_string()),
        }
    }

    /// True when a PDF was written for this document.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate counts and per-document outcomes for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Markdown files found in the input directory.
    pub discovered: usize,
    /// Documents whose PDF was written.
    pub converted: usize,
    /// Documents that errored (render, read, or write failure).
    pub failed: usize,
    /// Stale PDFs removed from the output directory before the run.
    pub swept_artifacts: usize,
    /// Wall-clock time for the whole run.
    pub total_duration_ms: u64,
    /// One entry per discovered document, in processing order.
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchSummary {
    /// Summary for a run that found nothing to do.
    pub fn empty() -> Self {
        Self {
            discovered: 0,
            converted: 0,
            failed: 0,
            swept_artifacts: 0,
            total_duration_ms: 0,
            outcomes: Vec::new(),
        }
    }

    /// True when every discovered document converted.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Derive the artifact file name for a source document at a given format.
///
/// The Markdown extension is replaced with a format-tagged PDF extension:
/// `artifact_file_name("notes.md", PaperFormat::A4)` is `"notes.a4.pdf"`.
/// The mapping is a pure function of its inputs, which is what makes reruns
/// after the sweep deterministic.
pub fn artifact_file_name(source_name: &str, format: PaperFormat) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| source_name.to_string());
    format!("{stem}.{}.pdf", format.suffix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_name_replaces_md_extension() {
        assert_eq!(
            artifact_file_name("notes.md", PaperFormat::A4),
            "notes.a4.pdf"
        );
        assert_eq!(
            artifact_file_name("README.md", PaperFormat::A5),
            "README.a5.pdf"
        );
    }

    #[test]
    fn artifact_name_keeps_inner_dots() {
        assert_eq!(
            artifact_file_name("release.notes.md", PaperFormat::A2),
            "release.notes.a2.pdf"
        );
    }

    #[test]
    fn artifact_name_is_deterministic_per_format() {
        let a = artifact_file_name("doc.md", PaperFormat::A3);
        let b = artifact_file_name("doc.md", PaperFormat::A3);
        assert_eq!(a, b);
        assert_ne!(a, artifact_file_name("doc.md", PaperFormat::A4));
    }

    #[test]
    fn failed_outcome_has_no_artifact() {
        let err = MdpressError::RenderFailed {
            detail: "boom".into(),
        };
        let outcome = DocumentOutcome::failed("notes.md", &err, 12);
        assert!(!outcome.succeeded());
        assert!(outcome.artifact.is_none());
        assert!(outcome.error.as_deref().unwrap_or("").contains("boom"));
    }

    #[test]
    fn summary_serialises_to_json() {
        let summary = BatchSummary {
            discovered: 2,
            converted: 1,
            failed: 1,
            swept_artifacts: 3,
            total_duration_ms: 1500,
            outcomes: vec![DocumentOutcome {
                source: "a.md".into(),
                artifact: Some("pdf/a.a4.pdf".into()),
                images_inlined: 1,
                images_skipped: 0,
                duration_ms: 800,
                error: None,
            }],
        };
        let json = serde_json::to_string(&summary).unwrap();
        let back: BatchSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.discovered, 2);
        assert!(!back.is_clean());
        assert_eq!(back.outcomes.len(), 1);
    }

    #[test]
    fn empty_summary_is_clean() {
        assert!(BatchSummary::empty().is_clean());
    }
}
