//! Error types for the mdpress library.
//!
//! Only one condition is fatal to a whole run: the input directory itself
//! cannot be read. Every other variant here aborts a single document's
//! conversion; [`crate::convert::convert_dir`] records it in the
//! [`crate::output::DocumentOutcome`] for that document and moves on to the
//! next one.
//!
//! Two failure classes deliberately have no variant at all:
//!
//! * An unreadable *image* inside a document is recovered in place by the
//!   inliner (the reference is left untouched and logged).
//! * A stale PDF that cannot be deleted during the pre-run sweep is logged
//!   and skipped; the sweep keeps going.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the mdpress library.
#[derive(Debug, Error)]
pub enum MdpressError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The input directory cannot be listed. Fatal for the run.
    #[error("Cannot read input directory '{path}'\nCheck that the directory exists and is readable.")]
    InputDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A discovered Markdown file vanished before it could be read.
    #[error("Markdown file not found: '{path}'\nIt may have been removed after discovery.")]
    MissingInput { path: PathBuf },

    /// A discovered Markdown file exists but could not be read.
    #[error("Failed to read '{path}': {source}")]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Render errors ─────────────────────────────────────────────────────
    /// The headless browser process could not be started or connected to.
    #[error(
        "Failed to launch the headless browser: {detail}\n\
         mdpress needs a Chrome or Chromium binary. If it is not on PATH,\n\
         point --browser-path (or MDPRESS_BROWSER) at the executable."
    )]
    BrowserLaunch { detail: String },

    /// The browser launched but loading the content or printing failed.
    #[error("Browser rendering failed: {detail}")]
    RenderFailed { detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The output directory could not be created.
    #[error("Cannot create output directory '{path}': {source}")]
    OutputDirUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rendered PDF could not be written to disk.
    #[error("Failed to write PDF '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// A paper-format string did not match any supported format.
    #[error("Unrecognised paper format '{input}'. Supported formats: A2, A3, A4, A5.")]
    InvalidFormat { input: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_display() {
        let e = MdpressError::MissingInput {
            path: PathBuf::from("/docs/notes.md"),
        };
        let msg = e.to_string();
        assert!(msg.contains("/docs/notes.md"), "got: {msg}");
    }

    #[test]
    fn browser_launch_display_mentions_flag() {
        let e = MdpressError::BrowserLaunch {
            detail: "No such file or directory".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("--browser-path"));
        assert!(msg.contains("No such file or directory"));
    }

    #[test]
    fn invalid_format_lists_supported() {
        let e = MdpressError::InvalidFormat { input: "A9".into() };
        let msg = e.to_string();
        assert!(msg.contains("A9"));
        assert!(msg.contains("A2, A3, A4, A5"));
    }

    #[test]
    fn output_write_carries_source() {
        use std::error::Error as _;
        let e = MdpressError::OutputWrite {
            path: PathBuf::from("out/a.a4.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("a.a4.pdf"));
    }
}
