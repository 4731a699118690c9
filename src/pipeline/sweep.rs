//! Output preparation: create the directory, remove stale artifacts.
//!
//! The sweep is a full-directory pass limited to `*.pdf` files, not a
//! selective per-source cleanup. Artifact names encode the format, so a run
//! at A5 after a run at A4 would otherwise leave both `notes.a4.pdf` and
//! `notes.a5.pdf` behind and the directory would stop reflecting the current
//! input set. Deleting every PDF first keeps "what is in the output
//! directory" equal to "what the last run produced".

use crate::error::MdpressError;
use std::path::Path;
use tracing::{info, warn};

/// Ensure `output_dir` exists and delete every `*.pdf` directly inside it.
///
/// Returns the number of files removed. A file that cannot be deleted is
/// logged and skipped; only failure to create or list the directory is an
/// error (and then fatal for the run, since nothing could be written anyway).
pub async fn sweep_output_dir(output_dir: &Path) -> Result<usize, MdpressError> {
    let unwritable = |source: std::io::Error| MdpressError::OutputDirUnwritable {
        path: output_dir.to_path_buf(),
        source,
    };

    tokio::fs::create_dir_all(output_dir).await.map_err(unwritable)?;

    let mut entries = tokio::fs::read_dir(output_dir).await.map_err(unwritable)?;
    let mut removed = 0usize;

    while let Some(entry) = entries.next_entry().await.map_err(unwritable)? {
        let path = entry.path();
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            continue;
        }
        match entry.file_type().await {
            Ok(ft) if ft.is_file() => {}
            _ => continue,
        }

        match tokio::fs::remove_file(&path).await {
            Ok(()) => removed += 1,
            Err(e) => warn!("Could not remove stale artifact '{}': {e}", path.display()),
        }
    }

    if removed > 0 {
        info!(
            "Removed {removed} stale PDF artifact(s) from {}",
            output_dir.display()
        );
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("pdf");
        assert!(!out.exists());

        let removed = sweep_output_dir(&out).await.unwrap();
        assert_eq!(removed, 0);
        assert!(out.is_dir());
    }

    #[tokio::test]
    async fn removes_only_pdf_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("old.a4.pdf"), b"%PDF-1.7").unwrap();
        std::fs::write(dir.path().join("older.A5.PDF"), b"%PDF-1.7").unwrap();
        std::fs::write(dir.path().join("keep.txt"), b"notes").unwrap();
        std::fs::create_dir(dir.path().join("keep.pdf.d")).unwrap();

        let removed = sweep_output_dir(dir.path()).await.unwrap();
        assert_eq!(removed, 2);
        assert!(dir.path().join("keep.txt").exists());
        assert!(dir.path().join("keep.pdf.d").exists());
        assert!(!dir.path().join("old.a4.pdf").exists());
        assert!(!dir.path().join("older.A5.PDF").exists());
    }

    #[tokio::test]
    async fn sweep_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one.pdf"), b"%PDF").unwrap();

        assert_eq!(sweep_output_dir(dir.path()).await.unwrap(), 1);
        assert_eq!(sweep_output_dir(dir.path()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn pdf_named_directory_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("archive.pdf")).unwrap();

        let removed = sweep_output_dir(dir.path()).await.unwrap();
        assert_eq!(removed, 0);
        assert!(dir.path().join("archive.pdf").is_dir());
    }
}
