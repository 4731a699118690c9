//! Document discovery: list the Markdown files of the input directory.
//!
//! Deliberately non-recursive. The input directory is a flat drop zone; a
//! subdirectory next to the documents usually holds their images, and
//! descending into it would turn image assets named `*.md.png` oddities or
//! nested notes into surprise conversion targets. Results are sorted by
//! file name so a batch always runs, logs, and reports in the same order.

use crate::error::MdpressError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// List `*.md` files directly inside `input_dir`, sorted by name.
///
/// The extension match is case-insensitive (`NOTES.MD` converts). Anything
/// that is not a regular file is skipped, including symlinked directories.
///
/// # Errors
/// [`MdpressError::InputDirUnreadable`] when the directory cannot be listed;
/// this is the one error that is fatal for a whole run.
pub async fn discover_documents(input_dir: &Path) -> Result<Vec<PathBuf>, MdpressError> {
    let unreadable = |source: std::io::Error| MdpressError::InputDirUnreadable {
        path: input_dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(input_dir).await.map_err(unreadable)?;
    let mut documents = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(unreadable)? {
        let file_type = entry.file_type().await.map_err(unreadable)?;
        if !file_type.is_file() {
            continue;
        }
        let path = entry.path();
        let is_markdown = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));
        if is_markdown {
            documents.push(path);
        }
    }

    documents.sort();
    debug!(
        "Discovered {} Markdown file(s) in {}",
        documents.len(),
        input_dir.display()
    );
    Ok(documents)
}
