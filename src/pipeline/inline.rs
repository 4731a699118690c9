//! Image inlining: rewrite local image references to base64 data URIs.
//!
//! The composed HTML is handed to the browser as a single string with no
//! base URL, so a reference like `![diagram](./images/arch.png)` would
//! resolve against nothing and print as a broken-image box. Embedding the
//! bytes inline removes every external file lookup before the browser is
//! even launched.
//!
//! ## Matching contract
//!
//! This is deliberately text-pattern matching, not an AST transform. The
//! rewrite must preserve everything outside a matched reference byte for
//! byte; a parse/serialise round trip through a Markdown AST would reflow
//! text it never touched. A reference is matched only when the path starts
//! with `./` and ends in one of png/jpg/jpeg/gif/svg (extension matched
//! case-insensitively). A reference whose file cannot be read is left
//! exactly as written and the remaining references are still processed.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::Path;
use tracing::{debug, warn};

/// Markdown image syntax with a `./`-relative path and an allowed extension.
static RE_LOCAL_IMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"!\[(?P<alt>[^\]]*)\]\((?P<path>\./[^)\s]+\.(?P<ext>(?i:png|jpe?g|gif|svg)))\)")
        .unwrap()
});

/// The rewritten text plus counts for the run report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineOutcome {
    /// The document text with every resolvable reference embedded.
    pub markdown: String,
    /// References replaced with a data URI.
    pub inlined: usize,
    /// References left untouched because their file could not be read.
    pub skipped: usize,
}

/// Replace every local image reference in `markdown` with a data URI.
///
/// Relative paths resolve against `base_dir`, the directory the document
/// lives in. Each reference is read and encoded independently; a repeated
/// path is simply read again. Read failures are per-reference and non-fatal.
pub fn inline_images(markdown: &str, base_dir: &Path) -> InlineOutcome {
    let mut inlined = 0usize;
    let mut skipped = 0usize;

    let rewritten = RE_LOCAL_IMAGE
        .replace_all(markdown, |caps: &Captures<'_>| {
            let alt = &caps["alt"];
            let rel_path = &caps["path"];
            let ext = caps["ext"].to_ascii_lowercase();
            let resolved = base_dir.join(rel_path);

            match std::fs::read(&resolved) {
                Ok(bytes) => {
                    let payload = STANDARD.encode(&bytes);
                    debug!(
                        "Inlined '{}' ({} bytes → {} base64 chars)",
                        rel_path,
                        bytes.len(),
                        payload.len()
                    );
                    inlined += 1;
                    format!("![{alt}](data:image/{};base64,{payload})", media_type(&ext))
                }
                Err(e) => {
                    warn!(
                        "Leaving image reference '{}' untouched: {} ({})",
                        rel_path,
                        e,
                        resolved.display()
                    );
                    skipped += 1;
                    caps[0].to_string()
                }
            }
        })
        .into_owned();

    InlineOutcome {
        markdown: rewritten,
        inlined,
        skipped,
    }
}

/// Media type for an already-lowercased extension: `jpg` aliases to `jpeg`,
/// everything else passes through as-is.
fn media_type(ext: &str) -> &str {
    if ext == "jpg" {
        "jpeg"
    } else {
        ext
    }
}
