//! Configuration types for a conversion run.
//!
//! All run behaviour is controlled through [`RunConfig`], built via its
//! [`RunConfigBuilder`]. Keeping every knob in one struct means each pipeline
//! stage receives explicit configuration instead of reading process-wide
//! state, and two runs can be diffed by comparing their configs.
//!
//! [`PaperFormat`] is the one piece of configuration with real behaviour
//! attached: each variant carries the fixed geometry/typography table that
//! parameterises both the composed stylesheet and the browser's print call.

use crate::error::MdpressError;
use crate::progress::BatchProgress;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// ── Paper formats ────────────────────────────────────────────────────────

/// One of the supported ISO 216 paper sizes, portrait orientation.
///
/// Margins shrink and base fonts grow with the physical page so that a
/// document keeps a similar number of words per line across formats. A5 is
/// the compact outlier: code blocks and tables drop to smaller sizes there
/// to avoid constant horizontal overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperFormat {
    A2,
    A3,
    #[default]
    A4,
    A5,
}

impl PaperFormat {
    /// All supported formats, largest first. Menu order for the interactive prompt.
    pub const ALL: [PaperFormat; 4] = [
        PaperFormat::A2,
        PaperFormat::A3,
        PaperFormat::A4,
        PaperFormat::A5,
    ];

    /// Uniform margin on all four page edges, in millimetres.
    pub fn margin_mm(self) -> u32 {
        match self {
            PaperFormat::A2 => 25,
            PaperFormat::A3 => 22,
            PaperFormat::A4 => 20,
            PaperFormat::A5 => 12,
        }
    }

    /// Base body font size in CSS pixels; headings and code scale from this.
    pub fn base_font_px(self) -> u32 {
        match self {
            PaperFormat::A2 => 22,
            PaperFormat::A3 => 18,
            PaperFormat::A4 => 14,
            PaperFormat::A5 => 11,
        }
    }

    /// Human description shown in the CLI format menu and `--help`.
    pub fn description(self) -> &'static str {
        match self {
            PaperFormat::A2 => "420 × 594 mm, poster-sized handouts",
            PaperFormat::A3 => "297 × 420 mm, large-print documents",
            PaperFormat::A4 => "210 × 297 mm, standard documents",
            PaperFormat::A5 => "148 × 210 mm, compact booklets",
        }
    }

    /// The size keyword used in the `@page` CSS rule, e.g. `"A4"`.
    pub fn css_size(self) -> &'static str {
        match self {
            PaperFormat::A2 => "A2",
            PaperFormat::A3 => "A3",
            PaperFormat::A4 => "A4",
            PaperFormat::A5 => "A5",
        }
    }

    /// Lowercase tag embedded in artifact filenames, e.g. `"a4"` in `notes.a4.pdf`.
    pub fn suffix(self) -> &'static str {
        match self {
            PaperFormat::A2 => "a2",
            PaperFormat::A3 => "a3",
            PaperFormat::A4 => "a4",
            PaperFormat::A5 => "a5",
        }
    }

    /// Portrait page size in inches, the unit `Page.printToPDF` expects.
    pub fn page_size_in(self) -> (f64, f64) {
        match self {
            PaperFormat::A2 => (16.54, 23.39),
            PaperFormat::A3 => (11.69, 16.54),
            PaperFormat::A4 => (8.27, 11.69),
            PaperFormat::A5 => (5.83, 8.27),
        }
    }

    /// Uniform margin in inches for the explicit print parameters.
    pub fn margin_in(self) -> f64 {
        f64::from(self.margin_mm()) / 25.4
    }

    /// The most compact format gets reduced code/table font sizes.
    pub fn is_compact(self) -> bool {
        matches!(self, PaperFormat::A5)
    }

    /// Map a 1-based menu choice (the interactive prompt) to a format.
    pub fn from_menu_choice(choice: u32) -> Option<Self> {
        match choice {
            1 => Some(PaperFormat::A2),
            2 => Some(PaperFormat::A3),
            3 => Some(PaperFormat::A4),
            4 => Some(PaperFormat::A5),
            _ => None,
        }
    }
}

impl FromStr for PaperFormat {
    type Err = MdpressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        PaperFormat::ALL
            .into_iter()
            .find(|f| trimmed.eq_ignore_ascii_case(f.css_size()))
            .ok_or_else(|| MdpressError::InvalidFormat {
                input: trimmed.to_string(),
            })
    }
}

impl fmt::Display for PaperFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_size())
    }
}

// ── Run configuration ────────────────────────────────────────────────────

/// Configuration for one conversion run.
///
/// Built via [`RunConfig::builder()`] or [`RunConfig::default()`].
///
/// # Example
/// ```rust
/// use mdpress::{PaperFormat, RunConfig};
///
/// let config = RunConfig::builder()
///     .input_dir("docs")
///     .output_dir("dist")
///     .format(PaperFormat::A5)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct RunConfig {
    /// Directory scanned (non-recursively) for `*.md` files. Default: `./markdown`.
    pub input_dir: PathBuf,

    /// Directory receiving the PDFs; created if absent and swept of stale
    /// `*.pdf` files before each run. Default: `./pdf`.
    pub output_dir: PathBuf,

    /// Paper format for every document in the run. Default: A4.
    pub format: PaperFormat,

    /// Seconds to wait for the browser process to start and accept the CDP
    /// connection. Default: 30.
    ///
    /// First launches on cold machines (or CI runners pulling Chromium from
    /// a snap/flatpak wrapper) can take well over the protocol default.
    pub launch_timeout_secs: u64,

    /// Explicit Chrome/Chromium executable. When `None`, chromiumoxide
    /// detects an installed browser.
    pub browser_executable: Option<PathBuf>,

    /// Extra command-line arguments passed to the browser process, e.g.
    /// `--no-sandbox` inside containers.
    pub extra_browser_args: Vec<String>,

    /// Per-document progress events. `None` disables reporting.
    pub progress: Option<BatchProgress>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("markdown"),
            output_dir: PathBuf::from("pdf"),
            format: PaperFormat::default(),
            launch_timeout_secs: 30,
            browser_executable: None,
            extra_browser_args: Vec::new(),
            progress: None,
        }
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field("format", &self.format)
            .field("launch_timeout_secs", &self.launch_timeout_secs)
            .field("browser_executable", &self.browser_executable)
            .field("extra_browser_args", &self.extra_browser_args)
            .field("progress", &self.progress.as_ref().map(|_| "<dyn BatchProgressCallback>"))
            .finish()
    }
}

impl RunConfig {
    /// Create a new builder for `RunConfig`.
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RunConfig`].
#[derive(Debug)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn format(mut self, format: PaperFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn launch_timeout_secs(mut self, secs: u64) -> Self {
        self.config.launch_timeout_secs = secs.max(1);
        self
    }

    pub fn browser_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.browser_executable = Some(path.into());
        self
    }

    /// Append one extra argument for the browser process. May be called repeatedly.
    pub fn browser_arg(mut self, arg: impl Into<String>) -> Self {
        self.config.extra_browser_args.push(arg.into());
        self
    }

    pub fn progress(mut self, progress: BatchProgress) -> Self {
        self.config.progress = Some(progress);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RunConfig, MdpressError> {
        let c = &self.config;
        if c.input_dir.as_os_str().is_empty() {
            return Err(MdpressError::InvalidConfig(
                "Input directory must not be empty".into(),
            ));
        }
        if c.output_dir.as_os_str().is_empty() {
            return Err(MdpressError::InvalidConfig(
                "Output directory must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_str_accepts_any_case() {
        assert_eq!("A4".parse::<PaperFormat>().unwrap(), PaperFormat::A4);
        assert_eq!("a5".parse::<PaperFormat>().unwrap(), PaperFormat::A5);
        assert_eq!(" a2 ".parse::<PaperFormat>().unwrap(), PaperFormat::A2);
    }

    #[test]
    fn format_from_str_rejects_unknown() {
        let err = "A9".parse::<PaperFormat>().unwrap_err();
        assert!(matches!(err, MdpressError::InvalidFormat { .. }));
        let err = "letter".parse::<PaperFormat>().unwrap_err();
        assert!(err.to_string().contains("letter"));
    }

    #[test]
    fn default_format_is_a4() {
        assert_eq!(PaperFormat::default(), PaperFormat::A4);
    }

    #[test]
    fn menu_choices_cover_all_formats() {
        assert_eq!(PaperFormat::from_menu_choice(1), Some(PaperFormat::A2));
        assert_eq!(PaperFormat::from_menu_choice(3), Some(PaperFormat::A4));
        assert_eq!(PaperFormat::from_menu_choice(4), Some(PaperFormat::A5));
        assert_eq!(PaperFormat::from_menu_choice(0), None);
        assert_eq!(PaperFormat::from_menu_choice(5), None);
    }

    #[test]
    fn formats_have_distinct_margins() {
        let mut margins: Vec<u32> = PaperFormat::ALL.iter().map(|f| f.margin_mm()).collect();
        margins.dedup();
        assert_eq!(margins.len(), 4);
    }

    #[test]
    fn page_sizes_are_portrait() {
        for f in PaperFormat::ALL {
            let (w, h) = f.page_size_in();
            assert!(w < h, "{f} should be portrait: {w} x {h}");
        }
    }

    #[test]
    fn only_a5_is_compact() {
        let compact: Vec<PaperFormat> = PaperFormat::ALL
            .into_iter()
            .filter(|f| f.is_compact())
            .collect();
        assert_eq!(compact, vec![PaperFormat::A5]);
    }

    #[test]
    fn margin_in_converts_millimetres() {
        let m = PaperFormat::A4.margin_in();
        assert!((m - 20.0 / 25.4).abs() < 1e-9);
    }

    #[test]
    fn builder_defaults() {
        let config = RunConfig::builder().build().unwrap();
        assert_eq!(config.input_dir, PathBuf::from("markdown"));
        assert_eq!(config.output_dir, PathBuf::from("pdf"));
        assert_eq!(config.format, PaperFormat::A4);
        assert_eq!(config.launch_timeout_secs, 30);
        assert!(config.browser_executable.is_none());
        assert!(config.extra_browser_args.is_empty());
    }

    #[test]
    fn builder_rejects_empty_dirs() {
        let err = RunConfig::builder().input_dir("").build().unwrap_err();
        assert!(matches!(err, MdpressError::InvalidConfig(_)));
    }

    #[test]
    fn builder_clamps_launch_timeout() {
        let config = RunConfig::builder().launch_timeout_secs(0).build().unwrap();
        assert_eq!(config.launch_timeout_secs, 1);
    }

    #[test]
    fn browser_args_accumulate() {
        let config = RunConfig::builder()
            .browser_arg("--no-sandbox")
            .browser_arg("--disable-gpu")
            .build()
            .unwrap();
        assert_eq!(
            config.extra_browser_args,
            vec!["--no-sandbox".to_string(), "--disable-gpu".to_string()]
        );
    }
}
