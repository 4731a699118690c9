//! PDF printing: drive a headless Chromium through load and `printToPDF`.
//!
//! ## Why a fresh browser per document?
//!
//! A long batch must not accumulate renderer state: each document gets its
//! own browser process, and teardown (`close` + process wait + event-task
//! abort) runs on every exit path, success or failure. The launch cost is
//! noticeable but bounded; leaked Chromium processes are not.
//!
//! ## The wait contract
//!
//! Printing only happens after the page reports its load settled. All
//! resources are inlined data URIs, so there is no real network activity to
//! wait for, but the wait is honoured uniformly; it also covers layout and
//! font readiness inside the renderer.
//!
//! ## Sizing precedence
//!
//! `prefer_css_page_size: true` makes the document's `@page` rule
//! authoritative for the sheet size. The explicit paper/margin parameters
//! below mirror the same geometry as a fallback for content that carries no
//! `@page` rule, which the print contract requires us to pass anyway.

use crate::config::{PaperFormat, RunConfig};
use crate::error::MdpressError;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use futures::StreamExt;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Render `html` and write the resulting PDF to `out_path`.
///
/// # Errors
/// * [`MdpressError::BrowserLaunch`] when no browser could be started.
/// * [`MdpressError::RenderFailed`] when loading or printing failed.
/// * [`MdpressError::OutputWrite`] when the PDF bytes could not be written.
///
/// All three abort only the current document; the batch driver continues.
pub async fn print_to_pdf(
    html: &str,
    out_path: &Path,
    config: &RunConfig,
) -> Result<(), MdpressError> {
    let browser_config = build_browser_config(config)?;

    let (mut browser, mut handler) =
        Browser::launch(browser_config)
            .await
            .map_err(|e| MdpressError::BrowserLaunch {
                detail: e.to_string(),
            })?;

    // The CDP connection is event-driven; the handler stream must be polled
    // for the lifetime of the browser or every command future stalls.
    let event_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                break;
            }
        }
    });

    let result = load_and_print(&browser, html, out_path, config.format).await;

    // Teardown runs regardless of the print result.
    if let Err(e) = browser.close().await {
        debug!("Browser close reported: {e}");
    }
    let _ = browser.wait().await;
    event_task.abort();

    result
}

/// Load the content into a fresh page, wait for it to settle, print, write.
async fn load_and_print(
    browser: &Browser,
    html: &str,
    out_path: &Path,
    format: PaperFormat,
) -> Result<(), MdpressError> {
    let render_err = |e: chromiumoxide::error::CdpError| MdpressError::RenderFailed {
        detail: e.to_string(),
    };

    let page = browser.new_page("about:blank").await.map_err(render_err)?;
    page.set_content(html).await.map_err(render_err)?;
    page.wait_for_navigation().await.map_err(render_err)?;
    debug!("Content settled, printing at {format}");

    let pdf = page.pdf(print_params(format)).await.map_err(render_err)?;

    tokio::fs::write(out_path, &pdf)
        .await
        .map_err(|e| MdpressError::OutputWrite {
            path: out_path.to_path_buf(),
            source: e,
        })?;

    info!("Printed {} bytes to {}", pdf.len(), out_path.display());
    Ok(())
}

/// Translate run configuration into a chromiumoxide launch config.
fn build_browser_config(config: &RunConfig) -> Result<BrowserConfig, MdpressError> {
    let mut builder = BrowserConfig::builder()
        .launch_timeout(Duration::from_secs(config.launch_timeout_secs));

    if let Some(ref executable) = config.browser_executable {
        builder = builder.chrome_executable(executable);
    }
    for arg in &config.extra_browser_args {
        builder = builder.arg(arg.clone());
    }

    builder
        .build()
        .map_err(|detail| MdpressError::BrowserLaunch { detail })
}

/// Explicit print parameters mirroring the format's `@page` geometry.
fn print_params(format: PaperFormat) -> PrintToPdfParams {
    let (paper_width, paper_height) = format.page_size_in();
    let margin = format.margin_in();

    PrintToPdfParams {
        landscape: Some(false),
        display_header_footer: Some(false),
        print_background: Some(true),
        paper_width: Some(paper_width),
        paper_height: Some(paper_height),
        margin_top: Some(margin),
        margin_bottom: Some(margin),
        margin_left: Some(margin),
        margin_right: Some(margin),
        prefer_css_page_size: Some(true),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_are_portrait_with_background() {
        let p = print_params(PaperFormat::A4);
        assert_eq!(p.landscape, Some(false));
        assert_eq!(p.print_background, Some(true));
        assert_eq!(p.display_header_footer, Some(false));
        assert_eq!(p.prefer_css_page_size, Some(true));
    }

    #[test]
    fn params_carry_format_geometry() {
        let p = print_params(PaperFormat::A5);
        assert_eq!(p.paper_width, Some(5.83));
        assert_eq!(p.paper_height, Some(8.27));

        let margin = PaperFormat::A5.margin_in();
        assert_eq!(p.margin_top, Some(margin));
        assert_eq!(p.margin_bottom, Some(margin));
        assert_eq!(p.margin_left, Some(margin));
        assert_eq!(p.margin_right, Some(margin));
    }

    #[test]
    fn margins_are_uniform_across_formats() {
        for format in PaperFormat::ALL {
            let p = print_params(format);
            assert_eq!(p.margin_top, p.margin_bottom);
            assert_eq!(p.margin_left, p.margin_right);
            assert_eq!(p.margin_top, p.margin_left);
        }
    }

    #[test]
    fn browser_config_honours_executable_override() {
        let config = RunConfig::builder()
            .browser_executable("/opt/chromium/chrome")
            .browser_arg("--no-sandbox")
            .build()
            .unwrap();
        // Building must not probe the path; launch is where it fails.
        assert!(build_browser_config(&config).is_ok());
    }
}
