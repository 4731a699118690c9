//! HTML composition: Markdown body → complete printable document.
//!
//! The browser receives one self-contained HTML string. Page geometry lives
//! in an `@page` rule (which, combined with `preferCSSPageSize`, is what
//! actually sizes the printed sheet; the explicit print parameters are the
//! compatibility fallback) and the pagination behaviour lives in
//! `page-break-*` rules:
//!
//! * no page break directly after any heading, so a heading never strands
//!   at the bottom of a page
//! * a page break before every `h1` except the document's first element,
//!   giving each top-level section its own page
//! * no page break inside code blocks, block quotes, tables, or images
//!
//! Everything here branches on the selected [`PaperFormat`] only; document
//! content never changes the template.

use crate::config::PaperFormat;
use pulldown_cmark::{html, Options, Parser};

/// Parse Markdown into an HTML fragment.
///
/// GitHub-flavoured extensions are enabled (tables, footnotes,
/// strikethrough, task lists); everything else is CommonMark defaults.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut body = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut body, parser);
    body
}

/// Wrap an HTML fragment in the full print template for `format`.
pub fn compose_document(body_html: &str, format: PaperFormat) -> String {
    let stylesheet = print_stylesheet(format);
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <style>\n{stylesheet}</style>\n\
         </head>\n\
         <body>\n{body_html}</body>\n\
         </html>\n"
    )
}

/// The per-format print stylesheet.
fn print_stylesheet(format: PaperFormat) -> String {
    let size = format.css_size();
    let margin = format.margin_mm();
    let base_font = format.base_font_px();
    // Code and tables shrink further on the compact format; at A5 width a
    // 0.85em code line overflows after roughly 50 characters.
    let (code_em, table_em) = if format.is_compact() {
        ("0.72em", "0.75em")
    } else {
        ("0.85em", "0.9em")
    };

    format!(
        r#"@page {{
  size: {size} portrait;
  margin: {margin}mm;
}}
* {{
  box-sizing: border-box;
}}
body {{
  margin: 0;
  font-family: "Helvetica Neue", Helvetica, Arial, sans-serif;
  font-size: {base_font}px;
  line-height: 1.6;
  color: #24292e;
}}
h1, h2, h3, h4, h5, h6 {{
  page-break-after: avoid;
  font-weight: 600;
  line-height: 1.25;
}}
h1 {{
  page-break-before: always;
  font-size: 2.2em;
  border-bottom: 2px solid #eaecef;
  padding-bottom: 0.3em;
}}
h1:first-child {{
  page-break-before: avoid;
}}
h2 {{
  font-size: 1.7em;
  border-bottom: 1px solid #eaecef;
  padding-bottom: 0.25em;
}}
h3 {{ font-size: 1.4em; }}
h4 {{ font-size: 1.2em; }}
h5 {{ font-size: 1.05em; }}
h6 {{ font-size: 0.95em; color: #6a737d; }}
pre, blockquote, table, img {{
  page-break-inside: avoid;
}}
code {{
  font-family: "SFMono-Regular", Consolas, "Liberation Mono", Menlo, monospace;
  font-size: {code_em};
  background: #f6f8fa;
  border-radius: 3px;
  padding: 0.2em 0.4em;
}}
pre {{
  background: #f6f8fa;
  border-radius: 6px;
  padding: 12px 16px;
  overflow-x: hidden;
}}
pre code {{
  background: transparent;
  padding: 0;
}}
table {{
  border-collapse: collapse;
  width: 100%;
  font-size: {table_em};
}}
th, td {{
  border: 1px solid #d0d7de;
  padding: 6px 12px;
  text-align: left;
}}
th {{
  background: #eaecef;
  font-weight: 600;
}}
tr:nth-child(even) {{
  background: #f6f8fa;
}}
img {{
  display: block;
  max-width: 90%;
  margin: 1em auto;
  border: 1px solid #d0d7de;
  border-radius: 4px;
  box-shadow: 0 2px 6px rgba(0, 0, 0, 0.15);
}}
blockquote {{
  margin: 1em 0;
  padding: 0.5em 1em;
  border-left: 4px solid #0969da;
  background: #f1f8ff;
  color: #57606a;
}}
"#
    )
}
