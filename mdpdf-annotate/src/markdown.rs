//! Markdown to HTML rendering.
//!
//! comrak is configured with tables, footnotes, description lists,
//! strikethrough and task lists. Its autolink and header-id extensions stay
//! off: URL detection and heading anchors are done by the annotation passes.
use comrak::{markdown_to_html, options::Options};

/// comrak options used for every conversion.
#[must_use]
pub fn comrak_options() -> Options<'static> {
  let mut options = Options::default();
  options.extension.table = true;
  options.extension.footnotes = true;
  options.extension.strikethrough = true;
  options.extension.tasklist = true;
  options.extension.description_lists = true;
  options.extension.autolink = false;
  options.extension.header_ids = None;
  options.render.r#unsafe = true;
  options
}

/// Render Markdown to an HTML fragment.
#[must_use]
pub fn render_markdown(source: &str) -> String {
  markdown_to_html(source, &comrak_options())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_headings_have_no_ids() {
    let html = render_markdown("# Title\n\n## Sub\n");
    assert!(html.contains("<h1>Title</h1>"));
    assert!(html.contains("<h2>Sub</h2>"));
  }

  #[test]
  fn test_tables_and_fenced_code() {
    let html = render_markdown(
      "| a | b |\n|---|---|\n| 1 | 2 |\n\n```rust\nfn main() {}\n```\n",
    );
    assert!(html.contains("<table>"));
    assert!(html.contains("<pre><code class=\"language-rust\">"));
  }

  #[test]
  fn test_bare_urls_are_left_for_the_link_pass() {
    let html = render_markdown("Visit https://example.com today");
    assert!(!html.contains("<a "));
  }

  #[test]
  fn test_footnotes_and_description_lists() {
    let html = render_markdown(
      "Text[^1]\n\n[^1]: Note.\n\nTerm\n\n: Definition\n",
    );
    assert!(html.contains("footnote"));
    assert!(html.contains("<dl>"));
  }
}
