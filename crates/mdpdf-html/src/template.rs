use log::debug;
use mdpdf_annotate::AnnotatedDocument;
use mdpdf_templates as templates;
use tera::Tera;

use crate::error::AssembleResult;

const DOCUMENT_TEMPLATE: &str = templates::DOCUMENT_TEMPLATE;
const DEFAULT_CSS: &str = templates::DEFAULT_CSS;

/// Title used when neither the options nor the document provide one.
pub const DEFAULT_TITLE: &str = "Document";

/// Options for [`assemble`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembleOptions {
  /// Explicit document title, preferred over the first level-1 heading.
  pub title: Option<String>,

  /// Additional CSS, emitted after the built-in stylesheet in order.
  pub extra_styles: Vec<String>,
}

impl AssembleOptions {
  fn resolve_title<'a>(&'a self, document: &'a AnnotatedDocument) -> &'a str {
    self
      .title
      .as_deref()
      .filter(|title| !title.trim().is_empty())
      .or(document.title.as_deref())
      .unwrap_or(DEFAULT_TITLE)
  }
}

/// Assemble a complete HTML document.
///
/// The TOC block, when present, is placed before the body. Output is
/// deterministic for a given document and options.
///
/// # Errors
///
/// Returns an error if the template cannot be parsed or rendered.
pub fn assemble(
  document: &AnnotatedDocument,
  options: &AssembleOptions,
) -> AssembleResult<String> {
  let mut tera = Tera::default();
  tera.add_raw_template("document.html", DOCUMENT_TEMPLATE)?;

  let toc = document
    .toc
    .as_ref()
    .map_or("", |toc| toc.markup.as_str());
  let title = options.resolve_title(document);

  let mut tera_context = tera::Context::new();
  tera_context.insert("title", title);
  tera_context.insert("stylesheet", DEFAULT_CSS);
  tera_context.insert("extra_styles", &options.extra_styles.join("\n"));
  tera_context.insert("toc", toc);
  tera_context.insert("body", &document.body);

  let html = tera.render("document.html", &tera_context)?;
  debug!(
    "Assembled document \"{title}\" ({} bytes, toc: {})",
    html.len(),
    !toc.is_empty()
  );
  Ok(html)
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use mdpdf_annotate::{AnnotateOptions, Annotator};

  use super::*;

  fn document(md: &str) -> AnnotatedDocument {
    Annotator::new(AnnotateOptions::default())
      .annotate_markdown(md)
      .expect("annotation succeeds")
  }

  #[test]
  fn test_toc_precedes_body() {
    let html = assemble(
      &document("# One\n\ntext\n\n## Two\n"),
      &AssembleOptions::default(),
    )
    .expect("assembles");
    let toc = html.find("<div class=\"toc\">").expect("toc present");
    let body = html.find("<h1 id=\"one\">").expect("body present");
    assert!(toc < body);
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>One</title>"));
    assert!(html.contains("counter(page)"));
  }

  #[test]
  fn test_no_toc_block_without_toc() {
    let html = assemble(&document("Plain text.\n"), &AssembleOptions::default())
      .expect("assembles");
    assert!(!html.contains("class=\"toc\""));
    assert!(html.contains("<title>Document</title>"));
  }

  #[test]
  fn test_title_precedence_and_escaping() {
    let options = AssembleOptions {
      title:        Some("Q&A <draft>".to_string()),
      extra_styles: vec!["body { color: red; }".to_string()],
    };
    let html =
      assemble(&document("# Heading\n"), &options).expect("assembles");
    assert!(html.contains("<title>Q&amp;A &lt;draft&gt;</title>"));
    assert!(html.contains("body { color: red; }"));
    // user styles come after the built-in sheet
    let builtin = html.find("page-break-after").expect("builtin css");
    let extra = html.find("color: red").expect("extra css");
    assert!(builtin < extra);
  }

  #[test]
  fn test_blank_explicit_title_falls_back() {
    let options = AssembleOptions {
      title: Some("   ".to_string()),
      ..AssembleOptions::default()
    };
    let html = assemble(&document("# Real\n"), &options).expect("assembles");
    assert!(html.contains("<title>Real</title>"));
  }

  #[test]
  fn test_deterministic() {
    let doc = document("# A\n## B\nhttps://example.com\n");
    let options = AssembleOptions::default();
    assert_eq!(
      assemble(&doc, &options).expect("first"),
      assemble(&doc, &options).expect("second")
    );
  }

  #[test]
  fn test_empty_body_still_assembles() {
    let html =
      assemble(&document(""), &AssembleOptions::default()).expect("assembles");
    assert!(html.contains("<body>"));
  }
}
