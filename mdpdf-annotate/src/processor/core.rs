//! Core implementation of the annotation processor.
use log::{debug, trace};

use super::types::{AnnotateOptions, Annotator};
use crate::{
  error::AnnotateResult,
  headings::annotate_headings,
  links,
  markdown,
  toc,
  types::AnnotatedDocument,
};

impl Annotator {
  /// Create a new `Annotator` with the given options.
  #[must_use]
  pub const fn new(options: AnnotateOptions) -> Self {
    Self { options }
  }

  /// Access processor options.
  #[must_use]
  pub const fn options(&self) -> &AnnotateOptions {
    &self.options
  }

  /// Run the pipeline over rendered HTML.
  ///
  /// Stages run strictly in order: heading ids, table of contents, links.
  /// The link stage is best-effort and falls back to its input on failure.
  ///
  /// # Errors
  ///
  /// Returns an error if the heading pass cannot serialize its result.
  pub fn annotate(&self, html: &str) -> AnnotateResult<AnnotatedDocument> {
    let mut body = html.to_string();
    let mut headings = Vec::new();
    let mut toc = None;

    if self.options.include_toc || self.options.generate_anchors {
      let pass = annotate_headings(&body)?;
      debug!("Assigned anchor ids to {} heading(s)", pass.headings.len());

      if self.options.include_toc {
        toc = toc::build(&pass.headings, &self.options.toc_title);
      }
      body = pass.html;
      headings = pass.headings;
    } else {
      trace!("Heading pass disabled");
    }

    if self.options.normalize_links {
      body = links::normalize_links_or_passthrough(&body);
    }

    let title = headings
      .iter()
      .find(|heading| heading.level == 1)
      .map(|heading| heading.text.clone());

    Ok(AnnotatedDocument {
      body,
      toc,
      headings,
      title,
    })
  }

  /// Render Markdown with [`markdown::render_markdown`] and annotate the
  /// result.
  ///
  /// # Errors
  ///
  /// Returns an error if the heading pass cannot serialize its result.
  pub fn annotate_markdown(
    &self,
    source: &str,
  ) -> AnnotateResult<AnnotatedDocument> {
    let html = markdown::render_markdown(source);
    self.annotate(&html)
  }
}
