//! Type definitions for the annotation processor.
//!
//! # Examples
//!
//! ```
//! use mdpdf_annotate::{AnnotateOptions, Annotator};
//!
//! let options = AnnotateOptions {
//!   include_toc: false,
//!   ..Default::default()
//! };
//!
//! let annotator = Annotator::new(options);
//! assert!(!annotator.options().include_toc);
//! ```
use crate::toc::DEFAULT_TOC_TITLE;

/// Options for configuring the annotation pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct AnnotateOptions {
  /// Build a table of contents when the document has two or more headings.
  pub include_toc: bool,

  /// Write anchor ids onto headings even when no TOC is built.
  pub generate_anchors: bool,

  /// Prefix scheme-less hrefs, style anchors and auto-link bare URLs.
  pub normalize_links: bool,

  /// Text of the heading at the top of the TOC block.
  pub toc_title: String,
}

impl AnnotateOptions {
  /// Default options with the TOC switched on or off.
  #[must_use]
  pub fn with_toc(include_toc: bool) -> Self {
    Self {
      include_toc,
      ..Self::default()
    }
  }
}

impl Default for AnnotateOptions {
  fn default() -> Self {
    Self {
      include_toc:      true,
      generate_anchors: true,
      normalize_links:  true,
      toc_title:        DEFAULT_TOC_TITLE.to_string(),
    }
  }
}

/// Annotation processor.
///
/// Holds no per-document state: every call to
/// [`annotate`](Annotator::annotate) uses its own slug registry, so one
/// instance can serve concurrent conversions.
#[derive(Debug, Clone, Default)]
pub struct Annotator {
  pub(crate) options: AnnotateOptions,
}
