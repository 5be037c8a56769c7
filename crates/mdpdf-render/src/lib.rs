//! HTML-to-PDF rendering for mdpdf.
//!
//! The PDF engine itself is an external collaborator behind [`PdfRenderer`].
//! [`CommandRenderer`] drives a command-line engine (WeasyPrint by default),
//! and [`render_with_fallback`] tries a short ordered list of
//! [`RenderStrategy`] values until one succeeds.
mod command;
mod error;
mod fallback;

pub use crate::{
  command::{CommandRenderer, DEFAULT_PROGRAM},
  error::{RenderError, RenderResult},
  fallback::{
    DEFAULT_STRATEGIES,
    FallbackSettings,
    RenderStrategy,
    render_with_fallback,
  },
};

/// Per-call rendering options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
  /// Base URL against which relative references are resolved.
  pub base_url: Option<String>,

  /// Stylesheets applied on top of the document's own `<style>` blocks.
  pub stylesheets: Vec<String>,
}

/// Something that turns one complete HTML document into PDF bytes.
///
/// Implementations must be usable from several threads at once; every call is
/// an independent unit of work.
pub trait PdfRenderer: Send + Sync {
  /// Render `html` to PDF.
  ///
  /// # Errors
  ///
  /// Returns an error if the engine fails or produces no output.
  fn render(&self, html: &str, options: &RenderOptions)
  -> RenderResult<Vec<u8>>;
}

impl<R: PdfRenderer + ?Sized> PdfRenderer for &R {
  fn render(
    &self,
    html: &str,
    options: &RenderOptions,
  ) -> RenderResult<Vec<u8>> {
    (**self).render(html, options)
  }
}

impl<R: PdfRenderer + ?Sized> PdfRenderer for std::sync::Arc<R> {
  fn render(
    &self,
    html: &str,
    options: &RenderOptions,
  ) -> RenderResult<Vec<u8>> {
    (**self).render(html, options)
  }
}
