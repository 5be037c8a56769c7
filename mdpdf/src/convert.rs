//! Markdown to PDF conversion.
use std::{fs, path::Path};

use log::{debug, info};
use mdpdf_annotate::Annotator;
use mdpdf_config::Config;
use mdpdf_html::AssembleOptions;
use mdpdf_render::{
  CommandRenderer,
  DEFAULT_STRATEGIES,
  FallbackSettings,
  PdfRenderer,
  render_with_fallback,
};
use mdpdf_templates::LINK_CSS;

use crate::error::{ConvertError, ConvertResult};

/// Runs the whole chain for one document at a time: Markdown parse, heading
/// and TOC pass, link pass, assembly, render.
///
/// A `Converter` holds no per-document state and may be shared between
/// threads; every call builds its own annotation state.
#[derive(Debug)]
pub struct Converter<R = CommandRenderer> {
  config:       Config,
  renderer:     R,
  extra_styles: Vec<String>,
  fallback:     FallbackSettings,
}

impl Converter {
  /// Converter using the configured external renderer.
  ///
  /// # Errors
  ///
  /// Returns an error if a configured stylesheet cannot be read.
  pub fn new(config: Config) -> ConvertResult<Self> {
    let renderer = config.renderer.command();
    Self::with_renderer(config, renderer)
  }
}

impl<R: PdfRenderer> Converter<R> {
  /// Converter using `renderer` for the PDF step.
  ///
  /// # Errors
  ///
  /// Returns an error if a configured stylesheet cannot be read.
  pub fn with_renderer(config: Config, renderer: R) -> ConvertResult<Self> {
    let extra_styles = config
      .stylesheet_paths
      .iter()
      .map(|path| {
        fs::read_to_string(path).map_err(|source| {
          ConvertError::Stylesheet {
            path: path.clone(),
            source,
          }
        })
      })
      .collect::<ConvertResult<Vec<_>>>()?;
    debug!("Loaded {} custom stylesheet(s)", extra_styles.len());

    let fallback =
      FallbackSettings::new(config.renderer.base_url.clone(), LINK_CSS);

    Ok(Self {
      config,
      renderer,
      extra_styles,
      fallback,
    })
  }

  #[must_use]
  pub const fn config(&self) -> &Config {
    &self.config
  }

  #[must_use]
  pub const fn renderer(&self) -> &R {
    &self.renderer
  }

  /// The complete HTML document that would be rendered.
  ///
  /// # Errors
  ///
  /// Returns an error if annotation or assembly fails.
  pub fn render_html(
    &self,
    markdown: &str,
    include_toc: bool,
  ) -> ConvertResult<String> {
    let annotator = Annotator::new(self.config.annotate_options(include_toc));
    let document = annotator.annotate_markdown(markdown)?;
    debug!(
      "Annotated {} heading(s), table of contents: {}",
      document.headings.len(),
      document.toc.is_some()
    );

    let options = AssembleOptions {
      title:        self.config.title.clone(),
      extra_styles: self.extra_styles.clone(),
    };
    Ok(mdpdf_html::assemble(&document, &options)?)
  }

  /// Convert Markdown to PDF bytes.
  ///
  /// # Errors
  ///
  /// Returns an error if assembly fails or every render attempt fails.
  pub fn convert(
    &self,
    markdown: &str,
    include_toc: bool,
  ) -> ConvertResult<Vec<u8>> {
    let html = self.render_html(markdown, include_toc)?;
    let pdf = render_with_fallback(
      &self.renderer,
      &html,
      DEFAULT_STRATEGIES,
      &self.fallback,
    )?;
    info!("Successfully converted to PDF ({} bytes)", pdf.len());
    Ok(pdf)
  }

  /// Convert Markdown and write the PDF to `path`.
  ///
  /// Nothing is written unless rendering succeeds.
  ///
  /// # Errors
  ///
  /// Returns an error if conversion fails or the file cannot be written.
  pub fn convert_to_path(
    &self,
    markdown: &str,
    path: &Path,
    include_toc: bool,
  ) -> ConvertResult<()> {
    let pdf = self.convert(markdown, include_toc)?;
    fs::write(path, pdf)?;
    info!("Wrote {}", path.display());
    Ok(())
  }
}
