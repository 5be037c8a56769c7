use std::{io, path::PathBuf};

use mdpdf_annotate::AnnotateError;
use mdpdf_html::AssembleError;
use mdpdf_render::RenderError;
use thiserror::Error;

use crate::input::InputError;

/// Top-level error type for a single conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
  #[error(transparent)]
  Input(#[from] InputError),

  #[error("Annotation error: {0}")]
  Annotate(#[from] AnnotateError),

  #[error("Assembly error: {0}")]
  Assemble(#[from] AssembleError),

  #[error("Rendering error: {0}")]
  Render(#[from] RenderError),

  #[error("Failed to read stylesheet {}: {source}", .path.display())]
  Stylesheet {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),
}

pub type ConvertResult<T> = Result<T, ConvertError>;
