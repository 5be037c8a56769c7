use std::{io, string::FromUtf8Error};

use thiserror::Error;

/// Error type for the annotation pipeline.
#[derive(Debug, Error)]
pub enum AnnotateError {
  #[error("Failed to serialize annotated HTML: {0}")]
  Serialize(#[from] io::Error),

  #[error("Serialized HTML is not valid UTF-8: {0}")]
  Utf8(#[from] FromUtf8Error),

  #[error("Parsed fragment has no root element")]
  MissingRoot,
}

/// Result type for annotation operations.
pub type AnnotateResult<T> = Result<T, AnnotateError>;
