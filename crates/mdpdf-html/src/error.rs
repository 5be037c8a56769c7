use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssembleError {
  #[error("Template error: {0}")]
  Template(#[from] tera::Error),
}

pub type AssembleResult<T> = Result<T, AssembleError>;
