//! Document Assembler for mdpdf.
//!
//! Combines the optional table of contents block and the annotated body with
//! the built-in stylesheet into one complete HTML document, ready to be handed
//! to a PDF renderer.
mod error;
pub mod template;

pub use crate::{
  error::{AssembleError, AssembleResult},
  template::{AssembleOptions, DEFAULT_TITLE, assemble},
};
