//! Markdown to PDF conversion.
//!
//! [`Converter`] drives the annotation pipeline from `mdpdf-annotate`, the
//! document assembler from `mdpdf-html` and a renderer from `mdpdf-render`.
//! Input validation for uploads lives in [`input`], and the optional HTTP front
//! end in `serve` (cargo feature `serve`).
pub mod cli;
pub mod convert;
pub mod error;
pub mod input;
#[cfg(feature = "serve")]
pub mod serve;

pub use crate::{
  convert::Converter,
  error::{ConvertError, ConvertResult},
  input::{InputError, MarkdownInput},
};
