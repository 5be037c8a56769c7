//! # mdpdf-annotate
//!
//! The annotation pipeline that sits between Markdown rendering and PDF
//! rasterisation. It takes the HTML produced for a Markdown document and
//!
//! - assigns every heading a unique, stable anchor id,
//! - synthesizes a nested table of contents from the heading structure, and
//! - normalizes existing links and turns bare URLs into clickable anchors
//!   without touching code or preformatted text.
//!
//! ## Quick Start
//!
//! ```rust
//! use mdpdf_annotate::{AnnotateOptions, Annotator};
//!
//! let annotator = Annotator::new(AnnotateOptions::default());
//! let document = annotator
//!   .annotate_markdown("# Intro\n\nSee https://example.com\n\n## Usage\n")
//!   .expect("annotation succeeds");
//!
//! assert!(document.toc.is_some());
//! assert!(document.body.contains(r#"<h1 id="intro">"#));
//! assert!(document.body.contains(r#"href="https://example.com""#));
//! ```
//!
//! ## Stages
//!
//! Each stage is usable on its own:
//!
//! - [`slug`]: anchor id generation scoped by a [`SlugRegistry`]
//! - [`headings`]: heading discovery and id assignment on a parsed DOM
//! - [`toc`]: outline construction and table of contents markup
//! - [`links`]: href normalization and bare URL auto-linking
//! - [`markdown`]: the comrak configuration used to produce the input HTML

mod error;
pub mod headings;
pub mod links;
pub mod markdown;
pub mod processor;
pub mod slug;
pub mod toc;
mod types;
pub mod utils;

pub use crate::{
  error::{AnnotateError, AnnotateResult},
  processor::{AnnotateOptions, Annotator},
  slug::{SlugRegistry, slugify},
  types::{
    AnnotatedDocument,
    Heading,
    LinkCandidate,
    LinkContext,
    OutlineNode,
    TableOfContents,
  },
};
