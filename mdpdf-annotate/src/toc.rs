//! Table of contents synthesis.
//!
//! Heading levels are renormalized so the shallowest level present becomes
//! depth 1. Nesting is then driven by a depth counter: moving deeper opens
//! one list per level skipped, moving shallower closes them again. This
//! tolerates arbitrary jumps between levels, which is why no recursive
//! grammar over the headings is attempted.
use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};
use log::debug;

use crate::{
  error::AnnotateResult,
  headings::annotate_headings,
  types::{Heading, OutlineNode, TableOfContents},
};

/// Heading of the TOC block unless configured otherwise.
pub const DEFAULT_TOC_TITLE: &str = "Table of Contents";

/// Result of [`generate`]: the optional TOC and the id-annotated HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocPass {
  pub toc:      Option<TableOfContents>,
  pub html:     String,
  pub headings: Vec<Heading>,
}

/// Effective depth of every heading: `level - min_level + 1`.
#[must_use]
pub fn effective_depths(headings: &[Heading]) -> Vec<usize> {
  let Some(min_level) = headings.iter().map(|h| h.level).min() else {
    return Vec::new();
  };
  headings
    .iter()
    .map(|h| usize::from(h.level - min_level) + 1)
    .collect()
}

/// Build the outline forest.
///
/// Each heading becomes a child of the closest preceding heading with a
/// smaller effective depth, or a root when there is none. Skipped levels do
/// not produce intermediate nodes.
#[must_use]
pub fn build_outline(headings: &[Heading]) -> Vec<OutlineNode> {
  let depths = effective_depths(headings);
  let mut roots = Vec::new();
  let mut open: Vec<(usize, OutlineNode)> = Vec::new();

  for (heading, depth) in headings.iter().zip(depths) {
    while open.last().is_some_and(|(open_depth, _)| *open_depth >= depth) {
      if let Some((_, finished)) = open.pop() {
        attach(&mut open, &mut roots, finished);
      }
    }
    open.push((depth, OutlineNode::new(heading.clone())));
  }

  while let Some((_, finished)) = open.pop() {
    attach(&mut open, &mut roots, finished);
  }

  roots
}

fn attach(
  open: &mut [(usize, OutlineNode)],
  roots: &mut Vec<OutlineNode>,
  node: OutlineNode,
) {
  match open.last_mut() {
    Some((_, parent)) => parent.children.push(node),
    None => roots.push(node),
  }
}

/// Render the TOC block for `headings`.
///
/// Every opened list is tagged `toc-level-{depth}`, the outermost one being
/// `toc-level-1`.
#[must_use]
pub fn render_markup(headings: &[Heading], title: &str) -> String {
  let depths = effective_depths(headings);
  let mut toc = String::with_capacity(64 + headings.len() * 96);
  let mut current_depth = 0;

  toc.push_str("<div class=\"toc\">");
  // Writing to String is infallible
  let _ = write!(toc, "<h2>{}</h2>", encode_text(title));

  for (heading, depth) in headings.iter().zip(depths) {
    if depth > current_depth {
      // Level jumps open one `<ul>` per skipped depth, directly inside the
      // previous `<ul>`, so each depth keeps its own toc-level class.
      for level in current_depth + 1..=depth {
        let _ = write!(toc, "<ul class=\"toc-level-{level}\">");
      }
    } else if depth < current_depth {
      for _ in depth..current_depth {
        toc.push_str("</ul>");
      }
    }

    let _ = write!(
      toc,
      "<li class=\"toc-item\"><a href=\"#{}\">{}</a></li>",
      encode_double_quoted_attribute(&heading.slug),
      encode_text(&heading.text)
    );
    current_depth = depth;
  }

  for _ in 0..current_depth {
    toc.push_str("</ul>");
  }
  toc.push_str("</div>");
  toc
}

/// Build the table of contents for a document's headings.
///
/// Returns `None` for fewer than two headings: a single heading keeps its
/// anchor id but gets no visible outline.
#[must_use]
pub fn build(headings: &[Heading], title: &str) -> Option<TableOfContents> {
  if headings.len() < 2 {
    debug!(
      "Skipping table of contents for a document with {} heading(s)",
      headings.len()
    );
    return None;
  }

  Some(TableOfContents {
    outline: build_outline(headings),
    markup:  render_markup(headings, title),
  })
}

/// Annotate the headings in `html` and build its table of contents in one go.
///
/// # Errors
///
/// Returns an error if the annotated DOM cannot be serialized.
pub fn generate(html: &str, title: &str) -> AnnotateResult<TocPass> {
  let pass = annotate_headings(html)?;
  Ok(TocPass {
    toc:      build(&pass.headings, title),
    html:     pass.html,
    headings: pass.headings,
  })
}
