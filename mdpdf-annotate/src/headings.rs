//! Heading discovery and anchor id assignment.
//!
//! Headings are located structurally in the parsed DOM rather than by text,
//! so two headings with identical text and level are still told apart by
//! their position in the document.
use kuchikikiki::NodeRef;
use log::trace;
use markup5ever::local_name;

use crate::{
  error::AnnotateResult,
  slug::SlugRegistry,
  types::Heading,
  utils::{self, collapse_whitespace, heading_level},
};

/// A heading element found in a parsed document.
#[derive(Debug, Clone)]
pub struct HeadingOccurrence {
  pub level: u8,
  pub text:  String,
  pub node:  NodeRef,
}

impl HeadingOccurrence {
  /// The `id` the element already carries, if any.
  #[must_use]
  pub fn existing_id(&self) -> Option<String> {
    utils::get_attribute(&self.node, "id")
      .map(|id| id.trim().to_string())
      .filter(|id| !id.is_empty())
  }
}

/// Result of the heading pass over an HTML string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingPass {
  /// HTML with `id` attributes on every heading. Identical to the input when
  /// the document has no headings.
  pub html:     String,
  pub headings: Vec<Heading>,
}

/// Find every `<h1>`..`<h6>` in document order.
///
/// A matched heading's subtree is not searched further, so a heading nested
/// inside another (only possible in malformed input) is reported as part of
/// its ancestor's text.
#[must_use]
pub fn extract_headings(document: &NodeRef) -> Vec<HeadingOccurrence> {
  let mut found = Vec::new();
  let mut stack = vec![document.clone()];

  while let Some(node) = stack.pop() {
    if let Some(level) = heading_level(&node) {
      found.push(HeadingOccurrence {
        level,
        text: collapse_whitespace(&node.text_contents()),
        node,
      });
      continue;
    }

    let children: Vec<NodeRef> = node.children().collect();
    stack.extend(children.into_iter().rev());
  }

  trace!("Found {} heading elements", found.len());
  found
}

/// Give each heading a unique id and write it onto the element.
///
/// Ids already present in the markup are kept when they are still free;
/// otherwise they are deduplicated like generated ones.
pub fn assign_ids(
  occurrences: &[HeadingOccurrence],
  registry: &mut SlugRegistry,
) -> Vec<Heading> {
  occurrences
    .iter()
    .enumerate()
    .map(|(index, occurrence)| {
      let slug = match occurrence.existing_id() {
        Some(id) => registry.claim(&id),
        None => registry.assign(&occurrence.text, index + 1),
      };

      if let Some(element) = occurrence.node.as_element() {
        element
          .attributes
          .borrow_mut()
          .insert(local_name!("id"), slug.clone());
      }

      Heading {
        level: occurrence.level,
        text: occurrence.text.clone(),
        slug,
      }
    })
    .collect()
}

/// Extract headings from `html` and add anchor ids to them.
///
/// A fresh [`SlugRegistry`] is used, so ids are unique within this document
/// only.
///
/// # Errors
///
/// Returns an error if the annotated DOM cannot be serialized.
pub fn annotate_headings(html: &str) -> AnnotateResult<HeadingPass> {
  let document = utils::parse_fragment(html);
  let occurrences = extract_headings(&document);

  if occurrences.is_empty() {
    return Ok(HeadingPass {
      html:     html.to_string(),
      headings: Vec::new(),
    });
  }

  let mut registry = SlugRegistry::new();
  let headings = assign_ids(&occurrences, &mut registry);

  Ok(HeadingPass {
    html: utils::serialize_fragment(&document)?,
    headings,
  })
}
