//! DOM helpers shared by the heading and link passes.
use kuchikikiki::{Attribute, ExpandedName, NodeRef};
use markup5ever::{LocalName, QualName, ns};
use tendril::TendrilSink;

use crate::error::{AnnotateError, AnnotateResult};

/// Parse an HTML fragment into a DOM tree, in the context of a `<body>`.
///
/// html5ever recovers from any malformed input, so this never fails. The
/// fragment's nodes, including leading `<style>`, `<link>` or comments, end
/// up in order under a single synthesized `<html>` root.
#[must_use]
pub fn parse_fragment(html: &str) -> NodeRef {
  kuchikikiki::parse_fragment(
    QualName::new(None, ns!(html), LocalName::from("body")),
    Vec::new(),
  )
  .one(html)
}

/// Serialize the nodes of a fragment parsed by [`parse_fragment`].
///
/// # Errors
///
/// Returns an error if the tree has no fragment root or serialization fails.
pub fn serialize_fragment(document: &NodeRef) -> AnnotateResult<String> {
  let root = document
    .children()
    .find(|child| child.as_element().is_some())
    .ok_or(AnnotateError::MissingRoot)?;

  let mut out = Vec::new();
  for child in root.children() {
    child.serialize(&mut out)?;
  }
  Ok(String::from_utf8(out)?)
}

/// Local tag name of an element node.
#[must_use]
pub fn element_name(node: &NodeRef) -> Option<&str> {
  node.as_element().map(|element| element.name.local.as_ref())
}

/// Heading level of an `<h1>`..`<h6>` element.
#[must_use]
pub fn heading_level(node: &NodeRef) -> Option<u8> {
  match element_name(node)? {
    "h1" => Some(1),
    "h2" => Some(2),
    "h3" => Some(3),
    "h4" => Some(4),
    "h5" => Some(5),
    "h6" => Some(6),
    _ => None,
  }
}

/// Read an attribute of an element node.
#[must_use]
pub fn get_attribute(node: &NodeRef, name: &str) -> Option<String> {
  node
    .as_element()?
    .attributes
    .borrow()
    .get(name)
    .map(ToString::to_string)
}

/// Set an attribute on an element node. Returns `true` if the stored value
/// changed.
pub fn set_attribute(node: &NodeRef, name: &str, value: &str) -> bool {
  let Some(element) = node.as_element() else {
    return false;
  };
  let mut attributes = element.attributes.borrow_mut();
  if attributes.get(name) == Some(value) {
    return false;
  }
  attributes.insert(name, value.to_string());
  true
}

/// Create a detached HTML element with the given attributes.
#[must_use]
pub fn new_html_element(name: &str, attributes: &[(&str, &str)]) -> NodeRef {
  NodeRef::new_element(
    QualName::new(None, ns!(html), LocalName::from(name)),
    attributes.iter().map(|(key, value)| {
      (ExpandedName::new("", *key), Attribute {
        prefix: None,
        value:  (*value).to_string(),
      })
    }),
  )
}

/// Collapse all whitespace runs to single spaces and trim the ends.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Create a regex that never matches anything.
///
/// This is used as a fallback pattern when a regex fails to compile.
///
/// # Panics
///
/// Panics if the fallback regex pattern `r"^\b$"` fails to compile, which
/// should never happen.
#[must_use]
#[allow(clippy::unwrap_used, reason = "Both patterns are literal and valid")]
pub fn never_matching_regex() -> regex::Regex {
  regex::Regex::new(r"[^\s\S]")
    .unwrap_or_else(|_| regex::Regex::new(r"^\b$").unwrap())
}
