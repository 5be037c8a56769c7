//! Link normalization and bare URL auto-linking.
//!
//! The DOM is walked once, top-down, carrying the [`LinkContext`] of the
//! nearest `a`, `code` or `pre` ancestor. Only text in the
//! [`LinkContext::Plain`] context is scanned for URLs, so code samples and
//! existing link text are never rewritten.
use std::{ops::Range, sync::LazyLock};

use kuchikikiki::NodeRef;
use log::{debug, error, warn};
use regex::Regex;

use crate::{
  error::AnnotateResult,
  processor::process::process_safe,
  types::{LinkCandidate, LinkContext},
  utils::{self, element_name, get_attribute, set_attribute},
};

/// Inline style applied to every anchor so links stay visibly underlined in
/// the rendered PDF.
pub const LINK_STYLE: &str = "color: #0066cc; text-decoration: underline;";

static BARE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"https?://[^\s<>"']+"#).unwrap_or_else(|e| {
    error!("Failed to compile BARE_URL_RE regex: {e}");
    utils::never_matching_regex()
  })
});

static SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").unwrap_or_else(|e| {
    error!("Failed to compile SCHEME_RE regex: {e}");
    utils::never_matching_regex()
  })
});

/// Schemes that are written without `//`.
const OPAQUE_SCHEMES: [&str; 3] = ["mailto:", "tel:", "data:"];

/// Counts of the changes made by one normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
  pub prefixed_hrefs: usize,
  pub styled_anchors: usize,
  pub wrapped_urls:   usize,
}

impl LinkStats {
  #[must_use]
  pub const fn is_unchanged(&self) -> bool {
    self.prefixed_hrefs == 0 && self.styled_anchors == 0 && self.wrapped_urls == 0
  }
}

fn has_scheme(href: &str) -> bool {
  SCHEME_RE.is_match(href)
    || OPAQUE_SCHEMES.iter().any(|scheme| {
      href
        .get(..scheme.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Return the rewritten target for an href that lacks a scheme.
///
/// Fragment links (`#...`), rooted or protocol-relative paths (`/...`),
/// `mailto:` links, empty targets and targets that already carry a scheme
/// yield `None`.
#[must_use]
pub fn normalize_href(href: &str) -> Option<String> {
  let trimmed = href.trim();
  if trimmed.is_empty()
    || trimmed.starts_with('#')
    || trimmed.starts_with('/')
    || trimmed.starts_with("mailto:")
    || has_scheme(trimmed)
  {
    return None;
  }
  Some(format!("https://{trimmed}"))
}

fn trim_trailing_punctuation(url: &str) -> &str {
  let mut end = url.len();
  while let Some(last) = url[..end].chars().next_back() {
    let candidate = &url[..end];
    let strip = match last {
      '.' | ',' | ';' | ':' | '!' | '?' => true,
      ')' => candidate.matches(')').count() > candidate.matches('(').count(),
      _ => false,
    };
    if !strip {
      break;
    }
    end -= last.len_utf8();
  }
  &url[..end]
}

/// Byte ranges of the scheme-prefixed URLs in `text`.
///
/// Trailing sentence punctuation is excluded from each match.
#[must_use]
pub fn find_urls(text: &str) -> Vec<Range<usize>> {
  BARE_URL_RE
    .find_iter(text)
    .filter_map(|found| {
      let url = trim_trailing_punctuation(found.as_str());
      let scheme_len = url.find("://").map_or(url.len(), |i| i + 3);
      (url.len() > scheme_len).then(|| found.start()..found.start() + url.len())
    })
    .collect()
}

fn context_for(node: &NodeRef, inherited: LinkContext) -> LinkContext {
  match element_name(node) {
    Some("a") => LinkContext::Anchor,
    Some("code" | "kbd" | "samp") => LinkContext::Code,
    Some("pre" | "script" | "style" | "textarea") => LinkContext::Preformatted,
    _ => inherited,
  }
}

/// Walk the DOM and collect anchors and linkable text nodes.
fn classify(document: &NodeRef) -> (Vec<NodeRef>, Vec<(NodeRef, LinkCandidate)>) {
  let mut anchors = Vec::new();
  let mut candidates = Vec::new();
  let mut stack = vec![(document.clone(), LinkContext::Plain)];

  while let Some((node, inherited)) = stack.pop() {
    if let Some(text) = node.as_text() {
      let candidate = LinkCandidate {
        text:    text.borrow().clone(),
        context: inherited,
      };
      if candidate.is_linkable() && BARE_URL_RE.is_match(&candidate.text) {
        candidates.push((node.clone(), candidate));
      }
      continue;
    }

    let context = context_for(&node, inherited);
    if element_name(&node) == Some("a") {
      anchors.push(node.clone());
    }

    let children: Vec<NodeRef> = node.children().collect();
    stack.extend(children.into_iter().rev().map(|child| (child, context)));
  }

  (anchors, candidates)
}

/// Replace a text node by text and anchor nodes, one anchor per URL.
/// Returns the number of anchors created.
fn wrap_urls(text_node: &NodeRef, text: &str) -> usize {
  let ranges = find_urls(text);
  if ranges.is_empty() {
    return 0;
  }

  let mut last_end = 0;
  for range in &ranges {
    if range.start > last_end {
      text_node.insert_before(NodeRef::new_text(&text[last_end..range.start]));
    }
    let url = &text[range.clone()];
    let anchor =
      utils::new_html_element("a", &[("href", url), ("style", LINK_STYLE)]);
    anchor.append(NodeRef::new_text(url));
    text_node.insert_before(anchor);
    last_end = range.end;
  }
  if last_end < text.len() {
    text_node.insert_before(NodeRef::new_text(&text[last_end..]));
  }
  text_node.detach();

  ranges.len()
}

/// Normalize every link in a parsed document in place.
pub fn normalize_document(document: &NodeRef) -> LinkStats {
  let (anchors, candidates) = classify(document);
  let mut stats = LinkStats::default();

  for anchor in &anchors {
    if let Some(href) = get_attribute(anchor, "href")
      && let Some(normalized) = normalize_href(&href)
    {
      set_attribute(anchor, "href", &normalized);
      stats.prefixed_hrefs += 1;
    }
    if set_attribute(anchor, "style", LINK_STYLE) {
      stats.styled_anchors += 1;
    }
  }

  for (text_node, candidate) in &candidates {
    stats.wrapped_urls += wrap_urls(text_node, &candidate.text);
  }

  stats
}

/// Normalize the links of an HTML fragment.
///
/// Returns the input unchanged when nothing needed rewriting, which makes
/// the operation idempotent on its own output.
///
/// # Errors
///
/// Returns an error if the rewritten DOM cannot be serialized.
pub fn normalize_links(html: &str) -> AnnotateResult<String> {
  let document = utils::parse_fragment(html);
  let stats = normalize_document(&document);
  debug!(
    "Link normalization: {} href(s) prefixed, {} anchor(s) styled, {} URL(s) \
     auto-linked",
    stats.prefixed_hrefs, stats.styled_anchors, stats.wrapped_urls
  );

  if stats.is_unchanged() {
    return Ok(html.to_string());
  }
  utils::serialize_fragment(&document)
}

/// Best-effort variant of [`normalize_links`].
///
/// Any failure, including a panic inside the HTML tooling, is logged and the
/// original HTML is returned.
#[must_use]
pub fn normalize_links_or_passthrough(html: &str) -> String {
  process_safe(
    html,
    |html| {
      normalize_links(html).unwrap_or_else(|e| {
        warn!("Could not process links in HTML, leaving them as-is: {e}");
        html.to_string()
      })
    },
    html,
  )
}
