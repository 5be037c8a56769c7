//! Types for mdpdf-annotate public API and internal use.
use serde::{Deserialize, Serialize};

/// A heading found in rendered HTML, in document order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Heading {
  /// Heading level (1-6).
  pub level: u8,
  /// Visible heading text with whitespace collapsed.
  pub text:  String,
  /// Anchor id assigned to the heading, unique within the document.
  pub slug:  String,
}

/// One entry of the document outline together with its nested entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutlineNode {
  pub heading:  Heading,
  pub children: Vec<Self>,
}

impl OutlineNode {
  #[must_use]
  pub const fn new(heading: Heading) -> Self {
    Self {
      heading,
      children: Vec::new(),
    }
  }

  /// Number of nodes in this subtree, including `self`.
  #[must_use]
  pub fn len(&self) -> usize {
    1 + self.children.iter().map(Self::len).sum::<usize>()
  }

  /// Always `false`; a node contains at least itself.
  #[must_use]
  pub const fn is_empty(&self) -> bool {
    false
  }
}

/// A synthesized table of contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableOfContents {
  /// Outline forest; roots are the headings at effective depth 1 and any
  /// heading that precedes every shallower heading.
  pub outline: Vec<OutlineNode>,

  /// Rendered `<div class="toc">` block.
  pub markup: String,
}

/// Structural context of a text node, decided by its nearest `a`, `code` or
/// `pre` ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkContext {
  /// Inside an `<a>` element.
  Anchor,
  /// Inside inline `<code>`.
  Code,
  /// Inside `<pre>` or another element whose text is taken literally.
  Preformatted,
  /// Ordinary flowing text; eligible for auto-linking.
  Plain,
}

/// A text span considered for auto-linking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
  pub text:    String,
  pub context: LinkContext,
}

impl LinkCandidate {
  /// Whether URLs in this span may be wrapped in new anchors.
  #[must_use]
  pub fn is_linkable(&self) -> bool {
    self.context == LinkContext::Plain
  }
}

/// Result of running the annotation pipeline over one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedDocument {
  /// Body HTML with heading ids and normalized links.
  pub body: String,

  /// Table of contents, present only when requested and the document has at
  /// least two headings.
  pub toc: Option<TableOfContents>,

  /// Every heading in document order.
  pub headings: Vec<Heading>,

  /// Title of the document, if found (first level-1 heading).
  pub title: Option<String>,
}
