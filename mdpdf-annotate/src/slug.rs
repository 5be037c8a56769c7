//! Anchor id generation.
//!
//! Ids are derived from heading text by lower-casing it, turning whitespace
//! runs into a single hyphen and dropping everything outside `[a-z0-9-]`.
//! Uniqueness is scoped to a [`SlugRegistry`], which a caller creates for one
//! document and throws away afterwards.
use std::collections::HashSet;

/// Set of anchor ids already handed out within one document.
#[derive(Debug, Default, Clone)]
pub struct SlugRegistry {
  assigned: HashSet<String>,
}

impl SlugRegistry {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  #[must_use]
  pub fn contains(&self, slug: &str) -> bool {
    self.assigned.contains(slug)
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.assigned.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.assigned.is_empty()
  }

  /// Reserve `base`, or `base-N` with the smallest `N >= 1` that is still
  /// free, and return the reserved value.
  pub fn claim(&mut self, base: &str) -> String {
    if !self.assigned.contains(base) {
      self.assigned.insert(base.to_string());
      return base.to_string();
    }

    let mut n: usize = 1;
    loop {
      let candidate = format!("{base}-{n}");
      if !self.assigned.contains(&candidate) {
        self.assigned.insert(candidate.clone());
        return candidate;
      }
      n += 1;
    }
  }

  /// Like [`slugify`], but headings whose text yields an empty id get
  /// `section-{position}` instead, `position` being the 1-based index of the
  /// heading in the document.
  pub fn assign(&mut self, text: &str, position: usize) -> String {
    let base = base_slug(text);
    if base.is_empty() {
      self.claim(&format!("section-{position}"))
    } else {
      self.claim(&base)
    }
  }
}

/// Derive the un-deduplicated id for `text`.
///
/// May be empty when `text` has no characters in `[a-z0-9]` after
/// lower-casing.
#[must_use]
pub fn base_slug(text: &str) -> String {
  let mut slug = String::with_capacity(text.len());
  let mut in_whitespace = false;

  for c in text.to_lowercase().chars() {
    if c.is_whitespace() {
      if !in_whitespace {
        slug.push('-');
      }
      in_whitespace = true;
      continue;
    }
    in_whitespace = false;
    if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
      slug.push(c);
    }
  }

  slug
}

/// Turn `text` into an anchor id that is not yet in `registry`, and record
/// it there.
///
/// Never fails; the result is empty for text without any usable characters
/// (see [`SlugRegistry::assign`] for the variant used on headings).
pub fn slugify(text: &str, registry: &mut SlugRegistry) -> String {
  registry.claim(&base_slug(text))
}
