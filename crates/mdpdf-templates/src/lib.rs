use std::collections::HashMap;

pub const DOCUMENT_TEMPLATE: &str = include_str!("../templates/document.html");
pub const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

pub const DEFAULT_CSS: &str = include_str!("../templates/default.css");
pub const LINK_CSS: &str = include_str!("../templates/links.css");

#[must_use]
pub fn all_templates() -> HashMap<&'static str, &'static str> {
  let mut templates = HashMap::new();
  templates.insert("document.html", DOCUMENT_TEMPLATE);
  templates.insert("index.html", INDEX_TEMPLATE);
  templates.insert("default.css", DEFAULT_CSS);
  templates.insert("links.css", LINK_CSS);
  templates
}
