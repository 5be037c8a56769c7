use std::fmt;

/// Error type for template operations.
#[derive(Debug)]
pub enum TemplateError {
  /// Indicates that the requested configuration format is not supported.
  /// Contains the name of the unsupported format.
  UnsupportedFormat(String),
}

impl fmt::Display for TemplateError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::UnsupportedFormat(format) => {
        write!(f, "Unsupported config format: {format}")
      },
    }
  }
}

impl std::error::Error for TemplateError {}

/// Default configuration template in TOML. Every active value equals the
/// built-in default; optional settings are left commented out.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# mdpdf Configuration File

# Include a table of contents unless --no-toc is passed
include_toc = true

# Assign anchor ids to headings even when no table of contents is generated
generate_anchors = true

# Prefix scheme-less links with https:// and turn bare URLs into links
normalize_links = true

# Document title (defaults to the first level-1 heading, then "Document")
# title = "My Document"

# Heading of the table of contents block
toc_title = "Table of Contents"

# Paths to custom stylesheets, applied after the built-in one
stylesheet_paths = []

# External HTML-to-PDF engine
[renderer]
# Program to run; must accept `[-u BASE] [-s SHEET]... - -` like WeasyPrint
program = "weasyprint"

# Extra arguments placed before the generated options
args = []

# Base URL for resolving relative references on the first render attempt
base_url = "."

# HTTP front end (`mdpdf serve`)
[server]
host = "0.0.0.0"
port = 5000

# Largest accepted request body in bytes (10 MiB)
max_upload_bytes = 10485760

# Upper bound on concurrent renders (defaults to number of CPU cores)
# max_concurrent_renders = 4
"#;

/// Default configuration template in JSON format.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "include_toc": true,
  "generate_anchors": true,
  "normalize_links": true,
  "toc_title": "Table of Contents",
  "stylesheet_paths": [],
  "renderer": {
    "program": "weasyprint",
    "args": [],
    "base_url": "."
  },
  "server": {
    "host": "0.0.0.0",
    "port": 5000,
    "max_upload_bytes": 10485760
  }
}
"#;

/// Get the correct configuration template based on the requested format.
///
/// # Errors
///
/// Returns an error if the requested format is not supported.
pub fn get_template(format: &str) -> Result<&'static str, TemplateError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(TemplateError::UnsupportedFormat(format.to_string())),
  }
}
