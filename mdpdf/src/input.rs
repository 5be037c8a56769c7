//! Validation of user-supplied Markdown.
use std::path::Path;

use thiserror::Error;

/// File extensions accepted for uploads, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Download name used when no upload name is available.
pub const DEFAULT_DOWNLOAD_NAME: &str = "document.pdf";

/// Problems with the input itself. The messages are shown to users verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
  #[error("Please provide either a Markdown file or direct text input.")]
  Missing,

  #[error("Only Markdown files (.md, .markdown) are allowed.")]
  Extension,

  #[error("The uploaded file is not a valid text file.")]
  NotText,
}

/// Markdown text ready for conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownInput {
  content:  String,
  filename: Option<String>,
}

impl MarkdownInput {
  /// Direct text input.
  ///
  /// # Errors
  ///
  /// Returns [`InputError::Missing`] for empty text.
  pub fn from_text(text: impl Into<String>) -> Result<Self, InputError> {
    let content = text.into();
    if content.is_empty() {
      return Err(InputError::Missing);
    }
    Ok(Self {
      content,
      filename: None,
    })
  }

  /// An uploaded file.
  ///
  /// # Errors
  ///
  /// Returns [`InputError::Extension`] unless the sanitized name ends in
  /// `.md` or `.markdown`, and [`InputError::NotText`] if the bytes are not
  /// UTF-8.
  pub fn from_upload(
    filename: &str,
    bytes: Vec<u8>,
  ) -> Result<Self, InputError> {
    let filename = secure_filename(filename);
    let allowed = Path::new(&filename)
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| {
        ALLOWED_EXTENSIONS
          .iter()
          .any(|allowed| ext.eq_ignore_ascii_case(allowed))
      });
    if !allowed {
      return Err(InputError::Extension);
    }

    let content = String::from_utf8(bytes).map_err(|_| InputError::NotText)?;
    log::info!("Processing uploaded file: {filename}");
    Ok(Self {
      content,
      filename: Some(filename),
    })
  }

  /// Pick the input of a form submission. An upload wins over text; an upload
  /// without a file name counts as absent.
  ///
  /// # Errors
  ///
  /// Returns [`InputError::Missing`] when neither is provided, or the error of
  /// the chosen source.
  pub fn from_request(
    upload: Option<(String, Vec<u8>)>,
    text: Option<String>,
  ) -> Result<Self, InputError> {
    match upload.filter(|(filename, _)| !filename.is_empty()) {
      Some((filename, bytes)) => Self::from_upload(&filename, bytes),
      None => Self::from_text(text.unwrap_or_default()),
    }
  }

  #[must_use]
  pub fn content(&self) -> &str {
    &self.content
  }

  /// Sanitized upload name, if the input came from a file.
  #[must_use]
  pub fn filename(&self) -> Option<&str> {
    self.filename.as_deref()
  }

  /// Name for the downloaded PDF.
  #[must_use]
  pub fn download_name(&self) -> String {
    download_name(self.filename.as_deref())
  }
}

/// `<stem>.pdf`, or [`DEFAULT_DOWNLOAD_NAME`] without a usable stem.
#[must_use]
pub fn download_name(filename: Option<&str>) -> String {
  filename
    .and_then(|name| Path::new(name).file_stem())
    .and_then(|stem| stem.to_str())
    .filter(|stem| !stem.is_empty())
    .map_or_else(|| DEFAULT_DOWNLOAD_NAME.to_string(), |stem| format!("{stem}.pdf"))
}

/// Reduce a client-supplied file name to a safe, flat ASCII name.
///
/// Path separators become spaces, whitespace runs become underscores, every
/// character outside `[A-Za-z0-9_.-]` is dropped and leading or trailing dots
/// and underscores are stripped. The result may be empty.
#[must_use]
pub fn secure_filename(filename: &str) -> String {
  let flattened: String = filename
    .chars()
    .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
    .collect();

  flattened
    .split_whitespace()
    .collect::<Vec<_>>()
    .join("_")
    .chars()
    .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    .collect::<String>()
    .trim_matches(|c| c == '.' || c == '_')
    .to_string()
}
