//! Panic-safe processing helpers.
use log::error;

/// Run `processor_fn` on `content`, recovering from panics.
///
/// Any panic raised from the HTML tooling is logged, and `fallback` (or
/// `content` itself when `fallback` is empty) is returned instead, so a
/// best-effort stage never breaks the whole conversion.
pub fn process_safe<F>(content: &str, processor_fn: F, fallback: &str) -> String
where
  F: FnOnce(&str) -> String,
{
  if content.is_empty() {
    return String::new();
  }

  let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
    processor_fn(content)
  }));

  match result {
    Ok(processed_text) => processed_text,
    Err(e) => {
      if let Some(error_msg) = e.downcast_ref::<String>() {
        error!("Error processing HTML: {error_msg}");
      } else if let Some(error_msg) = e.downcast_ref::<&str>() {
        error!("Error processing HTML: {error_msg}");
      } else {
        error!("Unknown error occurred while processing HTML");
      }

      if fallback.is_empty() {
        content.to_string()
      } else {
        fallback.to_string()
      }
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_process_safe_success() {
    let result = process_safe("content", |s| format!("processed: {s}"), "");
    assert_eq!(result, "processed: content");
  }

  #[test]
  #[allow(clippy::panic)]
  fn test_process_safe_fallback() {
    let result = process_safe("content", |_| panic!("test panic"), "fallback");
    assert_eq!(result, "fallback");
  }

  #[test]
  #[allow(clippy::panic)]
  fn test_process_safe_returns_content_without_fallback() {
    let result = process_safe("<p>x</p>", |_| panic!("test panic"), "");
    assert_eq!(result, "<p>x</p>");
  }
}
