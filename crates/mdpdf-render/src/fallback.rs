use std::fmt;

use log::{debug, error, warn};

use crate::{
  PdfRenderer,
  RenderOptions,
  error::{RenderError, RenderResult},
};

/// One way of invoking the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderStrategy {
  /// Base URL context plus the fallback link stylesheet.
  Enhanced,
  /// The document alone.
  Plain,
}

/// Order used when the caller has no preference.
pub const DEFAULT_STRATEGIES: &[RenderStrategy] =
  &[RenderStrategy::Enhanced, RenderStrategy::Plain];

/// Inputs the strategies draw their options from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackSettings {
  pub base_url:        String,
  pub link_stylesheet: String,
}

impl FallbackSettings {
  #[must_use]
  pub fn new(
    base_url: impl Into<String>,
    link_stylesheet: impl Into<String>,
  ) -> Self {
    Self {
      base_url:        base_url.into(),
      link_stylesheet: link_stylesheet.into(),
    }
  }
}

impl RenderStrategy {
  #[must_use]
  pub fn options(self, settings: &FallbackSettings) -> RenderOptions {
    match self {
      Self::Enhanced => {
        RenderOptions {
          base_url:    Some(settings.base_url.clone())
            .filter(|url| !url.is_empty()),
          stylesheets: if settings.link_stylesheet.is_empty() {
            Vec::new()
          } else {
            vec![settings.link_stylesheet.clone()]
          },
        }
      },
      Self::Plain => RenderOptions::default(),
    }
  }
}

impl fmt::Display for RenderStrategy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Enhanced => f.write_str("enhanced"),
      Self::Plain => f.write_str("plain"),
    }
  }
}

/// Try each strategy in order and return the first PDF produced.
///
/// # Errors
///
/// Returns [`RenderError::Exhausted`] carrying the last failure when every
/// strategy fails, or [`RenderError::NoStrategies`] for an empty list.
pub fn render_with_fallback<R: PdfRenderer + ?Sized>(
  renderer: &R,
  html: &str,
  strategies: &[RenderStrategy],
  settings: &FallbackSettings,
) -> RenderResult<Vec<u8>> {
  let mut last_error = None;

  for (attempt, strategy) in strategies.iter().enumerate() {
    debug!("Render attempt {} using {strategy} strategy", attempt + 1);
    match renderer.render(html, &strategy.options(settings)) {
      Ok(pdf) => return Ok(pdf),
      Err(err) => {
        warn!("Render attempt {} ({strategy}) failed: {err}", attempt + 1);
        last_error = Some(err);
      },
    }
  }

  let Some(source) = last_error else {
    return Err(RenderError::NoStrategies);
  };
  error!("All {} render attempt(s) failed", strategies.len());
  Err(RenderError::Exhausted {
    attempts: strategies.len(),
    source:   Box::new(source),
  })
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, clippy::panic, reason = "Fine in tests")]
  use std::sync::Mutex;

  use super::*;

  /// Fails the first `failures` calls, recording the options of every call.
  struct Flaky {
    failures: usize,
    calls:    Mutex<Vec<RenderOptions>>,
  }

  impl Flaky {
    fn new(failures: usize) -> Self {
      Self {
        failures,
        calls: Mutex::new(Vec::new()),
      }
    }

    fn calls(&self) -> Vec<RenderOptions> {
      self.calls.lock().expect("lock").clone()
    }
  }

  impl PdfRenderer for Flaky {
    fn render(
      &self,
      html: &str,
      options: &RenderOptions,
    ) -> RenderResult<Vec<u8>> {
      let mut calls = self.calls.lock().expect("lock");
      calls.push(options.clone());
      if calls.len() <= self.failures {
        Err(RenderError::Failed {
          status: Some(1),
          stderr: format!("attempt {}", calls.len()),
        })
      } else {
        Ok(html.as_bytes().to_vec())
      }
    }
  }

  fn settings() -> FallbackSettings {
    FallbackSettings::new(".", "a { color: blue; }")
  }

  #[test]
  fn test_first_strategy_success() {
    let renderer = Flaky::new(0);
    let pdf = render_with_fallback(
      &renderer,
      "doc",
      DEFAULT_STRATEGIES,
      &settings(),
    )
    .expect("renders");
    assert_eq!(pdf, b"doc");

    let calls = renderer.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].base_url.as_deref(), Some("."));
    assert_eq!(calls[0].stylesheets, vec!["a { color: blue; }"]);
  }

  #[test]
  fn test_falls_back_to_plain() {
    let renderer = Flaky::new(1);
    let pdf = render_with_fallback(
      &renderer,
      "doc",
      DEFAULT_STRATEGIES,
      &settings(),
    )
    .expect("renders");
    assert_eq!(pdf, b"doc");

    let calls = renderer.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1], RenderOptions::default());
  }

  #[test]
  fn test_exhausted_surfaces_last_cause() {
    let renderer = Flaky::new(usize::MAX);
    let err = render_with_fallback(
      &renderer,
      "doc",
      DEFAULT_STRATEGIES,
      &settings(),
    )
    .expect_err("fails");
    match err {
      RenderError::Exhausted { attempts, source } => {
        assert_eq!(attempts, 2);
        assert!(source.to_string().contains("attempt 2"));
      },
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn test_no_strategies() {
    let renderer = Flaky::new(0);
    let err = render_with_fallback(&renderer, "doc", &[], &settings())
      .expect_err("fails");
    assert!(matches!(err, RenderError::NoStrategies));
    assert!(renderer.calls().is_empty());
  }

  #[test]
  fn test_enhanced_without_settings_is_plain() {
    assert_eq!(
      RenderStrategy::Enhanced.options(&FallbackSettings::default()),
      RenderOptions::default()
    );
  }

  #[test]
  fn test_display() {
    assert_eq!(RenderStrategy::Enhanced.to_string(), "enhanced");
    assert_eq!(RenderStrategy::Plain.to_string(), "plain");
  }
}
