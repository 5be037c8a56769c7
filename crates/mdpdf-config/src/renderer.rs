use mdpdf_render::{CommandRenderer, DEFAULT_PROGRAM};
use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, parse};

/// Configuration for the external HTML-to-PDF engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
  /// Program to run, looked up in `PATH` unless given as a path
  pub program: String,

  /// Extra arguments placed before the generated options
  pub args: Vec<String>,

  /// Base URL for the first render attempt
  ///
  /// An empty string disables the base URL context entirely.
  pub base_url: String,
}

impl Default for RendererConfig {
  fn default() -> Self {
    Self {
      program:  DEFAULT_PROGRAM.to_string(),
      args:     Vec::new(),
      base_url: ".".to_string(),
    }
  }
}

impl RendererConfig {
  /// Renderer described by this configuration.
  #[must_use]
  pub fn command(&self) -> CommandRenderer {
    CommandRenderer::new(&self.program).with_args(self.args.iter().cloned())
  }

  pub(crate) fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "program" => self.program = value.to_string(),
      "args" => self.args = parse::parse_list(value),
      "base_url" => self.base_url = value.to_string(),
      _ => return Err(parse::unknown_key(&format!("renderer.{key}"))),
    }
    Ok(())
  }

  pub(crate) fn merge(&mut self, other: Self) {
    self.program = other.program;
    self.args.extend(other.args);
    self.base_url = other.base_url;
  }
}
