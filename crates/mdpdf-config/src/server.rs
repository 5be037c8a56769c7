use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, parse};

/// Default request body limit: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Configuration for the HTTP front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  /// Address to listen on
  pub host: String,

  /// Port to listen on
  pub port: u16,

  /// Largest accepted request body, in bytes
  ///
  /// Larger requests are answered with `413 Payload Too Large`.
  pub max_upload_bytes: usize,

  /// Upper bound on concurrently running renders
  ///
  /// Defaults to the number of CPU cores when unset.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_concurrent_renders: Option<usize>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                   "0.0.0.0".to_string(),
      port:                   5000,
      max_upload_bytes:       DEFAULT_MAX_UPLOAD_BYTES,
      max_concurrent_renders: None,
    }
  }
}

impl ServerConfig {
  /// Effective render concurrency, never zero.
  #[must_use]
  pub fn render_permits(&self) -> usize {
    self
      .max_concurrent_renders
      .unwrap_or_else(num_cpus::get)
      .max(1)
  }

  /// `host:port` as accepted by a socket listener.
  #[must_use]
  pub fn address(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }

  pub(crate) fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    let full_key = format!("server.{key}");
    match key {
      "host" => self.host = value.to_string(),
      "port" => self.port = parse::parse_number(&full_key, value)?,
      "max_upload_bytes" => {
        self.max_upload_bytes = parse::parse_number(&full_key, value)?;
      },
      "max_concurrent_renders" => {
        self.max_concurrent_renders =
          parse::parse_optional_number(&full_key, value)?;
      },
      _ => return Err(parse::unknown_key(&full_key)),
    }
    Ok(())
  }

  pub(crate) fn merge(&mut self, other: Self) {
    self.host = other.host;
    self.port = other.port;
    self.max_upload_bytes = other.max_upload_bytes;
    if other.max_concurrent_renders.is_some() {
      self.max_concurrent_renders = other.max_concurrent_renders;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_render_permits_never_zero() {
    let config = ServerConfig {
      max_concurrent_renders: Some(0),
      ..ServerConfig::default()
    };
    assert_eq!(config.render_permits(), 1);
    assert!(ServerConfig::default().render_permits() >= 1);
  }

  #[test]
  fn test_address() {
    assert_eq!(ServerConfig::default().address(), "0.0.0.0:5000");
  }
}
