//! Value parsers for `KEY=VALUE` overrides.
use std::{path::PathBuf, str::FromStr};

use crate::error::ConfigError;

pub fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" | "on" => Ok(true),
    "false" | "no" | "0" | "off" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'. Expected true/false, \
         yes/no, on/off, or 1/0"
      )))
    },
  }
}

pub fn parse_number<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  value.parse().map_err(|e| {
    ConfigError::Config(format!("Invalid value for '{key}': '{value}' - {e}"))
  })
}

/// Empty values clear the option.
pub fn parse_optional_number<T>(
  key: &str,
  value: &str,
) -> Result<Option<T>, ConfigError>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  if value.is_empty() {
    Ok(None)
  } else {
    parse_number(key, value).map(Some)
  }
}

/// Empty values clear the option.
pub fn parse_optional_string(value: &str) -> Option<String> {
  (!value.is_empty()).then(|| value.to_string())
}

/// Comma-separated list; an empty value yields an empty list.
pub fn parse_list(value: &str) -> Vec<String> {
  value
    .split(',')
    .map(str::trim)
    .filter(|item| !item.is_empty())
    .map(str::to_string)
    .collect()
}

pub fn parse_path_list(value: &str) -> Vec<PathBuf> {
  parse_list(value).into_iter().map(PathBuf::from).collect()
}

pub fn unknown_key(key: &str) -> ConfigError {
  ConfigError::Config(format!(
    "Unknown configuration key: '{key}'. See documentation for supported keys."
  ))
}
