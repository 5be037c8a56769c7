use std::{
  fs,
  path::{Path, PathBuf},
};

use mdpdf_annotate::{AnnotateOptions, toc::DEFAULT_TOC_TITLE};
use serde::{Deserialize, Serialize};

use crate::{
  error::ConfigError,
  parse,
  renderer::RendererConfig,
  server::ServerConfig,
};

/// File names probed, in order, in the working directory.
const CONFIG_FILENAMES: [&str; 5] = [
  "mdpdf.toml",
  "mdpdf.json",
  ".mdpdf.toml",
  ".mdpdf.json",
  ".config/mdpdf.toml",
];

/// Configuration for the mdpdf converter.
///
/// [`Config`] controls the annotation pipeline, the assembled document, the
/// external PDF engine and the HTTP front end. Fields are typically loaded
/// from a TOML or JSON config file, then adjusted with `--config KEY=VALUE`
/// overrides and CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Whether conversions include a table of contents unless told otherwise.
  pub include_toc: bool,

  /// Whether to assign anchor ids to headings even without a TOC.
  pub generate_anchors: bool,

  /// Whether to normalize existing links and auto-link bare URLs.
  pub normalize_links: bool,

  /// Document title. Falls back to the first level-1 heading.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,

  /// Heading of the table of contents block.
  pub toc_title: String,

  /// Paths to custom stylesheets, applied after the built-in one.
  pub stylesheet_paths: Vec<PathBuf>,

  /// External PDF engine.
  pub renderer: RendererConfig,

  /// HTTP front end.
  pub server: ServerConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      include_toc:      true,
      generate_anchors: true,
      normalize_links:  true,
      title:            None,
      toc_title:        DEFAULT_TOC_TITLE.to_string(),
      stylesheet_paths: Vec::new(),
      renderer:         RendererConfig::default(),
      server:           ServerConfig::default(),
    }
  }
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
      return Err(ConfigError::Config(format!(
        "Config file has no extension: {}",
        path.display()
      )));
    };

    match ext.to_lowercase().as_str() {
      "json" => {
        serde_json::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse JSON config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      "toml" => {
        toml::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse TOML config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      _ => {
        Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from explicit files or a discovered one, then apply
  /// `KEY=VALUE` overrides.
  ///
  /// Explicit files are merged in order. Without explicit files the first
  /// discovered config file is used, and without either the defaults are.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded or an override is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged_config = Self::from_file(first)?;
      for config_path in rest {
        merged_config.merge(Self::from_file(config_path)?);
      }

      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }
      merged_config
    } else if let Some(discovered_config) = Self::find_config_file() {
      log::info!(
        "Using discovered config file: {}",
        discovered_config.display()
      );
      Self::from_file(&discovered_config)?
    } else {
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    Ok(config)
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// Nested sections use dotted keys, e.g. `server.port=8080`.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  ///
  /// - An override string is not in KEY=VALUE format
  /// - A key is not recognized
  /// - A value cannot be parsed as the expected type
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a single override.
  ///
  /// # Errors
  ///
  /// Returns an error if the key is unknown or the value cannot be parsed.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    if let Some((section, rest)) = key.split_once('.') {
      return match section {
        "renderer" => self.renderer.apply_override(rest, value),
        "server" => self.server.apply_override(rest, value),
        _ => Err(parse::unknown_key(key)),
      };
    }

    match key {
      "include_toc" => self.include_toc = parse::parse_bool(key, value)?,
      "generate_anchors" => {
        self.generate_anchors = parse::parse_bool(key, value)?;
      },
      "normalize_links" => {
        self.normalize_links = parse::parse_bool(key, value)?;
      },
      "title" => self.title = parse::parse_optional_string(value),
      "toc_title" => self.toc_title = value.to_string(),
      "stylesheet_paths" => {
        self.stylesheet_paths = parse::parse_path_list(value);
      },
      _ => return Err(parse::unknown_key(key)),
    }
    Ok(())
  }

  /// Merge another config into this one, with the other config's values taking
  /// precedence.
  ///
  /// # Merge Rules
  ///
  /// - [`Option<T>`] fields: Other's [`Some`] value replaces this config's
  ///   value
  /// - [`Vec<T>`] fields: Other's vec is appended to this config's vec
  /// - Plain fields (String, bool, etc.): Other's value always replaces
  pub fn merge(&mut self, other: Self) {
    self.include_toc = other.include_toc;
    self.generate_anchors = other.generate_anchors;
    self.normalize_links = other.normalize_links;
    if other.title.is_some() {
      self.title = other.title;
    }
    self.toc_title = other.toc_title;
    self.stylesheet_paths.extend(other.stylesheet_paths);
    self.renderer.merge(other.renderer);
    self.server.merge(other.server);
  }

  /// Search for config files in common locations
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    let xdg_config_home = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
    Self::find_config_file_in(&current_dir, xdg_config_home.as_deref())
  }

  /// Search `dir`, then `xdg_config_home`, for a config file.
  #[must_use]
  pub fn find_config_file_in(
    dir: &Path,
    xdg_config_home: Option<&Path>,
  ) -> Option<PathBuf> {
    CONFIG_FILENAMES
      .iter()
      .map(|filename| dir.join(filename))
      .chain(xdg_config_home.map(|xdg| xdg.join("mdpdf.toml")))
      .find(|path| path.is_file())
  }

  /// Validate all paths specified in the configuration
  ///
  /// # Errors
  ///
  /// Returns an error listing every configured stylesheet that does not exist.
  pub fn validate_paths(&self) -> Result<(), ConfigError> {
    let errors: Vec<String> = self
      .stylesheet_paths
      .iter()
      .filter(|path| !path.is_file())
      .map(|path| format!("Stylesheet file does not exist: {}", path.display()))
      .collect();

    if errors.is_empty() {
      Ok(())
    } else {
      Err(ConfigError::Config(errors.join("\n")))
    }
  }

  /// Annotation options derived from this configuration.
  #[must_use]
  pub fn annotate_options(&self, include_toc: bool) -> AnnotateOptions {
    AnnotateOptions {
      include_toc,
      generate_anchors: self.generate_anchors,
      normalize_links: self.normalize_links,
      toc_title: self.toc_title.clone(),
    }
  }

  /// Generate a default configuration file with commented explanations
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unsupported, the file exists and
  /// `force` is not set, or the file cannot be written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
    force: bool,
  ) -> Result<(), ConfigError> {
    let config_content = crate::templates::get_template(format)
      .map_err(|e| ConfigError::Config(e.to_string()))?;

    if path.exists() && !force {
      return Err(ConfigError::Config(format!(
        "File {} already exists. Use --force to overwrite.",
        path.display()
      )));
    }

    fs::write(path, config_content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  #![allow(
    clippy::unwrap_used,
    clippy::field_reassign_with_default,
    reason = "Fine in tests"
  )]

  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_config_merge_option_fields() {
    let mut base = Config::default();
    base.title = Some("Base".to_string());
    base.server.max_concurrent_renders = Some(2);

    let other = Config::default();
    base.merge(other);
    assert_eq!(base.title.as_deref(), Some("Base"));
    assert_eq!(base.server.max_concurrent_renders, Some(2));

    let mut other = Config::default();
    other.title = Some("Other".to_string());
    base.merge(other);
    assert_eq!(base.title.as_deref(), Some("Other"));
  }

  #[test]
  fn test_config_merge_vec_fields_append() {
    let mut base = Config::default();
    base.stylesheet_paths = vec![PathBuf::from("base.css")];
    base.renderer.args = vec!["--presentational".to_string()];

    let mut other = Config::default();
    other.stylesheet_paths = vec![PathBuf::from("override.css")];
    other.renderer.args = vec!["-O".to_string()];

    base.merge(other);
    assert_eq!(base.stylesheet_paths, vec![
      PathBuf::from("base.css"),
      PathBuf::from("override.css")
    ]);
    assert_eq!(base.renderer.args, vec!["--presentational", "-O"]);
  }

  #[test]
  fn test_config_merge_plain_fields_replace() {
    let mut base = Config::default();
    let mut other = Config::default();
    other.include_toc = false;
    other.server.port = 8080;
    other.renderer.program = "/opt/weasyprint".to_string();

    base.merge(other);
    assert!(!base.include_toc);
    assert_eq!(base.server.port, 8080);
    assert_eq!(base.renderer.program, "/opt/weasyprint");
  }

  #[test]
  fn test_apply_overrides() {
    let mut config = Config::default();
    config
      .apply_overrides(&[
        "include_toc=off".to_string(),
        "title = Release Notes".to_string(),
        "server.port=8080".to_string(),
        "server.max_concurrent_renders=3".to_string(),
        "renderer.args=--presentational, -O".to_string(),
        "stylesheet_paths=a.css,b.css".to_string(),
      ])
      .unwrap();

    assert!(!config.include_toc);
    assert_eq!(config.title.as_deref(), Some("Release Notes"));
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.max_concurrent_renders, Some(3));
    assert_eq!(config.renderer.args, vec!["--presentational", "-O"]);
    assert_eq!(config.stylesheet_paths.len(), 2);
  }

  #[test]
  fn test_apply_override_empty_clears_option() {
    let mut config = Config::default();
    config.title = Some("x".to_string());
    config.apply_override("title", "").unwrap();
    assert_eq!(config.title, None);
  }

  #[test]
  fn test_apply_overrides_errors() {
    let mut config = Config::default();
    let cases = [
      ("no_equals_sign", "Expected KEY=VALUE"),
      ("unknown_key=value", "Unknown configuration key"),
      ("server.unknown=1", "Unknown configuration key: 'server.unknown'"),
      ("nope.port=1", "Unknown configuration key"),
      ("normalize_links=maybe", "Invalid boolean"),
      ("server.port=99999", "Invalid value"),
    ];
    for (input, expected) in cases {
      let err = config.apply_overrides(&[input.to_string()]).unwrap_err();
      assert!(
        err.to_string().contains(expected),
        "{input}: {err} does not mention {expected}"
      );
    }
  }

  #[test]
  fn test_from_file_toml_and_json() {
    let dir = TempDir::new().unwrap();
    let toml_path = dir.path().join("mdpdf.toml");
    fs::write(
      &toml_path,
      "include_toc = false\n[server]\nport = 8000\n",
    )
    .unwrap();
    let config = Config::from_file(&toml_path).unwrap();
    assert!(!config.include_toc);
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.server.host, "0.0.0.0");

    let json_path = dir.path().join("mdpdf.json");
    fs::write(&json_path, r#"{"toc_title": "Contents"}"#).unwrap();
    let config = Config::from_file(&json_path).unwrap();
    assert_eq!(config.toc_title, "Contents");
    assert!(config.include_toc);
  }

  #[test]
  fn test_from_file_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mdpdf.yaml");
    fs::write(&path, "include_toc: true\n").unwrap();
    assert!(
      Config::from_file(&path)
        .unwrap_err()
        .to_string()
        .contains("Unsupported config file format")
    );
  }

  #[test]
  fn test_load_merges_files_in_order() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("a.toml");
    let second = dir.path().join("b.toml");
    fs::write(&first, "title = \"First\"\nstylesheet_paths = [\"a.css\"]\n")
      .unwrap();
    fs::write(&second, "stylesheet_paths = [\"b.css\"]\n").unwrap();

    let config =
      Config::load(&[first, second], &["server.port=9000".to_string()])
        .unwrap();
    assert_eq!(config.title.as_deref(), Some("First"));
    assert_eq!(config.stylesheet_paths, vec![
      PathBuf::from("a.css"),
      PathBuf::from("b.css")
    ]);
    assert_eq!(config.server.port, 9000);
  }

  #[test]
  fn test_find_config_file_in() {
    let dir = TempDir::new().unwrap();
    let xdg = TempDir::new().unwrap();
    assert_eq!(Config::find_config_file_in(dir.path(), None), None);

    fs::write(xdg.path().join("mdpdf.toml"), "").unwrap();
    assert_eq!(
      Config::find_config_file_in(dir.path(), Some(xdg.path())),
      Some(xdg.path().join("mdpdf.toml"))
    );

    fs::write(dir.path().join(".mdpdf.json"), "{}").unwrap();
    fs::write(dir.path().join("mdpdf.json"), "{}").unwrap();
    assert_eq!(
      Config::find_config_file_in(dir.path(), Some(xdg.path())),
      Some(dir.path().join("mdpdf.json"))
    );
  }

  #[test]
  fn test_validate_paths() {
    let dir = TempDir::new().unwrap();
    let present = dir.path().join("present.css");
    fs::write(&present, "body {}").unwrap();

    let mut config = Config::default();
    config.stylesheet_paths = vec![present];
    assert!(config.validate_paths().is_ok());

    config.stylesheet_paths.push(dir.path().join("missing.css"));
    let err = config.validate_paths().unwrap_err().to_string();
    assert!(err.contains("missing.css"));
  }

  #[test]
  fn test_annotate_options() {
    let mut config = Config::default();
    config.normalize_links = false;
    let options = config.annotate_options(false);
    assert!(!options.include_toc);
    assert!(options.generate_anchors);
    assert!(!options.normalize_links);
    assert_eq!(options.toc_title, DEFAULT_TOC_TITLE);
  }

  #[test]
  fn test_generate_default_config_respects_force() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mdpdf.toml");

    Config::generate_default_config("toml", &path, false).unwrap();
    assert_eq!(Config::from_file(&path).unwrap(), Config::default());

    assert!(Config::generate_default_config("toml", &path, false).is_err());
    Config::generate_default_config("json", &path, true).unwrap();
    assert!(Config::generate_default_config("yaml", &path, true).is_err());
  }
}
