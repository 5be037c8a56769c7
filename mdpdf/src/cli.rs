use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

/// Input operand meaning standard input.
pub const STDIN: &str = "-";

/// Command line interface for mdpdf
#[derive(Parser, Debug)]
#[command(author, version, about = "mdpdf: Markdown to styled PDF")]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times) Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", action = clap::ArgAction::Append, global = true)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", action = clap::ArgAction::Append, global = true)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the mdpdf CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Convert a Markdown document to PDF.
  Convert(DocumentArgs),

  /// Write the assembled HTML document instead of a PDF.
  Html(DocumentArgs),

  /// Initialize a new mdpdf configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "mdpdf.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Serve the upload form and conversion endpoint over HTTP.
  #[cfg(feature = "serve")]
  Serve {
    /// Address to listen on. Overrides `server.host`.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on. Overrides `server.port`.
    #[arg(short, long)]
    port: Option<u16>,
  },
}

/// Arguments shared by the document-producing subcommands.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct DocumentArgs {
  /// Markdown file to read, or `-` for standard input.
  #[arg(value_name = "INPUT")]
  pub input: String,

  /// Output file. Defaults to the input name with the new extension, or
  /// `document.<ext>` for standard input.
  #[arg(short, long)]
  pub output: Option<PathBuf>,

  /// Include a table of contents.
  #[arg(long, overrides_with = "no_toc")]
  pub toc: bool,

  /// Omit the table of contents.
  #[arg(long, overrides_with = "toc")]
  pub no_toc: bool,
}

impl DocumentArgs {
  /// Whether to include a TOC, falling back to `default` without a flag.
  #[must_use]
  pub const fn include_toc(&self, default: bool) -> bool {
    if self.toc {
      true
    } else if self.no_toc {
      false
    } else {
      default
    }
  }

  #[must_use]
  pub fn reads_stdin(&self) -> bool {
    self.input == STDIN
  }

  /// Output path, resolved against the input name.
  #[must_use]
  pub fn output_path(&self, extension: &str) -> PathBuf {
    if let Some(output) = &self.output {
      return output.clone();
    }
    if self.reads_stdin() {
      return PathBuf::from(format!("document.{extension}"));
    }
    Path::new(&self.input).with_extension(extension)
  }
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
