use std::{
  io::{self, Write},
  process::{Command, Stdio},
  thread,
};

use log::{debug, trace};
use tempfile::NamedTempFile;

use crate::{
  PdfRenderer,
  RenderOptions,
  error::{RenderError, RenderResult},
};

/// Program used when none is configured.
pub const DEFAULT_PROGRAM: &str = "weasyprint";

/// Renders by running an external engine.
///
/// The command line is `{program} {args} [-u base] [-s sheet]... - -`: the
/// document is fed on stdin and the PDF is read back from stdout, matching the
/// WeasyPrint CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRenderer {
  program: String,
  args:    Vec<String>,
}

impl Default for CommandRenderer {
  fn default() -> Self {
    Self::new(DEFAULT_PROGRAM)
  }
}

impl CommandRenderer {
  #[must_use]
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args:    Vec::new(),
    }
  }

  /// Extra arguments placed before the generated options and operands.
  #[must_use]
  pub fn with_args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  #[must_use]
  pub fn program(&self) -> &str {
    &self.program
  }

  /// Arguments for one invocation, given the paths of the written stylesheets.
  fn arguments(
    &self,
    options: &RenderOptions,
    stylesheet_paths: &[String],
  ) -> Vec<String> {
    let mut args = self.args.clone();
    if let Some(base_url) = &options.base_url {
      args.push("-u".to_string());
      args.push(base_url.clone());
    }
    for path in stylesheet_paths {
      args.push("-s".to_string());
      args.push(path.clone());
    }
    args.push("-".to_string());
    args.push("-".to_string());
    args
  }
}

fn write_stylesheet(css: &str) -> io::Result<NamedTempFile> {
  let mut file = tempfile::Builder::new()
    .prefix("mdpdf-")
    .suffix(".css")
    .tempfile()?;
  file.write_all(css.as_bytes())?;
  file.flush()?;
  Ok(file)
}

impl PdfRenderer for CommandRenderer {
  fn render(
    &self,
    html: &str,
    options: &RenderOptions,
  ) -> RenderResult<Vec<u8>> {
    // Temporary files must outlive the child process.
    let sheets = options
      .stylesheets
      .iter()
      .map(|css| write_stylesheet(css))
      .collect::<io::Result<Vec<_>>>()?;
    let sheet_paths: Vec<String> = sheets
      .iter()
      .map(|file| file.path().to_string_lossy().into_owned())
      .collect();

    let args = self.arguments(options, &sheet_paths);
    debug!("Running renderer: {} {}", self.program, args.join(" "));

    let mut child = Command::new(&self.program)
      .args(&args)
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .spawn()
      .map_err(|source| {
        RenderError::Spawn {
          program: self.program.clone(),
          source,
        }
      })?;

    let mut stdin = child.stdin.take();
    let (output, written) = thread::scope(|scope| {
      // Feed stdin concurrently so a large document cannot deadlock against a
      // full stdout pipe.
      let writer = scope.spawn(move || {
        match stdin.as_mut() {
          Some(pipe) => pipe.write_all(html.as_bytes()),
          None => Ok(()),
        }
        // pipe dropped here, closing the child's stdin
      });
      let output = child.wait_with_output();
      let written = writer
        .join()
        .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
      (output, written)
    });
    let output = output?;
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if !output.status.success() {
      return Err(RenderError::Failed {
        status: output.status.code(),
        stderr,
      });
    }

    // The engine may legitimately stop reading early, e.g. after reporting
    // its own result.
    if let Err(err) = written
      && err.kind() != io::ErrorKind::BrokenPipe
    {
      return Err(RenderError::Io(err));
    }

    if output.stdout.is_empty() {
      return Err(RenderError::EmptyOutput { stderr });
    }

    trace!(
      "Renderer returned {} bytes ({} stylesheet(s))",
      output.stdout.len(),
      sheets.len()
    );
    Ok(output.stdout)
  }
}
