use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
  #[error("Failed to start renderer `{program}`: {source}")]
  Spawn {
    program: String,
    #[source]
    source:  io::Error,
  },

  #[error("I/O error while rendering: {0}")]
  Io(#[from] io::Error),

  #[error("Renderer exited with {}: {stderr}", exit_status(.status))]
  Failed { status: Option<i32>, stderr: String },

  #[error("Renderer produced no output{}", stderr_suffix(.stderr))]
  EmptyOutput { stderr: String },

  #[error("All {attempts} rendering attempt(s) failed; last error: {source}")]
  Exhausted {
    attempts: usize,
    source:   Box<RenderError>,
  },

  #[error("No rendering strategies were configured")]
  NoStrategies,
}

pub type RenderResult<T> = Result<T, RenderError>;

#[allow(
  clippy::ref_option,
  reason = "thiserror passes fields by reference"
)]
fn exit_status(status: &Option<i32>) -> String {
  status.map_or_else(
    || "no exit code (terminated by signal)".to_string(),
    |code| format!("status {code}"),
  )
}

fn stderr_suffix(stderr: &str) -> String {
  if stderr.is_empty() {
    String::new()
  } else {
    format!(": {stderr}")
  }
}
