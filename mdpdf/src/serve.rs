//! HTTP front end: an upload form and a conversion endpoint.
use std::sync::Arc;

use axum::{
  Router,
  extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError},
  http::{StatusCode, header},
  response::{Html, IntoResponse, Response},
  routing::{get, post},
};
use log::{error, info, warn};
use mdpdf_config::Config;
use mdpdf_templates::INDEX_TEMPLATE;
use thiserror::Error;
use tokio::{net::TcpListener, sync::Semaphore, task::JoinError};

use crate::{
  convert::Converter,
  error::ConvertError,
  input::{InputError, MarkdownInput},
};

/// Shared state of the HTTP handlers.
#[derive(Debug, Clone)]
pub struct AppState {
  converter: Arc<Converter>,
  permits:   Arc<Semaphore>,
}

impl AppState {
  #[must_use]
  pub fn new(converter: Converter, permits: usize) -> Self {
    Self {
      converter: Arc::new(converter),
      permits:   Arc::new(Semaphore::new(permits.max(1))),
    }
  }
}

#[derive(Debug, Error)]
pub enum ServeError {
  #[error(transparent)]
  Input(#[from] InputError),

  #[error("{}", .0.body_text())]
  Multipart(#[from] MultipartError),

  #[error("Error converting file: {0}")]
  Convert(#[from] ConvertError),

  #[error("Service overloaded, please try again later")]
  Overloaded,

  #[error("Conversion task failed: {0}")]
  Task(#[from] JoinError),
}

impl ServeError {
  #[must_use]
  pub fn status(&self) -> StatusCode {
    match self {
      Self::Input(_) => StatusCode::BAD_REQUEST,
      Self::Multipart(err) => err.status(),
      Self::Convert(_) | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
      Self::Overloaded => StatusCode::SERVICE_UNAVAILABLE,
    }
  }
}

impl IntoResponse for ServeError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
      warn!("File upload exceeds size limit");
    } else if status.is_server_error() {
      error!("Conversion request failed: {self}");
    }
    (status, self.to_string()).into_response()
  }
}

/// Fields of a conversion form submission.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConvertForm {
  pub upload:      Option<(String, Vec<u8>)>,
  pub text:        Option<String>,
  pub include_toc: bool,
}

impl ConvertForm {
  async fn read(mut multipart: Multipart) -> Result<Self, ServeError> {
    let mut form = Self::default();
    while let Some(field) = multipart.next_field().await? {
      match field.name() {
        Some("md_file") => {
          let filename = field.file_name().unwrap_or_default().to_string();
          let bytes = field.bytes().await?;
          form.upload = Some((filename, bytes.to_vec()));
        },
        Some("md_content") => form.text = Some(field.text().await?),
        Some("include_toc") => form.include_toc = field.text().await? == "on",
        _ => {},
      }
    }
    Ok(form)
  }

  /// Validated Markdown and the TOC flag.
  ///
  /// # Errors
  ///
  /// Returns the user-facing input error of the submission.
  pub fn into_input(self) -> Result<(MarkdownInput, bool), InputError> {
    let input = MarkdownInput::from_request(self.upload, self.text)?;
    Ok((input, self.include_toc))
  }
}

async fn index() -> Html<&'static str> {
  Html(INDEX_TEMPLATE)
}

async fn convert(
  State(state): State<AppState>,
  multipart: Multipart,
) -> Result<Response, ServeError> {
  let (input, include_toc) = ConvertForm::read(multipart).await?.into_input()?;

  let _permit = state
    .permits
    .clone()
    .acquire_owned()
    .await
    .map_err(|_| ServeError::Overloaded)?;

  let download_name = input.download_name();
  let converter = Arc::clone(&state.converter);
  let pdf = tokio::task::spawn_blocking(move || {
    converter.convert(input.content(), include_toc)
  })
  .await??;

  Ok(
    (
      StatusCode::OK,
      [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
          header::CONTENT_DISPOSITION,
          format!("attachment; filename=\"{download_name}\""),
        ),
      ],
      pdf,
    )
      .into_response(),
  )
}

/// Routes of the front end.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
  Router::new()
    .route("/", get(index))
    .route("/convert", post(convert))
    .layer(DefaultBodyLimit::max(max_upload_bytes))
    .with_state(state)
}

/// Serve until the process is terminated.
///
/// # Errors
///
/// Returns an error if the runtime cannot be built or the listener cannot be
/// bound.
pub fn run(config: Config) -> Result<(), std::io::Error> {
  let address = config.server.address();
  let permits = config.server.render_permits();
  let max_upload_bytes = config.server.max_upload_bytes;
  let converter =
    Converter::new(config).map_err(|e| std::io::Error::other(e.to_string()))?;
  let app = router(AppState::new(converter, permits), max_upload_bytes);

  let runtime = tokio::runtime::Builder::new_multi_thread()
    .enable_all()
    .build()?;

  runtime.block_on(async move {
    let listener = TcpListener::bind(&address).await?;
    info!(
      "Starting Markdown to PDF converter on http://{address} ({permits} \
       concurrent render(s))"
    );
    axum::serve(listener, app).await
  })
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use axum::{
    body::{Body, to_bytes},
    http::Request,
  };
  use tower::ServiceExt;

  use super::*;

  const BOUNDARY: &str = "mdpdf-test-boundary";

  enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
  }

  fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
      body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
      match part {
        Part::Text(name, value) => {
          body.extend_from_slice(
            format!(
              "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}"
            )
            .as_bytes(),
          );
        },
        Part::File(name, filename, bytes) => {
          body.extend_from_slice(
            format!(
              "Content-Disposition: form-data; name=\"{name}\"; \
               filename=\"{filename}\"\r\nContent-Type: \
               text/markdown\r\n\r\n"
            )
            .as_bytes(),
          );
          body.extend_from_slice(bytes);
        },
      }
      body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
  }

  fn convert_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
      .method("POST")
      .uri("/convert")
      .header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
      )
      .body(Body::from(multipart_body(parts)))
      .expect("valid request")
  }

  /// Router whose renderer echoes the assembled HTML back as the "PDF".
  #[cfg(unix)]
  fn echo_router(max_upload_bytes: usize) -> Router {
    let mut config = Config::default();
    config.renderer.program = "sh".to_string();
    config.renderer.args = vec!["-c".to_string(), "cat".to_string()];
    let converter = Converter::new(config).expect("converter");
    router(AppState::new(converter, 2), max_upload_bytes)
  }

  async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
      .await
      .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf-8")
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn test_upload_is_returned_as_named_attachment() {
    let response = echo_router(1024 * 1024)
      .oneshot(convert_request(&[Part::File(
        "md_file",
        "report.md",
        b"# Report\n\nSee https://a.example\n",
      )]))
      .await
      .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
      response.headers()[header::CONTENT_TYPE],
      "application/pdf"
    );
    assert_eq!(
      response.headers()[header::CONTENT_DISPOSITION],
      "attachment; filename=\"report.pdf\""
    );
    let html = body_text(response).await;
    assert!(html.contains(r#"<h1 id="report">Report</h1>"#));
    assert!(html.contains(r#"href="https://a.example""#));
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn test_include_toc_checkbox() {
    let md = "# One\n\n## Two\n";

    let response = echo_router(1024 * 1024)
      .oneshot(convert_request(&[
        Part::Text("md_content", md),
        Part::Text("include_toc", "on"),
      ]))
      .await
      .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
      response.headers()[header::CONTENT_DISPOSITION],
      "attachment; filename=\"document.pdf\""
    );
    assert!(body_text(response).await.contains(r#"<div class="toc">"#));

    let response = echo_router(1024 * 1024)
      .oneshot(convert_request(&[Part::Text("md_content", md)]))
      .await
      .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!body_text(response).await.contains(r#"<div class="toc">"#));
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn test_invalid_submissions_get_user_facing_400() {
    let response = echo_router(1024 * 1024)
      .oneshot(convert_request(&[Part::Text("include_toc", "on")]))
      .await
      .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
      body_text(response).await,
      "Please provide either a Markdown file or direct text input."
    );

    let response = echo_router(1024 * 1024)
      .oneshot(convert_request(&[Part::File(
        "md_file",
        "notes.txt",
        b"# Notes",
      )]))
      .await
      .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
      body_text(response).await,
      "Only Markdown files (.md, .markdown) are allowed."
    );
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn test_oversized_upload_is_rejected() {
    let big = vec![b'a'; 4096];
    let response = echo_router(512)
      .oneshot(convert_request(&[Part::File("md_file", "big.md", &big)]))
      .await
      .expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn test_index_serves_upload_form() {
    let response = echo_router(1024)
      .oneshot(
        Request::builder()
          .uri("/")
          .body(Body::empty())
          .expect("valid request"),
      )
      .await
      .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("name=\"md_file\""));
    assert!(html.contains("action=\"/convert\""));
  }

  #[test]
  fn test_input_errors_are_bad_requests() {
    let err = ServeError::from(InputError::Missing);
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
      err.to_string(),
      "Please provide either a Markdown file or direct text input."
    );
  }

  #[test]
  fn test_conversion_errors_are_server_errors() {
    let err = ServeError::from(ConvertError::Io(std::io::Error::other("disk")));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(err.to_string().starts_with("Error converting file:"));
    assert_eq!(
      ServeError::Overloaded.status(),
      StatusCode::SERVICE_UNAVAILABLE
    );
  }

  #[test]
  fn test_form_into_input() {
    let form = ConvertForm {
      upload:      Some(("notes.md".to_string(), b"# Notes".to_vec())),
      text:        None,
      include_toc: true,
    };
    let (input, include_toc) = form.into_input().expect("valid");
    assert!(include_toc);
    assert_eq!(input.download_name(), "notes.pdf");

    let form = ConvertForm {
      upload: Some(("notes.exe".to_string(), Vec::new())),
      ..ConvertForm::default()
    };
    assert_eq!(form.into_input(), Err(InputError::Extension));
  }
}
