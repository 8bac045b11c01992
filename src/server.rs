//! Upload form and conversion endpoint.
//!
//! `GET /` serves the form; `POST /` takes a multipart `file` field and
//! answers with the zip archive as an attachment.

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::{ConvertOptions, ServerConfig};
use crate::convert::convert;
use crate::reader::SourceFormat;
use crate::render::Renderer;

pub const ARCHIVE_NAME: &str = "output.zip";

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub options: Arc<ConvertOptions>,
    pub renderer: Arc<Renderer>,
}

impl AppState {
    pub fn new(options: ConvertOptions, renderer: Renderer) -> Self {
        Self {
            options: Arc::new(options),
            renderer: Arc::new(renderer),
        }
    }
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(upload_form).post(upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

/// Binds `config.addr`, optionally opens a browser on it, and serves until
/// Ctrl+C.
pub async fn serve(config: ServerConfig, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;

    let url = config.url();
    info!(%url, "Server started");

    if config.open_browser {
        let target = url.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = open::that(&target) {
                warn!(error = %e, url = %target, "Could not open browser");
            }
        });
    }

    axum::serve(listener, router(state, config.max_upload_bytes))
        .with_graceful_shutdown(shutdown_signal(tokio::signal::ctrl_c()))
        .await?;

    Ok(())
}

/// Resolves once `signal` fires. If the signal cannot be listened for, the
/// server keeps running instead of shutting down at once.
async fn shutdown_signal<F, E>(signal: F)
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match signal.await {
        Ok(()) => info!("Shutting down"),
        Err(e) => {
            error!(error = %e, "Could not listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

async fn upload_form(State(state): State<AppState>) -> Html<String> {
    Html(state.renderer.upload_form())
}

struct Upload {
    file_name: String,
    bytes: Vec<u8>,
}

async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let upload = match read_upload(&mut multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return (StatusCode::BAD_REQUEST, "No file uploaded").into_response(),
        Err(e) => {
            warn!(error = %e, "Malformed upload");
            return (StatusCode::BAD_REQUEST, format!("Invalid upload: {e}")).into_response();
        }
    };

    info!(file_name = %upload.file_name, bytes = upload.bytes.len(), "Upload received");
    let format = SourceFormat::from_file_name(&upload.file_name);

    let result = tokio::task::spawn_blocking(move || {
        convert(&upload.bytes, format, &state.options, &state.renderer)
    })
    .await;

    match result {
        Ok(Ok(archive)) => archive_response(archive),
        Ok(Err(e)) => {
            error!(error = %e, "Conversion failed");
            conversion_failed(e)
        }
        Err(e) => {
            error!(error = %e, "Conversion task failed");
            conversion_failed(e)
        }
    }
}

/// Returns the first non-empty `file` field, if any.
async fn read_upload(multipart: &mut Multipart) -> Result<Option<Upload>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            continue;
        }
        return Ok(Some(Upload {
            file_name,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}

fn archive_response(archive: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{ARCHIVE_NAME}\""),
            ),
        ],
        archive,
    )
        .into_response()
}

fn conversion_failed(e: impl Display) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Conversion failed: {e}"),
    )
        .into_response()
}
