use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const PROXY_ERROR_MESSAGE: &str = "Failed to proxy external news API";

/// The upstream feed could not be used: it answered with a non-2xx status,
/// the request never completed, or the body was not JSON.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream responded with status {0}")]
    Status(reqwest::StatusCode),

    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream body is not JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("failed to render template: {0}")]
    Render(#[from] askama::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                Html(format!(
                    "<h1>Not found</h1><p>{} could not be found.</p><p><a href=\"/\">Back to home</a></p>",
                    what
                )),
            )
                .into_response(),
            AppError::Upstream(err) => {
                error!("API proxy error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": PROXY_ERROR_MESSAGE })),
                )
                    .into_response()
            }
            AppError::Render(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}
