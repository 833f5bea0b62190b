use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use serde::Serialize;

use crate::news::NewsError;

/// Failure kinds surfaced by the `/generate-post` endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The news API rejected the query; its status is passed through.
    #[error("Failed to fetch news: {body}")]
    Upstream { status: u16, body: String },
    /// Any of the three generation calls failed.
    #[error("Failed to generate content: {0}")]
    Generation(String),
    #[error("Internal error: {0:#}")]
    Internal(anyhow::Error),
}

impl ContentError {
    pub fn status_code(&self) -> u16 {
        match self {
            ContentError::Upstream { status, .. } => *status,
            ContentError::Generation(_) | ContentError::Internal(_) => 500,
        }
    }
}

impl From<NewsError> for ContentError {
    fn from(err: NewsError) -> Self {
        match err {
            NewsError::Upstream { status, body } => ContentError::Upstream { status, body },
            NewsError::Transport(e) => ContentError::Internal(e),
        }
    }
}

/// JSON error body: `{"detail": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl<'r> Responder<'r, 'static> for ContentError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let status = Status::new(self.status_code());
        if status.code >= 500 {
            tracing::error!(status = status.code, error = %self, "generate-post failed");
        } else {
            tracing::warn!(status = status.code, error = %self, "generate-post failed");
        }
        (status, Json(ErrorBody { detail: self.to_string() })).respond_to(req)
    }
}
