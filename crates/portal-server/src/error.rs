use crate::metadata::MetadataError;
use crate::resolution::ResolveError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error returned by the HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    /// Catalog upstream failed
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),
}

/// `{ "error": "..." }`
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// `{ "error": { "code": ..., "message": "..." } }`
#[derive(Debug, Serialize)]
struct UpstreamErrorResponse {
    error: UpstreamErrorBody,
}

#[derive(Debug, Serialize)]
struct UpstreamErrorBody {
    code: u16,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse { error: msg })).into_response()
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: msg })).into_response()
            }
            AppError::Metadata(e) => {
                tracing::error!("Metadata error: {}", e);
                let status = match &e {
                    MetadataError::Status { status, .. } => {
                        StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
                    }
                    _ => StatusCode::BAD_GATEWAY,
                };
                let body = UpstreamErrorResponse {
                    error: UpstreamErrorBody {
                        code: status.as_u16(),
                        message: e.to_string(),
                    },
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::UnknownProvider(name) => {
                AppError::NotFound(format!("Provider not found: {}", name))
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
}
