/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use soul_directory::{ActionError, DirectoryError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Action failed: {0}")]
    Action(#[from] ActionError),

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            // Control points expect UPnP fault codes, carried with a 500
            ServerError::Action(ref e) => {
                tracing::warn!("Action error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "errorCode": e.upnp_code(),
                        "errorDescription": e.upnp_description(),
                    }),
                )
            }
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ServerError::Directory(ref e @ DirectoryError::Backend { .. }) => {
                tracing::error!("Backend error: {}", e);
                (StatusCode::BAD_GATEWAY, json!({ "error": "Backend error" }))
            }
            ServerError::Directory(ref e) => {
                tracing::warn!("Directory error: {}", e);
                (StatusCode::NOT_FOUND, json!({ "error": e.to_string() }))
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Configuration error" }),
                )
            }
            ServerError::Io(ref e) => {
                tracing::error!("IO error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "IO error" }))
            }
        };

        (status, Json(body)).into_response()
    }
}
