/// Virtual directory serving (backend URL spaces)
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use soul_directory::VirtualResource;

/// Fallback: anything not routed elsewhere goes to the mounted backends
pub async fn serve_virtual(State(app_state): State<AppState>, uri: Uri) -> Result<Response> {
    let (ops, rest) = app_state
        .vdir
        .resolve(uri.path())
        .await
        .ok_or_else(|| ServerError::NotFound(uri.path().to_string()))?;

    let response = match ops.open(&rest, uri.query()).await? {
        VirtualResource::Redirect(location) => {
            (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
        }
        VirtualResource::Content { mime, body } => {
            (StatusCode::OK, [(header::CONTENT_TYPE, mime)], body).into_response()
        }
    };
    Ok(response)
}
