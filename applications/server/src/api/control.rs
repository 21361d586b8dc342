/// Action dispatch API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Serialize;
use soul_directory::{ActionArgs, ActionOutput};

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: String,
    pub service_type: String,
    pub service_id: String,
    pub actions: Vec<String>,
}

/// GET /services
pub async fn list_services(State(app_state): State<AppState>) -> Json<Vec<ServiceInfo>> {
    let services = app_state
        .services
        .iter()
        .map(|(name, service)| ServiceInfo {
            name: name.clone(),
            service_type: service.service_type().to_string(),
            service_id: service.service_id().to_string(),
            actions: service.actions().iter().map(|a| a.to_string()).collect(),
        })
        .collect();
    Json(services)
}

/// POST /ctl/:service/:action
/// Body is a flat JSON object of arguments; the reply holds the named outputs.
/// A request without a JSON content type carries no arguments.
pub async fn invoke_action(
    Path((service, action)): Path<(String, String)>,
    State(app_state): State<AppState>,
    body: std::result::Result<Json<ActionArgs>, JsonRejection>,
) -> Result<Json<ActionOutput>> {
    let service = app_state
        .service(&service)
        .ok_or_else(|| ServerError::NotFound(format!("No service {}", service)))?;
    let args = match body {
        Ok(Json(args)) => args,
        Err(JsonRejection::MissingJsonContentType(_)) => ActionArgs::default(),
        Err(rejection) => return Err(ServerError::BadRequest(rejection.body_text())),
    };

    let output = service.invoke(&action, &args).await?;
    Ok(Json(output))
}
