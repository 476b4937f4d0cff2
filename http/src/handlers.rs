use crate::{
    error::AppError,
    router::AppState,
};
use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use connect_dashboard_admin::{
    AdminError,
    SystemInfo,
};
use connect_dashboard_metrics::{
    fetch_snapshot,
    MetricsReport,
};
use serde::Serialize;

/// Header carrying the visitor's session token when the content runs on Connect.
pub const USER_SESSION_TOKEN_HEADER: &str = "posit-connect-user-session-token";

fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(USER_SESSION_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|token| !token.is_empty())
}

/// Every metrics aggregate, fetched fresh for this request.
pub async fn metrics(State(state): State<AppState>) -> Json<MetricsReport> {
    let snapshot = fetch_snapshot(&state.http, &state.config.metrics_url).await;
    Json(MetricsReport::from_snapshot(&snapshot))
}

pub async fn system_info(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<SystemInfo>, AppError> {
    let client = state
        .clients
        .client_for(state.service_client()?, session_token(&headers))
        .await?;
    Ok(Json(connect_dashboard_admin::system_info(&client).await?))
}

#[derive(Debug, Serialize)]
pub struct VisitorAuth {
    authorized: bool,
}

/// Whether requests on behalf of the visitor are possible.
///
/// Outside of Connect there is no visitor and the service credentials are used, so this is always authorized.
pub async fn visitor_auth(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<VisitorAuth>, AppError> {
    if !state.config.running_on_connect() {
        return Ok(Json(VisitorAuth { authorized: true }));
    }
    let Some(token) = session_token(&headers) else {
        return Ok(Json(VisitorAuth { authorized: false }));
    };

    match state.clients.client_for(state.service_client()?, Some(token)).await {
        Ok(_) => Ok(Json(VisitorAuth { authorized: true })),
        Err(AdminError::NoIntegration) => {
            debug!("no OAuth integration associated, visitor is not authorized");
            Ok(Json(VisitorAuth { authorized: false }))
        }
        Err(err) => Err(err.into()),
    }
}
