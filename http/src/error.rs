use axum::{
    http::StatusCode,
    response::{
        IntoResponse,
        Response,
    },
};
use connect_dashboard_admin::AdminError;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("The administrative API is not configured: {0}")]
    NotConfigured(String),
    #[error("Loading data from the Connect API failed: {0}")]
    Admin(#[from] AdminError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Admin(AdminError::NoIntegration) => StatusCode::FORBIDDEN,
            AppError::Admin(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(%status, "request failed: {self}");
        (status, axum::Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
