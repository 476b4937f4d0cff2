use crate::{
    error::AppError,
    handlers::{
        metrics,
        system_info,
        visitor_auth,
    },
};
use axum::{
    routing::get,
    Router,
};
use connect_dashboard_admin::{
    AdminClient,
    ClientCache,
};
use connect_dashboard_config::DashboardConfig;
use eyre::Result;

#[derive(Clone)]
pub struct AppState {
    pub config: DashboardConfig,
    pub http: reqwest::Client,
    /// Service client, `None` when no server or API key is configured.
    pub admin: Option<AdminClient>,
    pub clients: ClientCache,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.request_timeout()).build()?;

        let admin = if config.server_url.is_some() && config.api_key.is_some() {
            Some(AdminClient::from_config(&config)?)
        } else {
            warn!("no Connect server or API key configured, administrative routes are disabled");
            None
        };

        let clients = ClientCache::new(config.client_cache_ttl(), config.client_cache_capacity);

        Ok(Self {
            config,
            http,
            admin,
            clients,
        })
    }

    pub(crate) fn service_client(&self) -> Result<&AdminClient, AppError> {
        self.admin
            .as_ref()
            .ok_or_else(|| AppError::NotConfigured("set CONNECT_SERVER and CONNECT_API_KEY".to_string()))
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/metrics", get(metrics))
        .route("/api/system-info", get(system_info))
        .route("/api/visitor-auth", get(visitor_auth))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "OK"
}
