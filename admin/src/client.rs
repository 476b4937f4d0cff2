use crate::{
    error::AdminError,
    settings::{
        Installations,
        Runtime,
        ServerSettings,
    },
};
use connect_dashboard_config::{
    ApiKey,
    DashboardConfig,
};
use reqwest::{
    header::AUTHORIZATION,
    Client,
    Response,
};
use serde::{
    de::DeserializeOwned,
    Deserialize,
};
use std::time::Duration;
use url::Url;

const CREDENTIALS_PATH: &str = "v1/oauth/integrations/credentials";
const TOKEN_EXCHANGE_GRANT: &str = "urn:ietf:params:oauth:grant-type:token-exchange";
const USER_SESSION_TOKEN_TYPE: &str = "urn:posit:connect:user-session-token";
const API_KEY_TOKEN_TYPE: &str = "urn:posit:connect:api-key";

/// Client for the Connect administrative API rooted at `<server>/__api__/`.
#[derive(Clone, Debug)]
pub struct AdminClient {
    http: Client,
    base_url: Url,
    api_key: ApiKey,
}

#[derive(Deserialize)]
struct CredentialsResponse {
    access_token: String,
}

impl AdminClient {
    pub fn new(base_url: Url, api_key: ApiKey, timeout: Duration) -> Result<Self, AdminError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http_client(http, base_url, api_key))
    }

    pub fn with_http_client(http: Client, base_url: Url, api_key: ApiKey) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// Service client using the configured server and API key.
    pub fn from_config(config: &DashboardConfig) -> eyre::Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| eyre::eyre!("No API key configured, set CONNECT_API_KEY or --api-key"))?;
        Ok(Self::new(config.admin_api_url()?, api_key, config.request_timeout())?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, AdminError> {
        self.base_url.join(path).map_err(|source| AdminError::InvalidUrl {
            url: format!("{}{path}", self.base_url),
            source,
        })
    }

    fn authorization(&self) -> String {
        format!("Key {}", self.api_key.expose())
    }

    /// `GET` a path relative to the API root and decode the JSON body.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AdminError> {
        let url = self.url(path)?;
        let response = self
            .http
            .get(url.clone())
            .header(AUTHORIZATION, self.authorization())
            .send()
            .await?;
        read_json(url, response).await
    }

    pub async fn server_settings(&self) -> Result<ServerSettings, AdminError> {
        self.get_json("server_settings").await
    }

    pub async fn installations(&self, runtime: Runtime) -> Result<Installations, AdminError> {
        self.get_json(runtime.settings_path()).await
    }

    /// Client acting on behalf of the visitor owning `session_token`.
    ///
    /// The session token is exchanged for a visitor API key through the OAuth integration associated with the
    /// content. Fails with [`AdminError::NoIntegration`] when there is none.
    pub async fn with_user_session_token(&self, session_token: &str) -> Result<Self, AdminError> {
        let url = self.url(CREDENTIALS_PATH)?;
        let form = [
            ("grant_type", TOKEN_EXCHANGE_GRANT),
            ("subject_token_type", USER_SESSION_TOKEN_TYPE),
            ("subject_token", session_token),
            ("requested_token_type", API_KEY_TOKEN_TYPE),
        ];

        debug!("exchanging user session token for a visitor API key");
        let response = self
            .http
            .post(url.clone())
            .header(AUTHORIZATION, self.authorization())
            .form(&form)
            .send()
            .await?;
        let credentials: CredentialsResponse = read_json(url, response).await?;

        Ok(Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            api_key: ApiKey::new(credentials.access_token),
        })
    }
}

async fn read_json<T: DeserializeOwned>(url: Url, response: Response) -> Result<T, AdminError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let err = AdminError::from_response(url, status, &body);
        debug!(%status, "Connect API request failed: {err}");
        return Err(err);
    }

    serde_json::from_str(&body).map_err(|source| AdminError::Decode { url, source })
}
