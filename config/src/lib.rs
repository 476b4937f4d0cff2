//! Layered configuration for the Connect dashboard.
//!
//! Sources, lowest precedence first: the embedded `default-config.yaml`, an optional `config.yaml` in
//! [`get_config_dir`], then [`Args`] (command line and environment).

#[macro_use]
extern crate tracing;

mod app_config;
mod args;

use app_config::AppConfig;
pub use app_config::get_config_dir;
pub use args::{
    version,
    Args,
};
use color_eyre::Result;
use eyre::{
    eyre,
    Context as _,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    fmt,
    net::SocketAddr,
    path::Path,
    time::Duration,
};
use url::Url;

const DEFAULT_CONFIG: &str = include_str!("default-config.yaml");

/// Secret credential for the administrative API. Never printed or serialized.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl ToString) -> Self {
        Self(key.to_string())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(flatten, skip_serializing)]
    app_config: AppConfig,
    pub metrics_url: Url,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<Url>,
    #[serde(default, skip_serializing)]
    pub api_key: Option<ApiKey>,
    pub request_timeout_secs: u64,
    pub client_cache_ttl_secs: u64,
    pub client_cache_capacity: usize,
    pub http_listen_address: String,
    #[serde(default, skip_serializing)]
    pub rstudio_product: Option<String>,
}

impl DashboardConfig {
    pub fn new(args: Args) -> Result<Self, config::ConfigError> {
        Self::load_from(&get_config_dir(), args)
    }

    /// Load with `config_dir` as the location of the optional `config.yaml`.
    pub fn load_from(config_dir: &Path, args: Args) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("config_dir", config_dir.display().to_string())?
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml));

        let config_files = [("config.yaml", config::FileFormat::Yaml)];

        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
        }

        builder = builder.add_source(args);

        let cfg: Self = builder.build()?.try_deserialize()?;
        debug!(
            metrics_url = %cfg.metrics_url,
            server_url = ?cfg.server_url.as_ref().map(Url::as_str),
            has_api_key = cfg.api_key.is_some(),
            "configuration loaded"
        );

        Ok(cfg)
    }

    pub fn config_dir(&self) -> &Path {
        &self.app_config.config_dir
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn client_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.client_cache_ttl_secs)
    }

    /// Whether the process runs as content hosted by a Connect server.
    pub fn running_on_connect(&self) -> bool {
        self.rstudio_product.as_deref() == Some("CONNECT")
    }

    pub fn listen_address(&self) -> Result<SocketAddr> {
        self.http_listen_address
            .parse()
            .wrap_err_with(|| format!("Invalid listen address {:?}", self.http_listen_address))
    }

    /// Base URL of the administrative API, `<server_url>/__api__/`.
    pub fn admin_api_url(&self) -> Result<Url> {
        let server_url = self
            .server_url
            .as_ref()
            .ok_or_else(|| eyre!("No Connect server configured, set CONNECT_SERVER or --server-url"))?;
        let base = format!("{}/__api__/", server_url.as_str().trim_end_matches('/'));
        Url::parse(&base).wrap_err_with(|| format!("Invalid admin API URL {base:?}"))
    }

    /// Write the non-secret settings to `config.yaml` in the config directory.
    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(self.config_dir()).context("Failed to create config directory")?;
        let path = self.config_dir().join("config.yaml");
        let content = serde_yml::to_string(self).context("Failed to serialize config")?;
        info!(?path, "saving configuration");
        std::fs::write(&path, content).wrap_err_with(|| format!("Failed to write config to {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use temp_dir::TempDir;

    #[test]
    fn defaults_apply_without_files_or_args() {
        let dir = TempDir::new().unwrap();
        let cfg = DashboardConfig::load_from(dir.path(), Args::default()).unwrap();

        assert_eq!(cfg.metrics_url.as_str(), "http://localhost:3232/metrics");
        assert_eq!(cfg.server_url, None);
        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.client_cache_ttl(), Duration::from_secs(3600));
        assert_eq!(cfg.client_cache_capacity, 1024);
        assert_eq!(cfg.listen_address().unwrap(), "127.0.0.1:8081".parse().unwrap());
        assert_eq!(cfg.config_dir(), dir.path());
        assert!(!cfg.running_on_connect());
    }

    #[test]
    fn args_override_config_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.child("config.yaml"),
            "server_url: \"https://file.example.com\"\nrequest_timeout_secs: 30\nclient_cache_capacity: 8\n",
        )
        .unwrap();

        let args = Args {
            server_url: Some("https://connect.example.com/rsc".to_string()),
            api_key: Some("secret".to_string()),
            ..Args::default()
        };
        let cfg = DashboardConfig::load_from(dir.path(), args).unwrap();

        assert_eq!(cfg.server_url.as_ref().map(Url::as_str), Some("https://connect.example.com/rsc"));
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.client_cache_capacity, 8);
        assert_eq!(cfg.api_key, Some(ApiKey::new("secret")));

        let args = Args {
            rstudio_product: Some("CONNECT".to_string()),
            ..Args::default()
        };
        assert!(DashboardConfig::load_from(dir.path(), args).unwrap().running_on_connect());
    }

    #[test]
    fn admin_api_url_appends_api_prefix() {
        let dir = TempDir::new().unwrap();
        for server in ["https://connect.example.com", "https://connect.example.com/"] {
            let args = Args {
                server_url: Some(server.to_string()),
                ..Args::default()
            };
            let cfg = DashboardConfig::load_from(dir.path(), args).unwrap();
            assert_eq!(cfg.admin_api_url().unwrap().as_str(), "https://connect.example.com/__api__/");
        }

        let cfg = DashboardConfig::load_from(dir.path(), Args::default()).unwrap();
        assert!(cfg.admin_api_url().is_err());
    }

    #[test]
    fn api_key_is_never_printed_or_saved() {
        let dir = TempDir::new().unwrap();
        let args = Args {
            api_key: Some("top-secret".to_string()),
            ..Args::default()
        };
        let cfg = DashboardConfig::load_from(dir.path(), args).unwrap();

        assert!(!format!("{cfg:?}").contains("top-secret"));
        cfg.save().unwrap();
        let saved = std::fs::read_to_string(dir.child("config.yaml")).unwrap();
        assert!(!saved.contains("top-secret"));
        assert!(saved.contains("metrics_url"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = TempDir::new().unwrap();
        let args = Args {
            metrics_url: Some("not a url".to_string()),
            ..Args::default()
        };
        assert!(DashboardConfig::load_from(dir.path(), args).is_err());
    }
}
