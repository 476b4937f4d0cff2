use clap::Args as ClapArgs;

/// Connection settings shared by the dashboard binaries.
///
/// Every value is optional and only overrides the configuration files when given.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct Args {
    /// URL of the metrics endpoint.
    #[arg(long, env = "CONNECT_METRICS_URL", value_name = "URL")]
    pub metrics_url: Option<String>,

    /// Base URL of the Connect server.
    #[arg(long, env = "CONNECT_SERVER", value_name = "URL")]
    pub server_url: Option<String>,

    /// API key used for administrative requests.
    #[arg(long, env = "CONNECT_API_KEY", value_name = "KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Timeout for every outgoing request, in seconds.
    #[arg(long, env = "CONNECT_DASHBOARD_TIMEOUT", value_name = "SECONDS")]
    pub request_timeout_secs: Option<u64>,

    /// Address the HTTP server listens on.
    #[arg(long, env = "CONNECT_DASHBOARD_LISTEN", value_name = "ADDR")]
    pub http_listen_address: Option<String>,

    /// Set to `CONNECT` by the Connect server for content it runs.
    #[arg(long, env = "RSTUDIO_PRODUCT", value_name = "PRODUCT", hide = true)]
    pub rstudio_product: Option<String>,
}

mod config_ext {
    use super::*;
    use config::{
        Map,
        Source,
        Value,
    };
    use std::collections::HashMap;

    impl Source for Args {
        fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
            Box::new((*self).clone())
        }

        fn collect(&self) -> Result<Map<String, Value>, config::ConfigError> {
            let mut cache = HashMap::<String, Value>::new();
            if let Some(metrics_url) = &self.metrics_url {
                cache.insert("metrics_url".to_string(), metrics_url.clone().into());
            }
            if let Some(server_url) = &self.server_url {
                cache.insert("server_url".to_string(), server_url.clone().into());
            }
            if let Some(api_key) = &self.api_key {
                cache.insert("api_key".to_string(), api_key.clone().into());
            }
            if let Some(timeout) = self.request_timeout_secs {
                cache.insert("request_timeout_secs".to_string(), timeout.into());
            }
            if let Some(address) = &self.http_listen_address {
                cache.insert("http_listen_address".to_string(), address.clone().into());
            }
            if let Some(product) = &self.rstudio_product {
                cache.insert("rstudio_product".to_string(), product.clone().into());
            }
            Ok(cache)
        }
    }
}

pub fn version() -> String {
    let author = clap::crate_authors!();
    let config_dir_path = crate::get_config_dir().display().to_string();

    format!(
        "\
{version}

Authors: {author}

Config directory: {config_dir_path}",
        version = clap::crate_version!()
    )
}
