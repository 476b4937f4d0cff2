//! # Connect Dashboard
//!
//! Renders a Posit Connect server's usage metrics and system information as terminal tables.
//!
//! ```bash
//! connect-dashboard --metrics-url=http://localhost:3232/metrics \
//!                   --server-url=https://connect.example.com \
//!                   --output-file=dashboard.json
//! ```

#[macro_use]
extern crate tracing;

pub mod args;
pub mod dashboard;
mod errors;
mod logging;

pub use args::Cli;
use color_eyre::Result;
use connect_dashboard_config::DashboardConfig;
pub use dashboard::{
    Dashboard,
    Section,
};
pub use errors::init_errors;
pub use logging::init_logging;

/// Load the configuration, render the dashboard once and optionally export it.
pub async fn run(cli: Cli) -> Result<()> {
    let config = DashboardConfig::new(cli.config.clone())?;
    if cli.save_config {
        config.save()?;
    }

    let dashboard = Dashboard::load(&config, cli.skip_system_info).await?;
    println!("{}", dashboard.format());

    if let Some(output_file) = &cli.output_file {
        let json_string = serde_json::to_string_pretty(&dashboard.summary())?;
        tokio::fs::write(output_file, json_string).await?;
        info!(?output_file, "dashboard exported");
    }

    Ok(())
}
