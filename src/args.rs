use clap::Parser;
use connect_dashboard_config::version;
use std::path::PathBuf;

/// Posit Connect usage dashboard for the terminal.
#[derive(Parser, Debug, Clone)]
#[command(name = "connect-dashboard", author, version = version(), about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: connect_dashboard_config::Args,

    /// Also write the dashboard as JSON to this file.
    #[arg(long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Do not query the administrative API for server and license information.
    #[arg(long, action)]
    pub skip_system_info: bool,

    /// Persist the effective settings (without the API key) to the config directory.
    #[arg(long, action)]
    pub save_config: bool,

    /// Enable verbose logging.
    #[arg(short, long, action)]
    pub verbose: bool,
}
