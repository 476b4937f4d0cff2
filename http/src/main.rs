use axum::serve;
use clap::Parser;
use color_eyre::Result;
use connect_dashboard_config::{
    version,
    DashboardConfig,
};
use connect_dashboard_http::router::{
    create_router,
    AppState,
};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Layer,
};

/// Connect dashboard HTTP server.
#[derive(Parser, Debug)]
#[command(author, version = version(), about, long_about = None)]
struct Args {
    #[command(flatten)]
    config: connect_dashboard_config::Args,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, action)]
    verbose: bool,
}

fn init_logging(verbose: bool) -> Result<()> {
    color_eyre::install()?;

    let default_level = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(fmt::layer().with_filter(filter))
        .with(tracing_error::ErrorLayer::default())
        .init();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {err}");
    }
}

async fn start_server(args: Args) -> Result<()> {
    let config = DashboardConfig::new(args.config)?;
    let address = config.listen_address()?;
    let app = create_router(AppState::new(config)?);

    let listener = TcpListener::bind(address).await?;
    tracing::info!("listening on {address}");
    serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;
    start_server(args).await
}
