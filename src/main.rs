use clap::Parser;
use color_eyre::Result;
use connect_dashboard::{
    init_errors,
    init_logging,
    run,
    Cli,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_errors()?;
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    run(cli).await
}
