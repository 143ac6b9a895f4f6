mod cli;
mod dashboard;
mod error;
mod feed;
mod geoip;
mod ingest;
mod registry;
mod shutdown;
mod table;
mod ui;

use anyhow::Result;
use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first: logging goes to the file they name
    let cli = Cli::parse();
    let _log_guard = cli.init_logging()?;

    cli.run().await?;

    Ok(())
}
