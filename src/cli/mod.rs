use crate::dashboard::{Dashboard, DashboardConfig};
use crate::error::{PeerscopeError, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Parser, Debug)]
#[command(name = "peerscope")]
#[command(about = "Live terminal table of the peers seen by a p2p node", long_about = None)]
pub struct Cli {
    /// Peer feed address (host:port)
    #[arg(long, default_value = "localhost:8080", env = "PEERSCOPE_ADDR")]
    addr: String,

    /// Path to the MaxMind City database file
    #[arg(
        long,
        default_value = "GeoLite2-City_20210928/GeoLite2-City.mmdb",
        env = "PEERSCOPE_MMDB"
    )]
    mmdb: PathBuf,

    /// Append logs to this file (the dashboard owns the terminal)
    #[arg(long, env = "PEERSCOPE_LOG_FILE")]
    log_file: Option<PathBuf>,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Install the log subscriber. Keep the returned guard alive until exit so
    /// buffered lines get flushed.
    pub fn init_logging(&self) -> Result<Option<WorkerGuard>> {
        let Some(path) = &self.log_file else {
            return Ok(None);
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(PeerscopeError::LogFile)?;
        let (writer, guard) = tracing_appender::non_blocking(file);

        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive(tracing::Level::INFO.into()),
            )
            .with_writer(writer)
            .with_ansi(false)
            .init();

        Ok(Some(guard))
    }

    pub fn config(&self) -> DashboardConfig {
        DashboardConfig {
            feed_addr: self.addr.clone(),
            geoip_db: self.mmdb.clone(),
        }
    }

    pub async fn run(&self) -> Result<()> {
        let dashboard = Dashboard::new(self.config());
        dashboard.run().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["peerscope"]).unwrap();
        assert_eq!(cli.config(), DashboardConfig::default());
        assert_eq!(cli.log_file, None);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "peerscope",
            "--addr",
            "10.1.2.3:9000",
            "--mmdb",
            "/data/city.mmdb",
            "--log-file",
            "peerscope.log",
        ])
        .unwrap();

        let config = cli.config();
        assert_eq!(config.feed_addr, "10.1.2.3:9000");
        assert_eq!(config.geoip_db, PathBuf::from("/data/city.mmdb"));
        assert_eq!(cli.log_file, Some(PathBuf::from("peerscope.log")));
    }

    #[test]
    fn test_rejects_subcommands() {
        assert!(Cli::try_parse_from(["peerscope", "download"]).is_err());
    }
}
