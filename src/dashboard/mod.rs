use crate::error::{PeerscopeError, Result};
use crate::feed::feed_endpoint;
use crate::geoip::GeoResolver;
use crate::ingest::{Ingestor, SessionEnd};
use crate::registry::PeerRegistry;
use crate::shutdown::cancel_on_signal;
use crate::table::PeerTable;
use crate::ui;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Configuration for the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Peer feed address, host:port
    pub feed_addr: String,
    /// MaxMind City database file
    pub geoip_db: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            feed_addr: "localhost:8080".to_string(),
            geoip_db: PathBuf::from("GeoLite2-City_20210928/GeoLite2-City.mmdb"),
        }
    }
}

/// Live table of the peers announced by a node's feed
pub struct Dashboard {
    config: DashboardConfig,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }

    /// Run until interrupted or until the feed session ends.
    ///
    /// Returns `Ok` only for a requested shutdown (signal or quit key).
    pub async fn run(&self) -> Result<()> {
        let endpoint = feed_endpoint(&self.config.feed_addr)?;

        // Startup failures surface before the screen is taken over
        let resolver = GeoResolver::open(&self.config.geoip_db)?;
        let registry = Arc::new(PeerRegistry::new());
        let redraw = Arc::new(Notify::new());

        let mut ingestor = Ingestor::new(
            Arc::clone(&registry),
            Arc::new(resolver),
            Arc::clone(&redraw),
        );
        let mut connection = ingestor.subscribe(&endpoint).await?;

        let cancel = CancellationToken::new();

        let signals = tokio::spawn(cancel_on_signal(cancel.clone()));

        let ingestion = tokio::spawn({
            let cancel = cancel.clone();
            async move {
                let end = ingestor.run(&mut connection, &cancel).await;
                info!("Feed session ended: {:?}", ingestor.state());
                cancel.cancel();
                end
            }
        });

        let table = PeerTable::new(Arc::clone(&registry));
        let ui_result = ui::run(&table, redraw, cancel.clone()).await;

        cancel.cancel();
        let ingestion_result = ingestion.await;
        if let Ok(Err(e)) = signals.await {
            warn!("{}", e);
        }

        info!("Shut down with {} peers recorded", registry.count());

        ui_result?;
        match ingestion_result {
            Ok(Ok(SessionEnd::Cancelled)) => Ok(()),
            Ok(Ok(SessionEnd::Closed)) => Err(PeerscopeError::SessionClosed),
            Ok(Err(e)) => Err(e),
            Err(e) => {
                error!("Ingestion task failed: {}", e);
                Err(PeerscopeError::Transport(format!("ingestion task failed: {}", e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_database_is_fatal() {
        let dashboard = Dashboard::new(DashboardConfig {
            feed_addr: "localhost:1".to_string(),
            geoip_db: PathBuf::from("/nonexistent/GeoLite2-City.mmdb"),
        });

        let result = dashboard.run().await;
        assert!(matches!(result, Err(PeerscopeError::Database(_))));
    }

    #[tokio::test]
    async fn test_invalid_endpoint_is_fatal() {
        let dashboard = Dashboard::new(DashboardConfig {
            feed_addr: "localhost:notaport".to_string(),
            ..DashboardConfig::default()
        });

        let result = dashboard.run().await;
        assert!(matches!(result, Err(PeerscopeError::InvalidEndpoint(_))));
    }
}
