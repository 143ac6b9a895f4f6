use crate::error::{PeerscopeError, Result};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Process signal that asked the dashboard to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
}

/// Cancel `cancel` on the first SIGINT or SIGTERM.
///
/// Returns the signal received, or `None` once `cancel` fires for any other
/// reason. In raw mode Ctrl-C arrives as a key press, so SIGINT here only
/// comes from outside the terminal.
pub async fn cancel_on_signal(cancel: CancellationToken) -> Result<Option<ShutdownSignal>> {
    let interrupt = async {
        signal::ctrl_c().await.map_err(PeerscopeError::Signal)?;
        Ok::<_, PeerscopeError>(ShutdownSignal::Interrupt)
    };

    #[cfg(unix)]
    let terminate = async {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .map_err(PeerscopeError::Signal)?;
        sigterm.recv().await;
        Ok::<_, PeerscopeError>(ShutdownSignal::Terminate)
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<ShutdownSignal>>();

    let received = tokio::select! {
        _ = cancel.cancelled() => return Ok(None),
        result = interrupt => result?,
        result = terminate => result?,
    };

    info!("{:?} received, shutting down", received);
    cancel.cancel();
    Ok(Some(received))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_once_cancelled() {
        let cancel = CancellationToken::new();
        let watcher = tokio::spawn(cancel_on_signal(cancel.clone()));

        cancel.cancel();
        let received = tokio_test::assert_ok!(watcher.await.unwrap());
        assert_eq!(received, None);
    }
}
