use crate::error::Result;
use crate::feed::{FeedConnection, FrameSource, PeerEvent};
use crate::geoip::{Resolver, SENTINEL_LOCATION};
use crate::registry::{NewPeer, PeerRegistry, RowId};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use url::Url;

/// Where a feed session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Subscribed,
    Streaming,
    Closing,
    Faulted,
}

/// How a session that did not fault came to an end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Shutdown was requested locally
    Cancelled,
    /// The feed closed the session
    Closed,
}

/// Turns feed frames into registry rows
pub struct Ingestor {
    registry: Arc<PeerRegistry>,
    resolver: Arc<dyn Resolver>,
    redraw: Arc<Notify>,
    state: SessionState,
}

impl Ingestor {
    pub fn new(
        registry: Arc<PeerRegistry>,
        resolver: Arc<dyn Resolver>,
        redraw: Arc<Notify>,
    ) -> Self {
        Self {
            registry,
            resolver,
            redraw,
            state: SessionState::Connecting,
        }
    }

    /// Connect to the feed and send the subscription request
    pub async fn subscribe(&mut self, endpoint: &Url) -> Result<FeedConnection> {
        self.set_state(SessionState::Connecting);

        let mut connection = FeedConnection::connect(endpoint).await?;
        connection.subscribe().await?;

        self.set_state(SessionState::Subscribed);
        Ok(connection)
    }

    /// Process frames in arrival order until the session ends.
    ///
    /// Cancellation is checked before every receive, so nothing is appended
    /// once `cancel` has fired. A transport error ends the session with `Err`.
    pub async fn run<S>(&mut self, source: &mut S, cancel: &CancellationToken) -> Result<SessionEnd>
    where
        S: FrameSource + Send,
    {
        self.set_state(SessionState::Streaming);

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                frame = source.next_frame() => Some(frame),
            };

            match next {
                None => {
                    self.set_state(SessionState::Closing);
                    if let Err(e) = source.close().await {
                        warn!("Failed to close feed session: {}", e);
                    }
                    return Ok(SessionEnd::Cancelled);
                }
                Some(Ok(Some(frame))) => {
                    self.handle_frame(&frame);
                }
                Some(Ok(None)) => {
                    self.set_state(SessionState::Closing);
                    return Ok(SessionEnd::Closed);
                }
                Some(Err(e)) => {
                    self.set_state(SessionState::Faulted);
                    error!("Feed session failed: {}", e);
                    return Err(e);
                }
            }
        }
    }

    /// Decode one frame and append it to the registry.
    /// Returns the new row, or `None` if the frame was dropped.
    pub fn handle_frame(&self, frame: &[u8]) -> Option<RowId> {
        let event = match PeerEvent::from_bytes(frame) {
            Ok(event) => event,
            Err(e) => {
                warn!("Dropping feed message: {}", e);
                return None;
            }
        };

        let location = self.locate(&event);
        let row_id = self.registry.append(NewPeer {
            remote_address: event.remote,
            location,
            identifier: event.enode,
        });

        self.redraw.notify_one();
        Some(row_id)
    }

    fn locate(&self, event: &PeerEvent) -> String {
        let Some(ip) = event.ip() else {
            debug!("Unparsable peer IP '{}'", event.plain_ip);
            return SENTINEL_LOCATION.to_string();
        };

        match self.resolver.resolve(ip) {
            Some(location) => location.to_string(),
            None => SENTINEL_LOCATION.to_string(),
        }
    }

    fn set_state(&mut self, state: SessionState) {
        if self.state != state {
            info!("Feed session: {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }
}
