use super::{FrameSource, SUBSCRIBE_MESSAGE};
use crate::error::{PeerscopeError, Result};
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};
use url::Url;

/// A WebSocket session with the peer feed
pub struct FeedConnection {
    endpoint: Url,
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl FeedConnection {
    /// Perform the WebSocket handshake with the feed
    pub async fn connect(endpoint: &Url) -> Result<Self> {
        info!("Connecting to feed: {}", endpoint);

        let (stream, response) = connect_async(endpoint.as_str())
            .await
            .map_err(|e| PeerscopeError::Connect(format!("{}: {}", endpoint, e)))?;

        info!(
            "Connected to feed: {} (HTTP {})",
            endpoint,
            response.status()
        );

        Ok(Self {
            endpoint: endpoint.clone(),
            stream,
        })
    }

    /// Send the subscription request. No acknowledgement follows.
    pub async fn subscribe(&mut self) -> Result<()> {
        self.stream
            .send(Message::Text(SUBSCRIBE_MESSAGE.to_string()))
            .await
            .map_err(|e| PeerscopeError::Connect(format!("error writing message: {}", e)))?;

        debug!("Sent subscription to {}", self.endpoint);
        Ok(())
    }
}

impl FrameSource for FeedConnection {
    async fn next_frame(&mut self) -> Result<Option<Bytes>> {
        loop {
            let message = match self.stream.next().await {
                Some(Ok(message)) => message,
                Some(Err(WsError::ConnectionClosed)) | None => return Ok(None),
                Some(Err(e)) => return Err(PeerscopeError::Transport(e.to_string())),
            };

            match message {
                Message::Text(text) => return Ok(Some(Bytes::from(text))),
                Message::Binary(data) => return Ok(Some(Bytes::from(data))),
                Message::Close(frame) => {
                    info!("Feed closed the session: {:?}", frame);
                    return Ok(None);
                }
                // Ping replies are queued by tungstenite itself
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        match self.stream.close(None).await {
            Ok(()) | Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => {
                debug!("Closed feed session {}", self.endpoint);
                Ok(())
            }
            Err(e) => Err(PeerscopeError::Transport(e.to_string())),
        }
    }
}
