mod connection;
mod message;
mod protocol;

pub use connection::FeedConnection;
pub use message::PeerEvent;
pub use protocol::{feed_endpoint, SUBSCRIBE_MESSAGE};

use crate::error::Result;
use bytes::Bytes;
use std::future::Future;

/// A stream of raw message frames from the feed
pub trait FrameSource {
    /// Wait for the next data frame.
    /// `Ok(None)` means the session was closed by the other side.
    fn next_frame(&mut self) -> impl Future<Output = Result<Option<Bytes>>> + Send;

    /// Close the session
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;
}
