use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};
use tracing::debug;

/// Dense, zero-based position of a peer in the registry
pub type RowId = usize;

/// One observed peer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peer {
    pub row_id: RowId,
    pub remote_address: String,
    pub location: String,
    pub active: bool,
    pub identifier: String,
}

/// What the ingestion loop knows about a peer before it gets a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPeer {
    pub remote_address: String,
    pub location: String,
    pub identifier: String,
}

#[derive(Debug, Default)]
struct Rows {
    peers: Vec<Peer>,
    /// Row ids per identifier, ascending
    by_identifier: HashMap<String, Vec<RowId>>,
}

/// Append-only table of every peer seen on the feed.
///
/// A single writer appends while readers query from another task. The lock
/// is held only for the duration of one call, and no call walks the rows.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    rows: RwLock<Rows>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Rows> {
        self.rows.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a peer under the next row id and return that id
    pub fn append(&self, peer: NewPeer) -> RowId {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        let row_id = rows.peers.len();

        rows.by_identifier
            .entry(peer.identifier.clone())
            .or_default()
            .push(row_id);
        rows.peers.push(Peer {
            row_id,
            remote_address: peer.remote_address,
            location: peer.location,
            active: true,
            identifier: peer.identifier,
        });

        debug!("Appended peer row {}", row_id);
        row_id
    }

    pub fn get(&self, row_id: RowId) -> Option<Peer> {
        self.read().peers.get(row_id).cloned()
    }

    /// Read one row in place, without cloning it
    pub fn with_peer<T>(&self, row_id: RowId, f: impl FnOnce(&Peer) -> T) -> Option<T> {
        self.read().peers.get(row_id).map(f)
    }

    pub fn count(&self) -> usize {
        self.read().peers.len()
    }

    /// Rows recorded for a given identifier, in insertion order.
    /// Repeated sightings of a peer are never merged, so there may be several.
    pub fn rows_with_identifier(&self, identifier: &str) -> Vec<RowId> {
        self.read()
            .by_identifier
            .get(identifier)
            .cloned()
            .unwrap_or_default()
    }
}
