use super::{Cell, CellStyle, Column, TableContent};
use crate::registry::{Peer, PeerRegistry};
use std::sync::Arc;

/// Identifiers are cut to this many characters in the table
pub const IDENTIFIER_DISPLAY_CHARS: usize = 20;

const ELLIPSIS: &str = "…";

/// Read-only projection of the peer registry onto table cells
#[derive(Debug, Clone)]
pub struct PeerTable {
    registry: Arc<PeerRegistry>,
}

impl PeerTable {
    pub fn new(registry: Arc<PeerRegistry>) -> Self {
        Self { registry }
    }
}

impl TableContent for PeerTable {
    fn row_count(&self) -> usize {
        self.registry.count()
    }

    fn column_count(&self) -> usize {
        Column::ALL.len()
    }

    fn cell(&self, row: usize, column: usize) -> Option<Cell> {
        let column = Column::from_index(column)?;
        self.registry.with_peer(row, |peer| peer_cell(peer, column))
    }

    fn row_detail(&self, row: usize) -> Option<String> {
        let peer = self.registry.get(row)?;
        let rows = self.registry.rows_with_identifier(&peer.identifier);
        match rows.first() {
            Some(&first) if rows.len() > 1 => Some(format!(
                "{} (seen {}x, first at row {})",
                peer.identifier,
                rows.len(),
                first
            )),
            _ => Some(format!("{} (seen 1x)", peer.identifier)),
        }
    }
}

fn peer_cell(peer: &Peer, column: Column) -> Cell {
    match column {
        Column::Address => Cell::plain(peer.remote_address.as_str()),
        Column::Location => Cell::plain(peer.location.as_str()),
        Column::Status => {
            if peer.active {
                Cell::styled("active", CellStyle::Active)
            } else {
                Cell::styled("inactive", CellStyle::Inactive)
            }
        }
        Column::Identifier => Cell::plain(truncate_identifier(&peer.identifier)),
    }
}

/// Display form of an identifier: the first 20 characters and an ellipsis,
/// or the whole identifier when it is shorter than that
pub fn truncate_identifier(identifier: &str) -> String {
    match identifier.char_indices().nth(IDENTIFIER_DISPLAY_CHARS - 1) {
        Some((index, last)) => {
            let end = index + last.len_utf8();
            format!("{}{}", &identifier[..end], ELLIPSIS)
        }
        None => identifier.to_string(),
    }
}
