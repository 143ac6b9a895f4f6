mod peers;

pub use peers::PeerTable;

/// Display hint attached to a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellStyle {
    #[default]
    Plain,
    /// Rendered green
    Active,
    /// Rendered red
    Inactive,
}

/// One rendered cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub style: CellStyle,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: CellStyle::Plain,
        }
    }

    pub fn styled(text: impl Into<String>, style: CellStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Columns of the peer table, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Address,
    Location,
    Status,
    Identifier,
}

impl Column {
    pub const ALL: [Column; 4] = [
        Column::Address,
        Column::Location,
        Column::Status,
        Column::Identifier,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn title(&self) -> &'static str {
        match self {
            Column::Address => "remote",
            Column::Location => "location",
            Column::Status => "status",
            Column::Identifier => "enode",
        }
    }
}

/// Grid contents queried by the renderer.
///
/// Queries outside the grid return `None`; implementations never fail.
pub trait TableContent: Send + Sync {
    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize;

    fn cell(&self, row: usize, column: usize) -> Option<Cell>;

    /// Extra text about a row, shown while it is selected
    fn row_detail(&self, _row: usize) -> Option<String> {
        None
    }
}
