use crate::table::{Cell, CellStyle, Column, TableContent};
use crossterm::cursor::MoveTo;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};
use std::ops::Range;

pub const TITLE: &str = "eth p2p nodes";

const COLUMN_GAP: usize = 2;

/// Title, header and status lines
const CHROME_LINES: u16 = 3;

/// What a key press asks the dashboard to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Moved,
    Ignored,
}

/// Scrollable grid with a selectable cell
#[derive(Debug, Default)]
pub struct TableView {
    selected_row: usize,
    selected_column: usize,
    /// First visible row
    offset: usize,
}

impl TableView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of data rows that fit on a screen of the given height
    pub fn page_size(height: u16) -> usize {
        height.saturating_sub(CHROME_LINES).max(1) as usize
    }

    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        rows: usize,
        columns: usize,
        page: usize,
    ) -> KeyAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        let last_row = rows.saturating_sub(1);
        let last_column = columns.saturating_sub(1);

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_row = self.selected_row.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected_row = (self.selected_row + 1).min(last_row);
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.selected_column = (self.selected_column + 1).min(last_column);
            }
            KeyCode::Home | KeyCode::Char('g') => self.selected_row = 0,
            KeyCode::End | KeyCode::Char('G') => self.selected_row = last_row,
            KeyCode::PageUp => {
                self.selected_row = self.selected_row.saturating_sub(page);
            }
            KeyCode::PageDown => {
                self.selected_row = (self.selected_row + page).min(last_row);
            }
            _ => return KeyAction::Ignored,
        }

        self.scroll_to_selection(page);
        KeyAction::Moved
    }

    fn scroll_to_selection(&mut self, page: usize) {
        let page = page.max(1);
        if self.selected_row < self.offset {
            self.offset = self.selected_row;
        } else if self.selected_row >= self.offset + page {
            self.offset = self.selected_row + 1 - page;
        }
    }

    /// Width of each column: the widest of its title and its visible cells
    pub fn column_widths<T>(content: &T, rows: Range<usize>) -> Vec<usize>
    where
        T: TableContent + ?Sized,
    {
        (0..content.column_count())
            .map(|column| {
                let title = Column::from_index(column)
                    .map(|c| c.title().chars().count())
                    .unwrap_or(0);

                rows.clone()
                    .filter_map(|row| content.cell(row, column))
                    .map(|cell| cell.text.chars().count())
                    .fold(title, usize::max)
            })
            .collect()
    }

    /// Paint the whole screen
    pub fn render<W, T>(&mut self, out: &mut W, content: &T, size: (u16, u16)) -> io::Result<()>
    where
        W: Write,
        T: TableContent + ?Sized,
    {
        let (width, height) = size;
        let width = width as usize;
        let rows = content.row_count();
        let columns = content.column_count();
        let page = Self::page_size(height);

        // Rows only ever get added, but the first paint can happen before any
        self.selected_row = self.selected_row.min(rows.saturating_sub(1));
        self.selected_column = self.selected_column.min(columns.saturating_sub(1));
        self.scroll_to_selection(page);

        let visible = self.offset..(self.offset + page).min(rows);
        let widths = Self::column_widths(content, visible.clone());

        queue!(
            out,
            MoveTo(0, 0),
            SetAttribute(Attribute::Bold),
            Print(fit(TITLE, width)),
            SetAttribute(Attribute::Reset),
            Clear(ClearType::UntilNewLine)
        )?;

        let header: Vec<Cell> = (0..columns)
            .map(|column| Cell::plain(Column::from_index(column).map_or("", |c| c.title())))
            .collect();
        queue!(out, MoveTo(0, 1), SetAttribute(Attribute::Underlined))?;
        draw_line(out, &header, &widths, None, width)?;

        let mut y = 2u16;
        for row in visible {
            let cells: Vec<Cell> = (0..columns)
                .map(|column| content.cell(row, column).unwrap_or_else(|| Cell::plain("")))
                .collect();
            let selected = (row == self.selected_row).then_some(self.selected_column);

            queue!(out, MoveTo(0, y))?;
            draw_line(out, &cells, &widths, selected, width)?;
            y += 1;
        }

        queue!(out, MoveTo(0, y), Clear(ClearType::FromCursorDown))?;

        let mut status = format!("{} {}", rows, if rows == 1 { "peer" } else { "peers" });
        if let Some(detail) = content.row_detail(self.selected_row) {
            status.push_str("  ");
            status.push_str(&detail);
        }
        status.push_str("  arrows/hjkl select  q quit");
        queue!(
            out,
            MoveTo(0, height.saturating_sub(1)),
            SetAttribute(Attribute::Dim),
            Print(fit(&status, width)),
            SetAttribute(Attribute::Reset)
        )?;

        out.flush()
    }
}

fn draw_line<W: Write>(
    out: &mut W,
    cells: &[Cell],
    widths: &[usize],
    selected_column: Option<usize>,
    width: usize,
) -> io::Result<()> {
    let mut remaining = width;

    for (column, (cell, column_width)) in cells.iter().zip(widths).enumerate() {
        if remaining == 0 {
            break;
        }

        let cell_width = (*column_width).min(remaining);
        if selected_column == Some(column) {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        }
        if let Some(color) = style_color(cell.style) {
            queue!(out, SetForegroundColor(color))?;
        }
        queue!(out, Print(fit(&cell.text, cell_width)), ResetColor)?;
        if selected_column == Some(column) {
            queue!(out, SetAttribute(Attribute::NoReverse))?;
        }
        remaining -= cell_width;

        let gap = COLUMN_GAP.min(remaining);
        queue!(out, Print(" ".repeat(gap)))?;
        remaining -= gap;
    }

    queue!(
        out,
        SetAttribute(Attribute::Reset),
        Clear(ClearType::UntilNewLine)
    )
}

fn style_color(style: CellStyle) -> Option<Color> {
    match style {
        CellStyle::Plain => None,
        CellStyle::Active => Some(Color::Green),
        CellStyle::Inactive => Some(Color::Red),
    }
}

/// Cut or pad `text` to exactly `width` characters
fn fit(text: &str, width: usize) -> String {
    let mut fitted: String = text.chars().take(width).collect();
    let len = fitted.chars().count();
    fitted.extend(std::iter::repeat(' ').take(width - len));
    fitted
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticTable(Vec<[&'static str; 4]>);

    impl TableContent for StaticTable {
        fn row_count(&self) -> usize {
            self.0.len()
        }

        fn column_count(&self) -> usize {
            4
        }

        fn cell(&self, row: usize, column: usize) -> Option<Cell> {
            let text = self.0.get(row)?.get(column)?;
            let style = if column == 2 {
                CellStyle::Active
            } else {
                CellStyle::Plain
            };
            Some(Cell::styled(*text, style))
        }
    }

    fn peers(n: usize) -> StaticTable {
        StaticTable(vec![["10.0.0.5:30303", "US:Mountain View", "active", "enode://abc…"]; n])
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 3), "abc");
        assert_eq!(fit("ab…", 3), "ab…");
    }

    #[test]
    fn test_column_widths() {
        let table = StaticTable(vec![
            ["a", "US:Mountain View", "active", "x"],
            ["10.0.0.5:30303", "??:unknown", "active", "y"],
        ]);

        let widths = TableView::column_widths(&table, 0..2);
        // "remote", "location", "status" and "enode" titles set the floor
        assert_eq!(widths, vec![14, 16, 6, 5]);

        let widths = TableView::column_widths(&table, 0..1);
        assert_eq!(widths[0], 6);
    }

    #[test]
    fn test_render_contains_cells() {
        let mut view = TableView::new();
        let mut out = Vec::new();
        view.render(&mut out, &peers(1), (120, 10)).unwrap();

        let screen = String::from_utf8_lossy(&out);
        assert!(screen.contains(TITLE));
        assert!(screen.contains("10.0.0.5:30303"));
        assert!(screen.contains("US:Mountain View"));
        assert!(screen.contains("enode://abc…"));
        assert!(screen.contains("1 peer "));
    }

    #[test]
    fn test_render_empty_table() {
        let mut view = TableView::new();
        let mut out = Vec::new();
        view.render(&mut out, &peers(0), (80, 24)).unwrap();

        assert!(String::from_utf8_lossy(&out).contains("0 peers"));
        assert_eq!((view.selected_row, view.selected_column), (0, 0));
    }

    #[test]
    fn test_render_narrow_terminal() {
        let mut view = TableView::new();
        let mut out = Vec::new();
        view.render(&mut out, &peers(3), (10, 2)).unwrap();

        assert!(!String::from_utf8_lossy(&out).contains("Mountain"));
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut view = TableView::new();
        assert_eq!(view.handle_key(key(KeyCode::Up), 3, 4, 10), KeyAction::Moved);
        assert_eq!((view.selected_row, view.selected_column), (0, 0));

        for _ in 0..5 {
            view.handle_key(key(KeyCode::Down), 3, 4, 10);
            view.handle_key(key(KeyCode::Right), 3, 4, 10);
        }
        assert_eq!((view.selected_row, view.selected_column), (2, 3));

        view.handle_key(key(KeyCode::Home), 3, 4, 10);
        assert_eq!((view.selected_row, view.selected_column), (0, 3));
    }

    #[test]
    fn test_scrolls_to_selection() {
        let mut view = TableView::new();
        view.handle_key(key(KeyCode::End), 100, 4, 10);
        assert_eq!(view.selected_row, 99);
        assert_eq!(view.offset, 90);

        view.handle_key(key(KeyCode::PageUp), 100, 4, 10);
        assert_eq!(view.selected_row, 89);
        assert_eq!(view.offset, 89);
    }

    #[test]
    fn test_quit_keys() {
        let mut view = TableView::new();
        assert_eq!(view.handle_key(key(KeyCode::Char('q')), 0, 4, 1), KeyAction::Quit);
        assert_eq!(view.handle_key(key(KeyCode::Esc), 0, 4, 1), KeyAction::Quit);
        assert_eq!(
            view.handle_key(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                0,
                4,
                1
            ),
            KeyAction::Quit
        );
        assert_eq!(view.handle_key(key(KeyCode::Char('x')), 0, 4, 1), KeyAction::Ignored);
    }
}
