mod terminal;
mod view;

use terminal::TerminalGuard;
use view::{KeyAction, TableView};

use crate::error::Result;
use crate::table::TableContent;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Run the dashboard screen until `cancel` fires or the user quits.
///
/// Repaints on every `redraw` notification, key press and resize. Quitting
/// from the keyboard cancels `cancel` so the rest of the process follows.
pub async fn run<T>(content: &T, redraw: Arc<Notify>, cancel: CancellationToken) -> Result<()>
where
    T: TableContent + ?Sized,
{
    let mut terminal = TerminalGuard::enter()?;
    let mut events = EventStream::new();
    let mut view = TableView::new();

    let size = terminal.size()?;
    view.render(terminal.out(), content, size)?;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = redraw.notified() => {}
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    let (_, height) = terminal.size()?;
                    let action = view.handle_key(
                        key,
                        content.row_count(),
                        content.column_count(),
                        TableView::page_size(height),
                    );
                    if action == KeyAction::Quit {
                        info!("Quit requested from keyboard");
                        cancel.cancel();
                        break;
                    }
                }
                Some(Ok(Event::Resize(width, height))) => {
                    debug!("Terminal resized to {}x{}", width, height);
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
        }

        let size = terminal.size()?;
        view.render(terminal.out(), content, size)?;
    }

    Ok(())
}
