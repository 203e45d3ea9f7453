//! Split the terminal into the deck and a one-line status bar.

use ratatui::layout::{Constraint, Layout, Margin, Rect};

pub struct AppLayout {
    /// Where the cards are drawn.  The deck host's viewport matches this.
    pub deck_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    pub fn from_area(area: Rect) -> Self {
        let [deck, status_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

        Self {
            deck_area: deck.inner(Margin::new(2, 1)),
            status_area,
        }
    }
}
