//! Ratatui widget that paints the attached cards of a deck.
//!
//! Cards are drawn in attach order, so the incoming card covers the base.
//! A card's scale shrinks it about its centre; anything outside the deck
//! area is clipped.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    widgets::{Paragraph, Widget},
};

use crate::app::deck::PlacedCard;
use crate::ui::theme::Theme;
use card_stack::core::ViewRect;

pub struct CardStackWidget<'a> {
    cards: &'a [PlacedCard<'a>],
    total: usize,
}

impl<'a> CardStackWidget<'a> {
    pub fn new(cards: &'a [PlacedCard<'a>], total: usize) -> Self {
        Self { cards, total }
    }
}

/// `rect` scaled about its centre, in viewport coordinates.
fn scaled(rect: ViewRect, scale: f32) -> ViewRect {
    let scale = scale.clamp(0.0, 1.0);
    let width = (rect.width() as f32 * scale).round() as i32;
    let height = (rect.height() as f32 * scale).round() as i32;
    let left = rect.left + (rect.width() - width) / 2;
    let top = rect.top + (rect.height() - height) / 2;
    ViewRect::new(left, top, left + width, top + height)
}

/// Part of `rect` that falls inside `area`, translated to buffer coordinates.
fn clip(rect: ViewRect, area: Rect) -> Option<Rect> {
    let left = rect.left.max(0);
    let top = rect.top.max(0);
    let right = rect.right.min(i32::from(area.width));
    let bottom = rect.bottom.min(i32::from(area.height));
    if left >= right || top >= bottom {
        return None;
    }
    // Bounded by the u16 area dimensions above.
    Some(Rect::new(
        area.x + left as u16,
        area.y + top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}

fn draw_card(placed: &PlacedCard<'_>, total: usize, area: Rect, buf: &mut Buffer) {
    let rect = scaled(placed.rect, placed.scale);
    let Some(visible) = clip(rect, area) else {
        return;
    };
    let color = placed.card.color;
    buf.set_style(visible, Theme::card_style(color));

    // Header row only when the card's real top edge is on screen.
    let top_row = area.y as i32 + rect.top;
    if top_row == i32::from(visible.y) && visible.width > 2 {
        let label_style = Theme::card_label_style(color);
        let inner_width = usize::from(visible.width - 2);
        buf.set_stringn(visible.x + 1, visible.y, &placed.card.label, inner_width, label_style);

        let counter = format!("{}/{}", placed.position + 1, total);
        let counter_width = counter.chars().count() as u16;
        let label_width = placed.card.label.chars().count() as u16;
        if counter_width + label_width + 3 <= visible.width {
            let x = visible.right() - 1 - counter_width;
            buf.set_string(x, visible.y, &counter, label_style);
        }
    }
}

impl Widget for CardStackWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.cards.is_empty() {
            Paragraph::new("No cards")
                .alignment(Alignment::Center)
                .style(Theme::empty_style())
                .render(area, buf);
            return;
        }
        for placed in self.cards {
            draw_card(placed, self.total, area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, style::Color, Terminal};

    use super::*;
    use crate::app::cards::Card;

    fn card(label: &str, color: Color) -> Card {
        Card {
            label: label.into(),
            color,
        }
    }

    fn render(cards: &[PlacedCard<'_>], width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("test backend");
        terminal
            .draw(|f| f.render_widget(CardStackWidget::new(cards, 5), f.area()))
            .expect("draw");
        terminal.backend().buffer().clone()
    }

    #[test]
    fn incoming_card_covers_base() {
        let red = card("Red", Color::Rgb(200, 0, 0));
        let blue = card("Blue", Color::Rgb(0, 0, 200));
        let placed = [
            PlacedCard {
                position: 0,
                rect: ViewRect::new(0, 0, 20, 10),
                scale: 1.0,
                card: &red,
            },
            PlacedCard {
                position: 1,
                rect: ViewRect::new(0, 6, 20, 16),
                scale: 1.0,
                card: &blue,
            },
        ];
        let buf = render(&placed, 20, 10);
        assert_eq!(buf[(5, 2)].bg, Color::Rgb(200, 0, 0));
        assert_eq!(buf[(5, 6)].bg, Color::Rgb(0, 0, 200));
        assert_eq!(buf[(5, 9)].bg, Color::Rgb(0, 0, 200));
        assert_eq!(buf[(1, 0)].symbol(), "R");
        assert_eq!(buf[(1, 6)].symbol(), "B");
        // Counter sits on the right of the header.
        assert_eq!(buf[(16, 6)].symbol(), "2");
    }

    #[test]
    fn shrunk_base_leaves_margin() {
        let green = card("Green", Color::Rgb(0, 180, 0));
        let placed = [PlacedCard {
            position: 0,
            rect: ViewRect::new(0, 0, 20, 10),
            scale: 0.5,
            card: &green,
        }];
        let buf = render(&placed, 20, 10);
        assert_eq!(buf[(0, 0)].bg, Color::Reset);
        assert_eq!(buf[(4, 2)].bg, Color::Reset);
        assert_eq!(buf[(5, 3)].bg, Color::Rgb(0, 180, 0));
        assert_eq!(buf[(14, 6)].bg, Color::Rgb(0, 180, 0));
        assert_eq!(buf[(15, 7)].bg, Color::Reset);
    }

    #[test]
    fn empty_deck_shows_placeholder() {
        let buf = render(&[], 20, 3);
        let row: String = (0..20u16).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert!(row.contains("No cards"), "{row:?}");
    }

    #[test]
    fn clip_handles_offscreen_cards() {
        let area = Rect::new(2, 1, 10, 5);
        assert_eq!(clip(ViewRect::new(0, 5, 10, 10), area), None);
        assert_eq!(clip(ViewRect::new(0, 3, 10, 8), area), Some(Rect::new(2, 4, 10, 2)));
    }
}
