//! Colours and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

impl Theme {
    // ── cards ──────────────────────────────────────────────────
    pub fn card_style(color: Color) -> Style {
        Style::default().bg(color).fg(Self::label_color(color))
    }

    pub fn card_label_style(color: Color) -> Style {
        Self::card_style(color).add_modifier(Modifier::BOLD)
    }

    /// Black or white, whichever reads better on `background`.
    pub fn label_color(background: Color) -> Color {
        match background {
            Color::Rgb(r, g, b) => {
                let luma = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
                if luma > 140.0 { Color::Black } else { Color::White }
            }
            _ => Color::White,
        }
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn empty_style() -> Style {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn status_position_style() -> Style {
        Self::status_bar_style()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }
}
