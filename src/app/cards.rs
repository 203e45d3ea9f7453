//! The deck's item collection: one solid-colour card per entry.

use ratatui::style::Color;

pub const DEFAULT_PALETTE: &[&str] = &[
    "#077c11", "#e29cfd", "#9bdaaa", "#523bef", "#fc2769", "#feba7e", "#6c15aa", "#6d6b59",
    "#08a0ff", "#844adb",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub label: String,
    pub color: Color,
}

#[derive(Debug, Clone, Default)]
pub struct CardsAdapter {
    cards: Vec<Card>,
}

impl CardsAdapter {
    /// `count` cards cycling through `palette`.  Entries that are not
    /// `#rrggbb` are dropped; an empty result falls back to the default palette.
    pub fn from_palette(count: usize, palette: &[String]) -> Self {
        let mut colors: Vec<Color> = palette.iter().filter_map(|hex| parse_hex(hex)).collect();
        if colors.is_empty() {
            colors = DEFAULT_PALETTE.iter().filter_map(|hex| parse_hex(hex)).collect();
        }
        let cards = (0..count)
            .map(|i| Card {
                label: format!("Card {}", i + 1),
                color: colors[i % colors.len()],
            })
            .collect();
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Card> {
        self.cards.get(position)
    }
}

/// `#rrggbb` (leading `#` optional) to an RGB colour.
pub fn parse_hex(s: &str) -> Option<Color> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}
