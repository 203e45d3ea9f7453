//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! Turns the deck host's attached views into cells on the terminal.

pub mod card_stack;
pub mod layout;
pub mod smooth_scroll;
pub mod theme;
