//! Application orchestration: deck state, event loop plumbing, input handling.

pub mod cards;
pub mod deck;
pub mod event;
pub mod handler;
pub mod state;
