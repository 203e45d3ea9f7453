//! Input handling: maps key/mouse events to deck operations.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tracing::debug;

use super::state::{AppState, Drag};
use crate::config::Action;

/// Velocity handed to the snap helper for a keyboard page turn.
const PAGE_FLING_VELOCITY: i32 = 1_000;

/// Weight of the newest sample in the drag velocity average.
const DRAG_SMOOTHING: f32 = 0.6;

pub fn handle_key(state: &mut AppState, key: KeyEvent, now: Instant) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    debug!(?action, "key action");

    let step = state.config.scroll_step;
    let last = state.item_count().saturating_sub(1);
    match action {
        Action::ScrollDown => {
            state.user_scroll(step, now);
        }
        Action::ScrollUp => {
            state.user_scroll(-step, now);
        }
        Action::NextCard => page(state, PAGE_FLING_VELOCITY),
        Action::PrevCard => page(state, -PAGE_FLING_VELOCITY),
        Action::JumpFirst => state.jump_to(0),
        Action::JumpLast => state.jump_to(last),
        Action::GlideFirst => glide(state, 0),
        Action::GlideLast => glide(state, last),
        Action::Quit => state.should_quit = true,
    }
}

/// Turn one card.  A fling first settles a card caught between two
/// positions; a deck already at rest animates to the neighbouring card.
fn page(state: &mut AppState, velocity: i32) {
    state.animation.cancel();
    state.last_scroll = None;
    if state.deck.fling(velocity) {
        return;
    }
    let Some(first) = state.first_visible() else {
        return;
    };
    let target = if velocity > 0 {
        (first + 1).min(state.item_count().saturating_sub(1))
    } else {
        first.saturating_sub(1)
    };
    if target != first {
        state.deck.smooth_scroll_to_position(target);
    }
}

fn glide(state: &mut AppState, position: usize) {
    state.animation.cancel();
    state.last_scroll = None;
    state.deck.smooth_scroll_to_position(position);
}

pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent, now: Instant) {
    let step = state.config.scroll_step;
    match mouse.kind {
        MouseEventKind::ScrollDown => {
            state.user_scroll(step, now);
        }
        MouseEventKind::ScrollUp => {
            state.user_scroll(-step, now);
        }
        MouseEventKind::Down(MouseButton::Left) => {
            state.animation.cancel();
            state.drag = Some(Drag {
                row: mouse.row,
                at: now,
                velocity: 0.0,
            });
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let Some(drag) = state.drag else {
                return;
            };
            // Dragging upwards pulls the next card in.
            let dy = i32::from(drag.row) - i32::from(mouse.row);
            let elapsed = now.saturating_duration_since(drag.at).as_secs_f32();
            let velocity = if elapsed > 0.0 {
                DRAG_SMOOTHING * (dy as f32 / elapsed) + (1.0 - DRAG_SMOOTHING) * drag.velocity
            } else {
                drag.velocity
            };
            if dy != 0 {
                state.user_scroll(dy, now);
            }
            state.drag = Some(Drag {
                row: mouse.row,
                at: now,
                velocity,
            });
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let Some(drag) = state.drag.take() else {
                return;
            };
            state.last_scroll = None;
            if !state.deck.fling(drag.velocity.round() as i32) {
                state.deck.settle();
            }
        }
        _ => {}
    }
}
