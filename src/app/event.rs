//! Terminal event abstraction.
//!
//! A background task polls crossterm and forwards the events the deck cares
//! about over a channel, emitting a `Tick` whenever the poll times out so the
//! animation and idle-snap timers keep running.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use tokio::sync::mpsc;
use tracing::warn;

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
}

/// Keep key presses, wheel and drag traffic, and resizes.  Key releases and
/// plain mouse moves are noise for a scrolling deck.
fn translate(event: CtEvent) -> Option<AppEvent> {
    match event {
        CtEvent::Key(key) if key.kind != KeyEventKind::Release => Some(AppEvent::Key(key)),
        CtEvent::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Moved => None,
            _ => Some(AppEvent::Mouse(mouse)),
        },
        CtEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        _ => None,
    }
}

pub fn spawn_event_reader(tick_rate: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let ready = match event::poll(tick_rate) {
                Ok(ready) => ready,
                Err(err) => {
                    warn!(%err, "terminal poll failed");
                    false
                }
            };
            let app_event = if ready {
                match event::read().ok().and_then(translate) {
                    Some(app_event) => app_event,
                    None => continue,
                }
            } else {
                AppEvent::Tick
            };
            if tx.send(app_event).is_err() {
                break; // receiver dropped
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    use super::*;

    fn mouse(kind: MouseEventKind) -> CtEvent {
        CtEvent::Mouse(MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn drops_releases_and_moves() {
        let release = KeyEvent {
            code: KeyCode::Char('j'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(translate(CtEvent::Key(release)).is_none());
        assert!(translate(mouse(MouseEventKind::Moved)).is_none());
        assert!(matches!(translate(mouse(MouseEventKind::ScrollDown)), Some(AppEvent::Mouse(_))));
        assert!(matches!(translate(CtEvent::Resize(80, 24)), Some(AppEvent::Resize(80, 24))));
    }
}
