//! Central application state.
//!
//! The deck (host + layout manager + snap helper), the animation playing a
//! queued smooth scroll, and the timers that decide when to snap.

use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::layout::Rect;
use tracing::debug;

use card_stack::core::{ScrollingList, StackLayoutManager, StackPagerSnapHelper};

use super::cards::CardsAdapter;
use super::deck::{DeckHost, ViewId};
use crate::config::AppConfig;
use crate::ui::smooth_scroll::SmoothScroll;

/// An in-progress mouse drag.
#[derive(Debug, Clone, Copy)]
pub struct Drag {
    pub row: u16,
    pub at: Instant,
    /// Rows per second, positive when content moves up.
    pub velocity: f32,
}

pub struct AppState {
    pub deck: ScrollingList<DeckHost>,
    pub animation: SmoothScroll,
    pub config: AppConfig,
    /// Time of the last user scroll that has not been snapped yet.
    pub last_scroll: Option<Instant>,
    pub drag: Option<Drag>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(cards: CardsAdapter, config: AppConfig) -> Result<Self> {
        let host = DeckHost::new(cards, config.rows_per_inch);
        let manager = StackLayoutManager::<ViewId>::new()
            .with_scale_factor(config.scale_factor)
            .with_bottom_offset(config.bottom_offset);
        let mut deck = ScrollingList::new(host, Box::new(manager));
        deck.set_min_fling_velocity(config.min_fling_velocity);
        deck.set_snap_helper(Box::new(StackPagerSnapHelper::new()))?;

        Ok(Self {
            deck,
            animation: SmoothScroll::default(),
            config,
            last_scroll: None,
            drag: None,
            should_quit: false,
        })
    }

    /// Match the deck viewport to `deck_area`.
    pub fn on_resize(&mut self, deck_area: Rect) {
        if self.deck.host_mut().resize(deck_area.width, deck_area.height) {
            debug!(width = deck_area.width, height = deck_area.height, "deck resized");
            self.animation.cancel();
            self.deck.on_size_changed();
        }
    }

    pub fn first_visible(&self) -> Option<usize> {
        self.deck.manager().first_visible_position()
    }

    pub fn item_count(&self) -> usize {
        self.deck.host().cards().len()
    }

    /// How far the incoming card has advanced over the base.
    pub fn scroll_offset(&self) -> f32 {
        self.deck
            .manager()
            .as_any()
            .downcast_ref::<StackLayoutManager<ViewId>>()
            .map_or(0.0, StackLayoutManager::scroll_offset)
    }

    /// A direct user scroll.  Interrupts any animation and re-arms the idle snap.
    pub fn user_scroll(&mut self, dy: i32, now: Instant) -> i32 {
        self.animation.cancel();
        self.last_scroll = Some(now);
        self.deck.scroll_by(dy)
    }

    pub fn jump_to(&mut self, position: usize) {
        self.animation.cancel();
        self.last_scroll = None;
        self.deck.scroll_to_position(position);
    }

    /// Start any animation the deck has queued.
    fn start_pending(&mut self, now: Instant) {
        if let Some(request) = self.deck.host_mut().take_smooth_scroll() {
            debug!(?request, "animation started");
            self.animation.start(request, now);
        }
    }

    fn snap_idle(&self) -> Duration {
        Duration::from_millis(self.config.snap_idle_ms)
    }

    /// Advance one frame: lay out, snap an idle deck, play animation.
    pub fn tick(&mut self, now: Instant) {
        self.deck.layout_if_needed();

        let idle = self
            .last_scroll
            .is_some_and(|at| now.saturating_duration_since(at) >= self.snap_idle());
        if idle && self.drag.is_none() && !self.animation.is_animating() {
            self.last_scroll = None;
            self.deck.settle();
        }

        self.start_pending(now);
        let dy = self.animation.tick(now);
        if dy != 0 {
            self.deck.scroll_by(dy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(items: usize) -> AppState {
        let config = AppConfig::default();
        let mut state = AppState::new(CardsAdapter::from_palette(items, &[]), config).expect("state");
        state.on_resize(Rect::new(0, 0, 40, 20));
        state.tick(Instant::now());
        state
    }

    #[test]
    fn idle_scroll_snaps_back() {
        let mut state = state(5);
        let start = Instant::now();
        assert_eq!(state.user_scroll(4, start), 4);

        state.tick(start + Duration::from_millis(10));
        assert!(!state.animation.is_animating());

        state.tick(start + Duration::from_millis(400));
        assert!(state.animation.is_animating());
        state.tick(start + Duration::from_secs(5));
        assert!(!state.animation.is_animating());

        let tops: Vec<i32> = state.deck.host().placed_cards().iter().map(|c| c.rect.top).collect();
        assert_eq!(tops[..2], [0, 18]);
    }

    #[test]
    fn fling_threshold_comes_from_config() {
        let config = AppConfig {
            min_fling_velocity: 5_000,
            ..AppConfig::default()
        };
        let mut state = AppState::new(CardsAdapter::from_palette(5, &[]), config).expect("state");
        state.on_resize(Rect::new(0, 0, 40, 20));
        state.tick(Instant::now());
        assert!(!state.deck.fling(1_000));
        assert!(state.deck.fling(5_000));
    }

    #[test]
    fn resize_relays_out() {
        let mut state = state(5);
        state.on_resize(Rect::new(0, 0, 30, 12));
        assert!(state.deck.needs_layout());
        state.tick(Instant::now());
        let placed = state.deck.host().placed_cards();
        assert_eq!(placed[0].rect.height(), 10);
    }
}
