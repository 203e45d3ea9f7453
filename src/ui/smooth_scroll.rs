//! Playback of a [`SmoothScrollRequest`] as per-frame scroll deltas.
//!
//! The request's distance is spread over its duration along a decelerate
//! curve, `1 - (1 - t)^2`, so the deck moves quickly at first and eases
//! into the resting card.  Each tick yields only the rows not yet emitted,
//! which keeps the total exact regardless of frame timing.

use std::time::Instant;

use card_stack::core::SmoothScrollRequest;

#[derive(Debug, Clone)]
struct Playback {
    request: SmoothScrollRequest,
    started: Instant,
    emitted: i32,
}

#[derive(Debug, Clone, Default)]
pub struct SmoothScroll {
    playback: Option<Playback>,
}

fn decelerate(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv
}

impl SmoothScroll {
    /// Start playing `request`, replacing anything still in flight.
    pub fn start(&mut self, request: SmoothScrollRequest, now: Instant) {
        self.playback = Some(Playback {
            request,
            started: now,
            emitted: 0,
        });
    }

    pub fn cancel(&mut self) {
        self.playback = None;
    }

    /// Rows to scroll this frame.  Finishes the animation once its
    /// duration has elapsed.
    pub fn tick(&mut self, now: Instant) -> i32 {
        let Some(playback) = self.playback.as_mut() else {
            return 0;
        };
        let elapsed = now.saturating_duration_since(playback.started);
        let duration = playback.request.duration;
        let t = if duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f32() / duration.as_secs_f32()
        };

        let target = (playback.request.dy as f32 * decelerate(t)).round() as i32;
        let delta = target - playback.emitted;
        playback.emitted = target;
        if t >= 1.0 {
            self.playback = None;
        }
        delta
    }

    pub fn is_animating(&self) -> bool {
        self.playback.is_some()
    }

    pub fn target_position(&self) -> Option<usize> {
        self.playback.as_ref().map(|p| p.request.target_position)
    }
}
