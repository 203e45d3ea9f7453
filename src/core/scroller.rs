//! Duration math for linear smooth scrolls.
//!
//! A scroll of `dx` pixels takes `|dx| * millis_per_inch / dpi` milliseconds
//! at constant speed.  Ending on a decelerate curve stretches that by the
//! inverse of the curve's initial slope, so the animation starts at the same
//! speed and slows into the target.

use std::time::Duration;

/// Ratio between decelerated and linear scroll time for the same distance.
const DECELERATION_RATIO: f32 = 0.3356;

/// Speed of the layout manager's own smooth scroll.
pub const DEFAULT_MILLIS_PER_INCH: f32 = 25.0;

/// Snap scrolls run slower per inch but are capped in length.
pub const SNAP_MILLIS_PER_INCH: f32 = 100.0;
pub const SNAP_MAX_SCROLL_MILLIS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScroller {
    pub millis_per_inch: f32,
    /// Upper bound applied to the linear part of the animation.
    pub max_scroll_millis: Option<u32>,
}

impl Default for LinearScroller {
    fn default() -> Self {
        Self {
            millis_per_inch: DEFAULT_MILLIS_PER_INCH,
            max_scroll_millis: None,
        }
    }
}

impl LinearScroller {
    /// The scroller used when snapping to a page.
    pub fn snap() -> Self {
        Self {
            millis_per_inch: SNAP_MILLIS_PER_INCH,
            max_scroll_millis: Some(SNAP_MAX_SCROLL_MILLIS),
        }
    }

    fn speed_per_pixel(&self, density_dpi: f32) -> f32 {
        if density_dpi > 0.0 {
            self.millis_per_inch / density_dpi
        } else {
            self.millis_per_inch / super::host::DEFAULT_DENSITY_DPI
        }
    }

    /// Milliseconds to travel `dx` pixels at constant speed.
    pub fn time_for_scrolling(&self, dx: i32, density_dpi: f32) -> u32 {
        let millis = (dx.unsigned_abs() as f32 * self.speed_per_pixel(density_dpi)).ceil() as u32;
        match self.max_scroll_millis {
            Some(max) => millis.min(max),
            None => millis,
        }
    }

    /// Milliseconds for a scroll of `dx` that decelerates into its target.
    pub fn time_for_deceleration(&self, dx: i32, density_dpi: f32) -> u32 {
        (self.time_for_scrolling(dx, density_dpi) as f32 / DECELERATION_RATIO).ceil() as u32
    }

    pub fn deceleration_duration(&self, dx: i32, density_dpi: f32) -> Duration {
        Duration::from_millis(u64::from(self.time_for_deceleration(dx, density_dpi)))
    }
}
