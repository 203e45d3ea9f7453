//! The capability surface a list host offers to its layout manager.
//!
//! The host owns the item collection, the view pool and the drawing
//! pipeline.  A layout manager only ever talks to it through [`LayoutHost`]:
//! it asks for a view bound to an adapter position, attaches it, measures and
//! positions it, and hands it back through [`LayoutHost::recycle_view`] once it
//! leaves the window.  View handles must not be used after they are recycled.

use std::fmt;
use std::time::Duration;

use super::geometry::{Size, ViewRect};

/// Screen density assumed when a host does not report one.
pub const DEFAULT_DENSITY_DPI: f32 = 160.0;

/// An animated scroll the host should play back as a series of scroll deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmoothScrollRequest {
    /// Adapter position that ends up as the resting first item.
    pub target_position: usize,
    /// Total vertical distance in pixels; positive scrolls content up.
    pub dy: i32,
    /// Suggested duration of the whole animation.
    pub duration: Duration,
}

pub trait LayoutHost: 'static {
    /// Opaque handle to a host view.
    type View: Copy + Eq + fmt::Debug + 'static;

    /// Number of items currently in the adapter.
    fn item_count(&self) -> usize;

    /// Obtain a view bound to `position`, reused from the pool when possible.
    fn view_for(&mut self, position: usize) -> Self::View;

    /// Add a view to the attached set, as the first child or appended.
    fn attach_view(&mut self, view: Self::View, at_front: bool);

    /// Detach a view and return it to the pool.
    fn recycle_view(&mut self, view: Self::View);

    /// Measure a view against exact width/height constraints.
    fn measure(&mut self, view: Self::View, width: i32, height: i32) -> Size;

    /// Place an already measured view.
    fn position_view(&mut self, view: Self::View, rect: ViewRect);

    /// Apply a uniform X/Y scale about the view's centre.
    fn set_scale(&mut self, view: Self::View, scale: f32);

    fn viewport_width(&self) -> i32;

    fn viewport_height(&self) -> i32;

    /// Hand an animated scroll to the host's animation primitive.
    fn start_smooth_scroll(&mut self, request: SmoothScrollRequest);

    /// Pixels per inch, used to derive smooth-scroll durations.
    fn density_dpi(&self) -> f32 {
        DEFAULT_DENSITY_DPI
    }
}
