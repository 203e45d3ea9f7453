//! A minimal scrolling list: the glue between a host, its layout manager
//! and an optional snap helper.
//!
//! The list defers layout until [`ScrollingList::layout_if_needed`] is
//! called, so a jump or data change followed by several scroll events only
//! lays out once.

use tracing::{debug, trace};

use super::error::SnapError;
use super::host::LayoutHost;
use super::manager::LayoutManager;
use super::snap::SnapHelper;

/// Flings slower than this (pixels per second) are treated as a release.
pub const DEFAULT_MIN_FLING_VELOCITY: i32 = 50;

/// Upper bound on manager calls per scroll, so a manager that keeps
/// reshaping its window without consuming can never spin.
const MAX_SCROLL_PASSES: usize = 64;

pub struct ScrollingList<H: LayoutHost> {
    host: H,
    manager: Box<dyn LayoutManager<H>>,
    snap_helper: Option<Box<dyn SnapHelper<H>>>,
    needs_layout: bool,
    min_fling_velocity: i32,
}

impl<H: LayoutHost> ScrollingList<H> {
    pub fn new(host: H, manager: Box<dyn LayoutManager<H>>) -> Self {
        Self {
            host,
            manager,
            snap_helper: None,
            needs_layout: true,
            min_fling_velocity: DEFAULT_MIN_FLING_VELOCITY,
        }
    }

    /// Install a snap helper.  The helper may refuse the current layout manager.
    pub fn set_snap_helper(&mut self, mut helper: Box<dyn SnapHelper<H>>) -> Result<(), SnapError> {
        helper.attach(self.manager.as_ref())?;
        self.snap_helper = Some(helper);
        Ok(())
    }

    pub fn set_min_fling_velocity(&mut self, velocity: i32) {
        self.min_fling_velocity = velocity.max(0);
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn manager(&self) -> &dyn LayoutManager<H> {
        self.manager.as_ref()
    }

    /// Mutable access to the manager.  Any change to its configuration
    /// should be followed by [`ScrollingList::request_layout`].
    pub fn manager_mut(&mut self) -> &mut dyn LayoutManager<H> {
        self.manager.as_mut()
    }

    pub fn request_layout(&mut self) {
        self.needs_layout = true;
    }

    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    /// Run the pending layout pass, if any.  Returns whether one ran.
    pub fn layout_if_needed(&mut self) -> bool {
        if !self.needs_layout {
            return false;
        }
        self.needs_layout = false;
        self.manager.on_layout_children(&mut self.host);
        debug!(children = self.manager.child_count(), "layout pass");
        true
    }

    /// The viewport changed size.
    pub fn on_size_changed(&mut self) {
        self.request_layout();
    }

    pub fn notify_data_set_changed(&mut self) {
        self.manager.on_items_changed(&mut self.host);
        self.request_layout();
    }

    pub fn scroll_to_position(&mut self, position: usize) {
        self.manager.scroll_to_position(position, &mut self.host);
        self.request_layout();
    }

    pub fn smooth_scroll_to_position(&mut self, position: usize) {
        self.layout_if_needed();
        self.manager.smooth_scroll_to_position(position, &mut self.host);
    }

    fn window_signature(&self) -> (Option<usize>, usize) {
        (self.manager.first_visible_position(), self.manager.child_count())
    }

    /// Scroll by `dy`, carrying whatever a card boundary leaves over into the
    /// next card.  Returns the distance actually scrolled.
    pub fn scroll_by(&mut self, dy: i32) -> i32 {
        self.layout_if_needed();
        if dy == 0 || !self.manager.can_scroll_vertically() {
            return 0;
        }

        let mut remaining = dy;
        let mut consumed_total = 0;
        for _ in 0..MAX_SCROLL_PASSES {
            let before = self.window_signature();
            let consumed = self.manager.scroll_vertically_by(remaining, &mut self.host);
            consumed_total += consumed;
            remaining -= consumed;
            if remaining == 0 || (consumed == 0 && self.window_signature() == before) {
                break;
            }
        }
        trace!(dy, consumed = consumed_total, "list scrolled");
        consumed_total
    }

    /// Hand a fling to the snap helper.  Returns whether a snap scroll started.
    pub fn fling(&mut self, velocity_y: i32) -> bool {
        self.layout_if_needed();
        if velocity_y.abs() < self.min_fling_velocity {
            return false;
        }
        let Some(helper) = self.snap_helper.as_ref() else {
            return false;
        };
        let manager = self.manager.as_ref();
        let Some(position) = helper.find_target_snap_position(manager, velocity_y) else {
            return false;
        };
        let target = (0..manager.child_count())
            .filter_map(|index| manager.child_at(index))
            .find(|child| child.position == position);
        let Some(target) = target else {
            return false;
        };
        match helper.snap_request(manager, &self.host, &target) {
            Some(request) => {
                debug!(velocity_y, ?request, "fling snap");
                self.host.start_smooth_scroll(request);
                true
            }
            None => false,
        }
    }

    /// Scrolling stopped: snap onto the nearest resting card.
    pub fn settle(&mut self) -> bool {
        self.layout_if_needed();
        let Some(helper) = self.snap_helper.as_ref() else {
            return false;
        };
        let manager = self.manager.as_ref();
        let Some(target) = helper.find_snap_view(manager, &self.host) else {
            return false;
        };
        match helper.snap_request(manager, &self.host, &target) {
            Some(request) => {
                debug!(?request, "settle snap");
                self.host.start_smooth_scroll(request);
                true
            }
            None => false,
        }
    }
}
