//! Card-stack layout manager.
//!
//! The first attached child (the *base*) is pinned at the top of the list and
//! shrinks while the second child (the *incoming* card) slides up over it.
//! Once the incoming card covers the base completely, the base is recycled
//! and the window advances by one item.  A third child (the *lookahead*) is
//! attached lazily below the incoming card so it never pops in.
//!
//! `scroll_offset` tracks how far the incoming card has advanced over the
//! base, so `incoming.top == base.bottom - scroll_offset` holds whenever the
//! window is at rest between scroll calls.  It is `0` when the base is fully
//! exposed and equals the base height in the tail state, where the last two
//! items are attached and the last one covers the second-to-last.

use std::any::Any;
use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, trace, warn};

use super::geometry::ViewRect;
use super::host::{LayoutHost, SmoothScrollRequest};
use super::manager::{ChildSnapshot, LayoutManager, ScrollVector};
use super::scroller::LinearScroller;

/// Full collapse: the base shrinks to nothing once it is fully covered.
pub const DEFAULT_SCALE_FACTOR: f32 = 1.0;

/// Base, incoming and lookahead.
const MAX_ATTACHED: usize = 3;

#[derive(Debug, Clone, Copy)]
struct AttachedView<V> {
    view: V,
    position: usize,
    rect: ViewRect,
    scale: f32,
}

pub struct StackLayoutManager<V> {
    /// Adapter position of the base child.
    first_position: usize,
    scroll_offset: f32,
    bottom_offset: i32,
    scale_factor: f32,
    children: VecDeque<AttachedView<V>>,
}

impl<V> fmt::Debug for StackLayoutManager<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackLayoutManager")
            .field("first_position", &self.first_position)
            .field("scroll_offset", &self.scroll_offset)
            .field("bottom_offset", &self.bottom_offset)
            .field("scale_factor", &self.scale_factor)
            .field("child_count", &self.children.len())
            .finish()
    }
}

impl<V> Default for StackLayoutManager<V> {
    fn default() -> Self {
        Self {
            first_position: 0,
            scroll_offset: 0.0,
            bottom_offset: 0,
            scale_factor: DEFAULT_SCALE_FACTOR,
            children: VecDeque::with_capacity(MAX_ATTACHED + 1),
        }
    }
}

fn saturate(distance: i64) -> i32 {
    distance.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl<V> StackLayoutManager<V>
where
    V: Copy + Eq + fmt::Debug + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scale_factor(mut self, scale_factor: f32) -> Self {
        self.set_scale_factor(scale_factor);
        self
    }

    pub fn with_bottom_offset(mut self, bottom_offset: i32) -> Self {
        self.set_bottom_offset(bottom_offset);
        self
    }

    /// Values outside `[0, 1]` fall back to [`DEFAULT_SCALE_FACTOR`].
    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        self.scale_factor = if (0.0..=1.0).contains(&scale_factor) {
            scale_factor
        } else {
            warn!(scale_factor, "scale factor outside [0, 1], using default");
            DEFAULT_SCALE_FACTOR
        };
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    /// Pixels kept free below every card.  Takes effect on the next layout.
    pub fn set_bottom_offset(&mut self, bottom_offset: i32) {
        self.bottom_offset = bottom_offset.max(0);
    }

    pub fn bottom_offset(&self) -> i32 {
        self.bottom_offset
    }

    pub fn first_position(&self) -> usize {
        self.first_position
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn child_at(&self, index: usize) -> Option<ChildSnapshot> {
        self.children.get(index).map(|child| ChildSnapshot {
            position: child.position,
            rect: child.rect,
            scale: child.scale,
        })
    }

    /// `-1` when `target` lies before the base, `1` otherwise.
    pub fn compute_scroll_vector_for_position(&self, target: usize) -> Option<ScrollVector> {
        let first = self.children.front()?;
        Some(if target < first.position { -1 } else { 1 })
    }

    /// Scale of the base child once the incoming one has advanced `offset` pixels.
    fn scale_at(&self, offset: f32, base_height: i32) -> f32 {
        if base_height <= 0 {
            return 1.0;
        }
        1.0 - (offset * self.scale_factor).abs() / base_height as f32
    }

    fn item_height<H: LayoutHost<View = V>>(&self, host: &H) -> i32 {
        (host.viewport_height() - self.bottom_offset).max(0)
    }

    /// Fetch, attach, measure and place the view for `position` with its top at `top`.
    fn add_view<H: LayoutHost<View = V>>(
        &mut self,
        host: &mut H,
        position: usize,
        top: i32,
        at_front: bool,
    ) -> AttachedView<V> {
        let width = host.viewport_width();
        let height = self.item_height(host);
        let view = host.view_for(position);
        host.attach_view(view, at_front);
        let size = host.measure(view, width, height);
        let rect = ViewRect::at_top(top, size);
        host.position_view(view, rect);
        host.set_scale(view, 1.0);

        let child = AttachedView {
            view,
            position,
            rect,
            scale: 1.0,
        };
        if at_front {
            self.children.push_front(child);
        } else {
            self.children.push_back(child);
        }
        debug!(position, top, at_front, "attached child");
        child
    }

    fn recycle_at<H: LayoutHost<View = V>>(&mut self, index: usize, host: &mut H) {
        if let Some(child) = self.children.remove(index) {
            debug!(position = child.position, index, "recycled child");
            host.recycle_view(child.view);
        }
    }

    fn recycle_all<H: LayoutHost<View = V>>(&mut self, host: &mut H) {
        while let Some(child) = self.children.pop_front() {
            host.recycle_view(child.view);
        }
    }

    /// Shift every child except the base.
    fn offset_children<H: LayoutHost<View = V>>(&mut self, delta: i32, host: &mut H) {
        for child in self.children.iter_mut().skip(1) {
            child.rect.offset_top_and_bottom(delta);
            host.position_view(child.view, child.rect);
        }
    }

    fn set_child_scale<H: LayoutHost<View = V>>(&mut self, index: usize, scale: f32, host: &mut H) {
        if let Some(child) = self.children.get_mut(index) {
            child.scale = scale;
            host.set_scale(child.view, scale);
        }
    }

    /// Put the item before the base underneath it as the new base.
    fn insert_first_view<H: LayoutHost<View = V>>(&mut self, scale: f32, host: &mut H) {
        let Some(position) = self.first_position.checked_sub(1) else {
            return;
        };
        // The old base becomes the incoming card and is drawn unscaled.
        self.set_child_scale(0, 1.0, host);
        self.add_view(host, position, 0, true);
        self.first_position = position;
        self.set_child_scale(0, scale, host);
    }

    /// Only the last item is attached: a backward scroll brings the previous
    /// one back underneath it.
    fn reveal_previous<H: LayoutHost<View = V>>(
        &mut self,
        dy: i32,
        item_count: usize,
        base_height: i32,
        host: &mut H,
    ) -> i32 {
        if dy >= 0 || self.first_position + 1 != item_count || self.first_position == 0 {
            return 0;
        }
        let delta = (-dy).min(base_height);
        self.scroll_offset = (base_height - delta) as f32;
        let scale = self.scale_at(self.scroll_offset, base_height);
        self.insert_first_view(scale, host);
        self.offset_children(delta, host);
        -delta
    }

    /// Exact scroll distance from the current window to resting on `target`.
    fn distance_to(&self, target: usize) -> Option<i32> {
        let base = self.children.front()?;
        let height = base.rect.height();
        let cards = |count: usize| (count as i64).saturating_mul(i64::from(height));
        let Some(incoming) = self.children.get(1) else {
            return Some(saturate(-cards(base.position.saturating_sub(target))));
        };
        let overlap = i64::from(base.rect.bottom - incoming.rect.top);
        let distance = if target == base.position {
            -overlap
        } else if target > base.position {
            i64::from(incoming.rect.top).saturating_add(cards(target - base.position - 1))
        } else {
            -overlap.saturating_add(cards(base.position - target))
        };
        Some(saturate(distance))
    }

    /// A backward re-insert can leave the incoming card resting on top of
    /// the base.  Before moving forward again the covered base is recycled,
    /// unless it is the second-to-last item.
    fn release_covered_base<H: LayoutHost<View = V>>(&mut self, item_count: usize, host: &mut H) {
        let covered = self.children.get(1).is_some_and(|incoming| incoming.rect.top == 0);
        if covered && self.first_position + 2 < item_count {
            self.recycle_at(0, host);
            self.first_position += 1;
            self.scroll_offset = 0.0;
        }
    }

    fn scroll_by<H: LayoutHost<View = V>>(&mut self, dy: i32, host: &mut H) -> i32 {
        let item_count = host.item_count();
        if item_count < 2 || dy == 0 {
            return 0;
        }
        let Some(first) = self.children.front() else {
            return 0;
        };
        let base_height = first.rect.height();
        if base_height <= 0 {
            return 0;
        }
        let height = base_height as f32;

        if self.children.len() < 2 {
            return self.reveal_previous(dy, item_count, base_height, host);
        }
        if dy > 0 {
            self.release_covered_base(item_count, host);
        }
        let base = self.children[0];

        let mut delta = -dy;

        if self.children.len() == 2 {
            let incoming = self.children[1];
            if incoming.position + 1 < item_count {
                self.add_view(host, incoming.position + 1, incoming.rect.bottom, false);
            }
        }

        let incoming_top = self.children[1].rect.top;
        let projected_top = incoming_top + delta;
        let mut offset = (self.scroll_offset + dy as f32).rem_euclid(height);

        let base_is_second_to_last = self.first_position + 2 == item_count;
        let mut insert_previous = false;
        let scale = if dy > 0 {
            if projected_top <= 0 {
                // The incoming card stops exactly at the top.
                delta = -incoming_top;
                offset = if base_is_second_to_last { height } else { 0.0 };
            }
            self.scale_at(offset, base_height)
        } else if projected_top > base.rect.bottom {
            // Close the gap instead of separating the cards.
            delta = base.rect.bottom - incoming_top;
            if self.first_position != 0 {
                insert_previous = true;
                offset = height;
            } else {
                offset = 0.0;
            }
            1.0
        } else {
            self.scale_at(offset, base_height)
        };

        if delta == 0 && !insert_previous {
            return 0;
        }
        self.scroll_offset = offset;

        self.offset_children(delta, host);
        self.set_child_scale(0, scale, host);

        let mut consumed = -delta;
        if insert_previous {
            let scale = self.scale_at(height, base_height);
            self.insert_first_view(scale, host);
            while self.children.len() > MAX_ATTACHED {
                self.recycle_at(MAX_ATTACHED, host);
            }
            // Keep moving: the re-inserted card is uncovered by at most one
            // card height in this call.
            let rest = (dy - consumed).max(-base_height);
            if rest < 0 {
                consumed += self.scroll_by(rest, host);
            }
        } else if self.children[1].rect.top == 0 && !base_is_second_to_last {
            self.recycle_at(0, host);
            self.first_position += 1;
        }

        trace!(
            dy,
            consumed,
            first_position = self.first_position,
            scroll_offset = self.scroll_offset,
            children = self.children.len(),
            "scrolled"
        );
        consumed
    }
}

impl<V, H> LayoutManager<H> for StackLayoutManager<V>
where
    V: Copy + Eq + fmt::Debug + 'static,
    H: LayoutHost<View = V>,
{
    fn on_layout_children(&mut self, host: &mut H) {
        self.recycle_all(host);
        self.scroll_offset = 0.0;

        let item_count = host.item_count();
        if item_count == 0 {
            self.first_position = 0;
            debug!("layout: no items");
            return;
        }
        if item_count == 1 {
            self.first_position = 0;
            self.add_view(host, 0, 0, false);
            debug!("layout: single item");
            return;
        }

        self.first_position = self.first_position.min(item_count - 1);
        let at_tail = self.first_position == item_count - 1;
        if at_tail {
            self.first_position = item_count - 2;
        }

        let base = self.add_view(host, self.first_position, 0, false);
        let base_height = base.rect.height();
        if at_tail {
            self.scroll_offset = base_height as f32;
        }
        self.add_view(
            host,
            self.first_position + 1,
            base.rect.bottom - self.scroll_offset as i32,
            false,
        );
        let scale = self.scale_at(self.scroll_offset, base_height);
        self.set_child_scale(0, scale, host);

        debug!(
            first_position = self.first_position,
            scroll_offset = self.scroll_offset,
            at_tail,
            "layout"
        );
    }

    fn can_scroll_vertically(&self) -> bool {
        true
    }

    fn scroll_vertically_by(&mut self, dy: i32, host: &mut H) -> i32 {
        self.scroll_by(dy, host)
    }

    fn scroll_to_position(&mut self, position: usize, host: &mut H) {
        debug!(position, "scroll to position");
        self.first_position = position;
        self.scroll_offset = 0.0;
        self.recycle_all(host);
    }

    fn smooth_scroll_to_position(&mut self, position: usize, host: &mut H) {
        let item_count = host.item_count();
        if item_count == 0 {
            return;
        }
        let target = position.min(item_count - 1);
        let Some(dy) = self.distance_to(target) else {
            debug!(target, "smooth scroll without attached children");
            return;
        };
        let duration = LinearScroller::default().deceleration_duration(dy, host.density_dpi());
        debug!(target, dy, ?duration, "smooth scroll to position");
        host.start_smooth_scroll(SmoothScrollRequest {
            target_position: target,
            dy,
            duration,
        });
    }

    fn compute_scroll_vector_for_position(&self, target: usize) -> Option<ScrollVector> {
        StackLayoutManager::compute_scroll_vector_for_position(self, target)
    }

    fn on_items_changed(&mut self, host: &mut H) {
        self.scroll_to_position(0, host);
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child_at(&self, index: usize) -> Option<ChildSnapshot> {
        StackLayoutManager::child_at(self, index)
    }

    fn bottom_inset(&self) -> i32 {
        self.bottom_offset
    }

    fn name(&self) -> &'static str {
        "StackLayoutManager"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
