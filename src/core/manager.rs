//! The layout-manager seam between a scrolling list and its layout policy.

use std::any::Any;

use super::geometry::ViewRect;
use super::host::LayoutHost;

/// Read-only view of an attached child, by draw order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildSnapshot {
    /// Adapter position the child is bound to.
    pub position: usize,
    pub rect: ViewRect,
    pub scale: f32,
}

/// Scroll direction towards a target position: `-1` back, `1` forward.
pub type ScrollVector = i32;

pub trait LayoutManager<H: LayoutHost>: Any {
    /// Rebuild the attached children from scratch.
    fn on_layout_children(&mut self, host: &mut H);

    fn can_scroll_vertically(&self) -> bool;

    /// Apply a vertical scroll of `dy` pixels and return the part consumed.
    fn scroll_vertically_by(&mut self, dy: i32, host: &mut H) -> i32;

    /// Jump to `position`.  The caller must run a layout pass afterwards.
    fn scroll_to_position(&mut self, position: usize, host: &mut H);

    /// Ask the host to animate towards `position`.
    fn smooth_scroll_to_position(&mut self, position: usize, host: &mut H);

    fn compute_scroll_vector_for_position(&self, target: usize) -> Option<ScrollVector>;

    /// The adapter contents changed.  The caller must run a layout pass afterwards.
    fn on_items_changed(&mut self, host: &mut H);

    fn child_count(&self) -> usize;

    fn child_at(&self, index: usize) -> Option<ChildSnapshot>;

    /// Adapter position of the first attached child.
    fn first_visible_position(&self) -> Option<usize> {
        self.child_at(0).map(|child| child.position)
    }

    /// Pixels reserved below each child.
    fn bottom_inset(&self) -> i32 {
        0
    }

    /// Type name used in diagnostics.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn as_any(&self) -> &dyn Any;
}
