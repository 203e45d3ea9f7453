//! Page snapping for the card stack.
//!
//! When a drag or fling ends mid-transition the list settles on one of the
//! first two children: back onto the base if the incoming card has travelled
//! less than half the viewport, forward onto the incoming card otherwise.
//! The snap distance is exact, so the resting state always has the incoming
//! card either at the base's bottom edge or at the very top.

use tracing::debug;

use super::error::SnapError;
use super::host::{LayoutHost, SmoothScrollRequest};
use super::manager::{ChildSnapshot, LayoutManager};
use super::scroller::LinearScroller;
use super::stack_layout::StackLayoutManager;

pub trait SnapHelper<H: LayoutHost> {
    /// Called when the helper is installed on a list.
    fn attach(&mut self, manager: &dyn LayoutManager<H>) -> Result<(), SnapError>;

    /// The child the list should come to rest on.
    fn find_snap_view(&self, manager: &dyn LayoutManager<H>, host: &H) -> Option<ChildSnapshot>;

    /// Vertical distance that brings `target` to its resting place.
    fn calculate_distance_to_final_snap(
        &self,
        manager: &dyn LayoutManager<H>,
        host: &H,
        target: &ChildSnapshot,
    ) -> i32;

    /// Adapter position to settle on after a fling with `velocity_y`.
    fn find_target_snap_position(
        &self,
        manager: &dyn LayoutManager<H>,
        velocity_y: i32,
    ) -> Option<usize>;

    fn scroller(&self) -> LinearScroller {
        LinearScroller::snap()
    }

    /// Build the animated scroll that lands on `target`, if any movement is left.
    fn snap_request(
        &self,
        manager: &dyn LayoutManager<H>,
        host: &H,
        target: &ChildSnapshot,
    ) -> Option<SmoothScrollRequest> {
        let dy = self.calculate_distance_to_final_snap(manager, host, target);
        let duration = self.scroller().deceleration_duration(dy, host.density_dpi());
        if duration.is_zero() {
            return None;
        }
        Some(SmoothScrollRequest {
            target_position: target.position,
            dy,
            duration,
        })
    }
}

fn snap_child<H: LayoutHost>(manager: &dyn LayoutManager<H>, host: &H) -> Option<ChildSnapshot> {
    let base = manager.child_at(0)?;
    let incoming = manager.child_at(1)?;
    if incoming.rect.top > host.viewport_height() / 2 {
        Some(base)
    } else {
        Some(incoming)
    }
}

fn distance_to_final_snap<H: LayoutHost>(
    manager: &dyn LayoutManager<H>,
    host: &H,
    target: &ChildSnapshot,
) -> i32 {
    let Some(base) = manager.child_at(0) else {
        return 0;
    };
    if target.position != base.position {
        return target.rect.top;
    }
    match manager.child_at(1) {
        Some(incoming) => {
            -(host.viewport_height() - manager.bottom_inset() - incoming.rect.top)
        }
        None => 0,
    }
}

fn fling_target<H: LayoutHost>(manager: &dyn LayoutManager<H>, velocity_y: i32) -> Option<usize> {
    let base = manager.child_at(0)?;
    let incoming = manager.child_at(1)?;
    let forward = velocity_y > 0;
    Some(if forward { incoming.position } else { base.position })
}

/// Pager-style snapping bound to [`StackLayoutManager`].
///
/// Any other layout manager is refused at attach time: the snap distances
/// assume the stack's geometry and would be wrong elsewhere.
#[derive(Debug, Default)]
pub struct StackPagerSnapHelper {
    attached: bool,
}

impl StackPagerSnapHelper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

impl<H: LayoutHost> SnapHelper<H> for StackPagerSnapHelper {
    fn attach(&mut self, manager: &dyn LayoutManager<H>) -> Result<(), SnapError> {
        if !manager.as_any().is::<StackLayoutManager<H::View>>() {
            self.attached = false;
            return Err(SnapError::IncompatibleLayoutManager {
                helper: "StackPagerSnapHelper",
                found: manager.name(),
            });
        }
        self.attached = true;
        debug!("stack pager snap helper attached");
        Ok(())
    }

    fn find_snap_view(&self, manager: &dyn LayoutManager<H>, host: &H) -> Option<ChildSnapshot> {
        snap_child(manager, host)
    }

    fn calculate_distance_to_final_snap(
        &self,
        manager: &dyn LayoutManager<H>,
        host: &H,
        target: &ChildSnapshot,
    ) -> i32 {
        distance_to_final_snap(manager, host, target)
    }

    fn find_target_snap_position(
        &self,
        manager: &dyn LayoutManager<H>,
        velocity_y: i32,
    ) -> Option<usize> {
        fling_target(manager, velocity_y)
    }
}

/// The same paging rules without the layout-manager check.
///
/// Works page by page with any manager that lays its children out
/// top-aligned; each page is aligned to the top of the list.
#[derive(Debug, Default)]
pub struct SmartPagerSnapHelper;

impl<H: LayoutHost> SnapHelper<H> for SmartPagerSnapHelper {
    fn attach(&mut self, manager: &dyn LayoutManager<H>) -> Result<(), SnapError> {
        debug!(manager = manager.name(), "smart pager snap helper attached");
        Ok(())
    }

    fn find_snap_view(&self, manager: &dyn LayoutManager<H>, host: &H) -> Option<ChildSnapshot> {
        snap_child(manager, host)
    }

    fn calculate_distance_to_final_snap(
        &self,
        manager: &dyn LayoutManager<H>,
        host: &H,
        target: &ChildSnapshot,
    ) -> i32 {
        distance_to_final_snap(manager, host, target)
    }

    fn find_target_snap_position(
        &self,
        manager: &dyn LayoutManager<H>,
        velocity_y: i32,
    ) -> Option<usize> {
        fling_target(manager, velocity_y)
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use super::*;
    use crate::core::geometry::ViewRect;
    use crate::core::test_host::{FakeHost, FakeView};

    const HEIGHT: i32 = 100;

    /// Plain top-to-bottom column, one child per viewport height.
    #[derive(Default)]
    struct ColumnLayout {
        children: Vec<ChildSnapshot>,
    }

    impl LayoutManager<FakeHost> for ColumnLayout {
        fn on_layout_children(&mut self, host: &mut FakeHost) {
            self.children = (0..host.items.min(3))
                .map(|position| ChildSnapshot {
                    position,
                    rect: ViewRect::new(0, position as i32 * HEIGHT, 40, (position as i32 + 1) * HEIGHT),
                    scale: 1.0,
                })
                .collect();
        }
        fn can_scroll_vertically(&self) -> bool {
            true
        }
        fn scroll_vertically_by(&mut self, _dy: i32, _host: &mut FakeHost) -> i32 {
            0
        }
        fn scroll_to_position(&mut self, _position: usize, _host: &mut FakeHost) {}
        fn smooth_scroll_to_position(&mut self, _position: usize, _host: &mut FakeHost) {}
        fn compute_scroll_vector_for_position(&self, _target: usize) -> Option<i32> {
            None
        }
        fn on_items_changed(&mut self, _host: &mut FakeHost) {}
        fn child_count(&self) -> usize {
            self.children.len()
        }
        fn child_at(&self, index: usize) -> Option<ChildSnapshot> {
            self.children.get(index).copied()
        }
        fn name(&self) -> &'static str {
            "ColumnLayout"
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn stack(items: usize, bottom_offset: i32) -> (StackLayoutManager<FakeView>, FakeHost) {
        let mut host = FakeHost::new(items, 40, HEIGHT);
        let mut manager = StackLayoutManager::new()
            .with_scale_factor(0.5)
            .with_bottom_offset(bottom_offset);
        manager.on_layout_children(&mut host);
        (manager, host)
    }

    fn helper() -> Box<dyn SnapHelper<FakeHost>> {
        Box::new(StackPagerSnapHelper::new())
    }

    #[test]
    fn snaps_back_while_incoming_is_in_lower_half() {
        let (mut manager, mut host) = stack(10, 0);
        manager.scroll_vertically_by(40, &mut host);
        let manager: &dyn LayoutManager<FakeHost> = &manager;

        let target = helper().find_snap_view(manager, &host).expect("snap view");
        assert_eq!(target.position, 0);
        assert_eq!(helper().calculate_distance_to_final_snap(manager, &host, &target), -40);
    }

    #[test]
    fn snaps_forward_once_incoming_passes_half() {
        let (mut manager, mut host) = stack(10, 0);
        manager.scroll_vertically_by(60, &mut host);
        let manager: &dyn LayoutManager<FakeHost> = &manager;

        let target = helper().find_snap_view(manager, &host).expect("snap view");
        assert_eq!(target.position, 1);
        assert_eq!(helper().calculate_distance_to_final_snap(manager, &host, &target), 40);
    }

    #[test]
    fn distance_back_accounts_for_bottom_offset() {
        let (mut manager, mut host) = stack(10, 20);
        manager.scroll_vertically_by(30, &mut host);
        let incoming_top = manager.child_at(1).map(|c| c.rect.top);
        assert_eq!(incoming_top, Some(50));
        let manager: &dyn LayoutManager<FakeHost> = &manager;

        // Exactly half way still counts as forward.
        let target = helper().find_snap_view(manager, &host).expect("snap view");
        assert_eq!(target.position, 1);
        let base = manager.child_at(0).expect("base");
        assert_eq!(helper().calculate_distance_to_final_snap(manager, &host, &base), -30);
    }

    #[test]
    fn fling_direction_picks_target() {
        let (manager, _host) = stack(10, 0);
        let manager: &dyn LayoutManager<FakeHost> = &manager;
        assert_eq!(helper().find_target_snap_position(manager, 800), Some(1));
        assert_eq!(helper().find_target_snap_position(manager, -800), Some(0));
        assert_eq!(helper().find_target_snap_position(manager, 0), Some(0));
    }

    #[test]
    fn no_target_with_fewer_than_two_children() {
        let (manager, host) = stack(1, 0);
        let manager: &dyn LayoutManager<FakeHost> = &manager;
        assert_eq!(helper().find_target_snap_position(manager, 800), None);
        assert_eq!(helper().find_snap_view(manager, &host), None);
    }

    #[test]
    fn snap_request_uses_capped_snap_timing() {
        let (mut manager, mut host) = stack(10, 0);
        manager.scroll_vertically_by(70, &mut host);
        let manager: &dyn LayoutManager<FakeHost> = &manager;
        let helper = helper();
        let target = helper.find_snap_view(manager, &host).expect("snap view");
        let request = helper.snap_request(manager, &host, &target).expect("request");
        assert_eq!(request.target_position, 1);
        assert_eq!(request.dy, 30);
        assert_eq!(
            request.duration,
            LinearScroller::snap().deceleration_duration(30, host.density_dpi())
        );
    }

    #[test]
    fn settled_window_needs_no_snap() {
        let (manager, host) = stack(10, 0);
        let manager: &dyn LayoutManager<FakeHost> = &manager;
        let helper = helper();
        let target = helper.find_snap_view(manager, &host).expect("snap view");
        assert_eq!(target.position, 0);
        assert_eq!(helper.snap_request(manager, &host, &target), None);
    }

    #[test]
    fn stack_helper_rejects_other_layout_managers() {
        let mut helper = StackPagerSnapHelper::new();
        let column = ColumnLayout::default();
        let err = SnapHelper::<FakeHost>::attach(&mut helper, &column).unwrap_err();
        assert_eq!(
            err,
            SnapError::IncompatibleLayoutManager {
                helper: "StackPagerSnapHelper",
                found: "ColumnLayout",
            }
        );
        assert!(err.to_string().contains("can only be used with StackLayoutManager"));
        assert!(!helper.is_attached());

        let (manager, _host) = stack(3, 0);
        assert!(SnapHelper::<FakeHost>::attach(&mut helper, &manager).is_ok());
        assert!(helper.is_attached());
    }

    #[test]
    fn smart_helper_pages_any_layout_manager() {
        let mut host = FakeHost::new(5, 40, HEIGHT);
        let mut column = ColumnLayout::default();
        column.on_layout_children(&mut host);
        let mut helper = SmartPagerSnapHelper;
        assert!(SnapHelper::<FakeHost>::attach(&mut helper, &column).is_ok());

        let manager: &dyn LayoutManager<FakeHost> = &column;
        let target = helper.find_snap_view(manager, &host).expect("snap view");
        assert_eq!(target.position, 0);
        let next = manager.child_at(1).expect("second page");
        assert_eq!(helper.calculate_distance_to_final_snap(manager, &host, &next), HEIGHT);
    }
}
