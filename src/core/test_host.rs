//! Recording [`LayoutHost`] used by the unit tests.

use super::geometry::{Size, ViewRect};
use super::host::{LayoutHost, SmoothScrollRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FakeView(pub usize);

#[derive(Debug, Clone, Default)]
struct FakeViewState {
    position: Option<usize>,
    rect: ViewRect,
    scale: f32,
}

#[derive(Debug, Default)]
pub struct FakeHost {
    pub items: usize,
    pub width: i32,
    pub height: i32,
    views: Vec<FakeViewState>,
    attached: Vec<FakeView>,
    scrap: Vec<FakeView>,
    /// Adapter positions in the order their views were recycled.
    pub recycled: Vec<usize>,
    pub smooth_scrolls: Vec<SmoothScrollRequest>,
}

impl FakeHost {
    pub fn new(items: usize, width: i32, height: i32) -> Self {
        Self {
            items,
            width,
            height,
            ..Self::default()
        }
    }

    pub fn attached_positions(&self) -> Vec<usize> {
        self.attached
            .iter()
            .filter_map(|v| self.views[v.0].position)
            .collect()
    }

    pub fn attached_tops(&self) -> Vec<i32> {
        self.attached.iter().map(|v| self.views[v.0].rect.top).collect()
    }

    pub fn attached_scales(&self) -> Vec<f32> {
        self.attached.iter().map(|v| self.views[v.0].scale).collect()
    }

    /// Number of distinct views ever created (pool size).
    pub fn created(&self) -> usize {
        self.views.len()
    }
}

impl LayoutHost for FakeHost {
    type View = FakeView;

    fn item_count(&self) -> usize {
        self.items
    }

    fn view_for(&mut self, position: usize) -> FakeView {
        assert!(position < self.items, "view requested for {position} of {}", self.items);
        let view = self.scrap.pop().unwrap_or_else(|| {
            self.views.push(FakeViewState::default());
            FakeView(self.views.len() - 1)
        });
        self.views[view.0] = FakeViewState {
            position: Some(position),
            rect: ViewRect::default(),
            scale: 1.0,
        };
        view
    }

    fn attach_view(&mut self, view: FakeView, at_front: bool) {
        assert!(!self.attached.contains(&view), "{view:?} attached twice");
        if at_front {
            self.attached.insert(0, view);
        } else {
            self.attached.push(view);
        }
    }

    fn recycle_view(&mut self, view: FakeView) {
        let index = self
            .attached
            .iter()
            .position(|v| *v == view)
            .unwrap_or_else(|| panic!("{view:?} recycled while detached"));
        self.attached.remove(index);
        if let Some(position) = self.views[view.0].position.take() {
            self.recycled.push(position);
        }
        self.scrap.push(view);
    }

    fn measure(&mut self, _view: FakeView, width: i32, height: i32) -> Size {
        Size::new(width, height)
    }

    fn position_view(&mut self, view: FakeView, rect: ViewRect) {
        self.views[view.0].rect = rect;
    }

    fn set_scale(&mut self, view: FakeView, scale: f32) {
        self.views[view.0].scale = scale;
    }

    fn viewport_width(&self) -> i32 {
        self.width
    }

    fn viewport_height(&self) -> i32 {
        self.height
    }

    fn start_smooth_scroll(&mut self, request: SmoothScrollRequest) {
        self.smooth_scrolls.push(request);
    }
}
