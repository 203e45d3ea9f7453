//! Terminal-side [`LayoutHost`]: a pool of card views measured in cells.
//!
//! Views are plain indices into `views`.  Attached order is draw order, so
//! the card that slides in over the base is painted after it.

use card_stack::core::{LayoutHost, Size, SmoothScrollRequest, ViewRect};
use tracing::trace;

use super::cards::{Card, CardsAdapter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(usize);

#[derive(Debug, Clone, Default)]
struct CardView {
    position: Option<usize>,
    rect: ViewRect,
    scale: f32,
}

/// An attached card, resolved for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedCard<'a> {
    pub position: usize,
    pub rect: ViewRect,
    pub scale: f32,
    pub card: &'a Card,
}

#[derive(Debug)]
pub struct DeckHost {
    cards: CardsAdapter,
    width: i32,
    height: i32,
    rows_per_inch: f32,
    views: Vec<CardView>,
    attached: Vec<ViewId>,
    scrap: Vec<ViewId>,
    pending_scroll: Option<SmoothScrollRequest>,
}

impl DeckHost {
    pub fn new(cards: CardsAdapter, rows_per_inch: f32) -> Self {
        Self {
            cards,
            width: 0,
            height: 0,
            rows_per_inch,
            views: Vec::new(),
            attached: Vec::new(),
            scrap: Vec::new(),
            pending_scroll: None,
        }
    }

    /// Update the viewport.  Returns `true` if the size changed.
    pub fn resize(&mut self, width: u16, height: u16) -> bool {
        let (width, height) = (i32::from(width), i32::from(height));
        if (width, height) == (self.width, self.height) {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    pub fn cards(&self) -> &CardsAdapter {
        &self.cards
    }

    pub fn take_smooth_scroll(&mut self) -> Option<SmoothScrollRequest> {
        self.pending_scroll.take()
    }

    pub fn placed_cards(&self) -> Vec<PlacedCard<'_>> {
        if self.cards.is_empty() {
            return Vec::new();
        }
        self.attached
            .iter()
            .filter_map(|id| {
                let view = &self.views[id.0];
                let position = view.position?;
                Some(PlacedCard {
                    position,
                    rect: view.rect,
                    scale: view.scale,
                    card: self.cards.get(position)?,
                })
            })
            .collect()
    }

    #[cfg(test)]
    pub fn pool_size(&self) -> usize {
        self.views.len()
    }
}

impl LayoutHost for DeckHost {
    type View = ViewId;

    fn item_count(&self) -> usize {
        self.cards.len()
    }

    fn view_for(&mut self, position: usize) -> ViewId {
        let id = match self.scrap.pop() {
            Some(id) => id,
            None => {
                self.views.push(CardView::default());
                ViewId(self.views.len() - 1)
            }
        };
        self.views[id.0] = CardView {
            position: Some(position),
            rect: ViewRect::default(),
            scale: 1.0,
        };
        id
    }

    fn attach_view(&mut self, view: ViewId, at_front: bool) {
        if at_front {
            self.attached.insert(0, view);
        } else {
            self.attached.push(view);
        }
    }

    fn recycle_view(&mut self, view: ViewId) {
        self.attached.retain(|id| *id != view);
        if let Some(state) = self.views.get_mut(view.0) {
            state.position = None;
        }
        self.scrap.push(view);
    }

    fn measure(&mut self, _view: ViewId, width: i32, height: i32) -> Size {
        Size::new(width, height)
    }

    fn position_view(&mut self, view: ViewId, rect: ViewRect) {
        if let Some(state) = self.views.get_mut(view.0) {
            state.rect = rect;
        }
    }

    fn set_scale(&mut self, view: ViewId, scale: f32) {
        if let Some(state) = self.views.get_mut(view.0) {
            state.scale = scale;
        }
    }

    fn viewport_width(&self) -> i32 {
        self.width
    }

    fn viewport_height(&self) -> i32 {
        self.height
    }

    fn start_smooth_scroll(&mut self, request: SmoothScrollRequest) {
        trace!(?request, "smooth scroll queued");
        // A newer request replaces one that has not started playing.
        self.pending_scroll = Some(request);
    }

    fn density_dpi(&self) -> f32 {
        self.rows_per_inch
    }
}
