//! Pixel geometry shared by the layout manager and its hosts.

/// Measured size of a child view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Layout rectangle of a child, in the host's coordinate space
/// (origin at the top-left of the list viewport, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ViewRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// A full-width rect of `size` whose top edge sits at `top`.
    pub fn at_top(top: i32, size: Size) -> Self {
        Self::new(0, top, size.width, top + size.height)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Shift top and bottom together.
    pub fn offset_top_and_bottom(&mut self, delta: i32) {
        self.top += delta;
        self.bottom += delta;
    }
}
