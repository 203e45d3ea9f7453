//! Core algorithms: the stack layout manager, snapping and the list glue.
//!
//! Nothing in this module depends on any TUI or rendering crate.  Hosts plug
//! in through [`host::LayoutHost`].

pub mod error;
pub mod geometry;
pub mod host;
pub mod list;
pub mod manager;
pub mod scroller;
pub mod snap;
pub mod stack_layout;

#[cfg(test)]
pub(crate) mod test_host;

pub use error::SnapError;
pub use geometry::{Size, ViewRect};
pub use host::{LayoutHost, SmoothScrollRequest};
pub use list::ScrollingList;
pub use manager::{ChildSnapshot, LayoutManager};
pub use snap::{SmartPagerSnapHelper, SnapHelper, StackPagerSnapHelper};
pub use stack_layout::StackLayoutManager;
