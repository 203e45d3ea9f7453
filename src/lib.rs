//! Card-stack layout for virtualized lists.
//!
//! The top card stays pinned and shrinks while the next card slides over it;
//! once fully covered it is recycled and the next card takes its place.  The
//! `core` module holds the layout manager, the pager snap helpers and a
//! small scrolling list that drives them against any [`LayoutHost`](crate::core::host::LayoutHost).

pub mod core;
