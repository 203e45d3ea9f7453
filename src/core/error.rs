//! Library error types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapError {
    #[error("{helper} can only be used with StackLayoutManager, found {found}")]
    IncompatibleLayoutManager {
        helper: &'static str,
        found: &'static str,
    },
}
