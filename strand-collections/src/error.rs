//! Error type shared by every structure in the crate.
//!
//! All variants are contract violations detected synchronously by the call
//! that returns them. A failing call never leaves the structure partially
//! modified.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Contract violation reported by a collection operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A [`DisjointSet`](crate::DisjointSet) was asked for zero elements.
    #[error("element count must be positive")]
    ZeroSize,

    /// The node is already a member of some list.
    #[error("node is already linked into a list")]
    AlreadyLinked,

    /// The node is not a member of the list being addressed.
    #[error("node is not linked into this list")]
    NotLinked,

    /// The key does not resolve to a node in the supplied storage.
    #[error("no node stored at index {index}")]
    InvalidKey {
        /// The offending key, as `usize`.
        index: usize,
    },

    /// A cursor was driven with a list other than the one it was created on.
    #[error("cursor belongs to a different list")]
    ForeignList,

    /// An element index or cursor position is outside the valid range.
    #[error("index {index} out of bounds for length {len}")]
    OutOfBounds {
        /// The requested index.
        index: usize,
        /// The length the index was checked against.
        len: usize,
    },

    /// The list is empty, or the cursor has no element in that direction.
    #[error("no such element")]
    NoSuchElement,

    /// Cursor `remove`/`set` without a preceding `next`/`previous`.
    #[error("cursor has no last returned node")]
    NoCurrent,

    /// The list was structurally modified outside this cursor.
    #[error("list modified outside cursor (expected generation {expected}, found {actual})")]
    ConcurrentModification {
        /// Generation the cursor last synchronized with.
        expected: u64,
        /// Current generation of the list.
        actual: u64,
    },

    /// Persisted state failed validation on restore.
    #[error("corrupt persisted state: {0}")]
    Corrupt(&'static str),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad argument: zero size, foreign or already linked node, bad key.
    InvalidArgument,
    /// Index outside the valid range.
    OutOfBounds,
    /// Nothing to return.
    NoSuchElement,
    /// Operation not valid in the cursor's current state.
    IllegalState,
    /// Fail-fast cursor detected an outside modification.
    ConcurrentModification,
    /// Restored state violates a structural invariant.
    Corrupt,
}

impl Error {
    /// Returns the kind of contract this error violates.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::ZeroSize
            | Error::AlreadyLinked
            | Error::NotLinked
            | Error::InvalidKey { .. }
            | Error::ForeignList => ErrorKind::InvalidArgument,
            Error::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            Error::NoSuchElement => ErrorKind::NoSuchElement,
            Error::NoCurrent => ErrorKind::IllegalState,
            Error::ConcurrentModification { .. } => ErrorKind::ConcurrentModification,
            Error::Corrupt(_) => ErrorKind::Corrupt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(Error::ZeroSize.kind(), ErrorKind::InvalidArgument);
        assert_eq!(Error::InvalidKey { index: 3 }.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            Error::OutOfBounds { index: 5, len: 5 }.kind(),
            ErrorKind::OutOfBounds
        );
        assert_eq!(Error::NoCurrent.kind(), ErrorKind::IllegalState);
        assert_eq!(
            Error::ConcurrentModification { expected: 1, actual: 2 }.kind(),
            ErrorKind::ConcurrentModification
        );
    }

    #[test]
    fn display() {
        assert_eq!(
            Error::OutOfBounds { index: 7, len: 3 }.to_string(),
            "index 7 out of bounds for length 3"
        );
        assert_eq!(Error::NoSuchElement.to_string(), "no such element");
    }
}
