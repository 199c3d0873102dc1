//! Error and result types shared by every tree component.

/// Errors raised by [`crate::DigiTree`] operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The caller-supplied comparator is not antisymmetric, so the tree order
    /// cannot be trusted.
    #[error("inconsistent comparator: compare(a, b) and compare(b, a) disagree")]
    InconsistentComparator,
    /// A path was used after the tree it was taken from changed.
    #[error("stale path: path version {path}, tree version {tree}")]
    StalePath {
        /// Version stamped on the path.
        path: u64,
        /// Live version of the tree.
        tree: u64,
    },
    /// Internal node structure is not what the engine expected.
    #[error("corruption: {0}")]
    Corruption(&'static str),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, TreeError>;
