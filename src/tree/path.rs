use smallvec::SmallVec;

use super::node::NodeId;

/// One internal level of a descent: the branch and the child taken from it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct PathBranch {
    pub(crate) node: NodeId,
    pub(crate) index: usize,
}

impl PathBranch {
    pub(crate) fn new(node: NodeId, index: usize) -> Self {
        Self { node, index }
    }
}

/// A cursor into a [`crate::DigiTree`].
///
/// A path is a snapshot of one root-to-leaf descent plus a position inside
/// the leaf. It never borrows the tree; instead it carries the tree version
/// it was produced at, and every operation that accepts a path rejects it
/// with [`crate::TreeError::StalePath`] once the tree has moved on.
///
/// When [`Path::is_on`] is false the path is a *crack*: it sits between two
/// entries (just before `leaf[index]`), or off one end of the tree.
#[derive(Clone, Debug)]
pub struct Path {
    pub(crate) branches: SmallVec<[PathBranch; 8]>,
    pub(crate) leaf: NodeId,
    pub(crate) leaf_index: usize,
    pub(crate) on: bool,
    pub(crate) version: u64,
}

impl Path {
    pub(crate) fn new(leaf: NodeId, version: u64) -> Self {
        Self {
            branches: SmallVec::new(),
            leaf,
            leaf_index: 0,
            on: false,
            version,
        }
    }

    /// Whether the path is positioned on an entry.
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Tree version this path was stamped with.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether both paths denote the same position (on-entry or crack).
    pub fn same_position(&self, other: &Path) -> bool {
        self.leaf == other.leaf
            && self.leaf_index == other.leaf_index
            && self.on == other.on
            && self.version == other.version
    }
}
