use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use serde::Serialize;

/// Snapshot of tree statistics at a point in time.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TreeStatsSnapshot {
    /// Number of root-to-leaf descents performed
    pub searches: u64,
    /// Number of leaf splits performed
    pub leaf_splits: u64,
    /// Number of branch splits performed
    pub branch_splits: u64,
    /// Number of entries moved between sibling leaves
    pub leaf_borrows: u64,
    /// Number of sibling leaves merged
    pub leaf_merges: u64,
    /// Number of children moved between sibling branches
    pub branch_borrows: u64,
    /// Number of sibling branches merged
    pub branch_merges: u64,
    /// Number of times the tree grew a level
    pub root_splits: u64,
    /// Number of times the tree shrank a level
    pub root_collapses: u64,
}

/// Operation counters for one tree.
///
/// Counters are relaxed atomics so they can be bumped through `&self` while
/// the tree stays `Sync`, e.g. when it is shared behind an `RwLock`.
#[derive(Default, Debug)]
pub struct TreeStats {
    searches: AtomicU64,
    leaf_splits: AtomicU64,
    branch_splits: AtomicU64,
    leaf_borrows: AtomicU64,
    leaf_merges: AtomicU64,
    branch_borrows: AtomicU64,
    branch_merges: AtomicU64,
    root_splits: AtomicU64,
    root_collapses: AtomicU64,
}

impl TreeStats {
    /// Returns the current count of descents.
    pub fn searches(&self) -> u64 {
        self.searches.load(AtomicOrdering::Relaxed)
    }

    /// Returns the current count of leaf splits.
    pub fn leaf_splits(&self) -> u64 {
        self.leaf_splits.load(AtomicOrdering::Relaxed)
    }

    /// Returns the current count of branch splits.
    pub fn branch_splits(&self) -> u64 {
        self.branch_splits.load(AtomicOrdering::Relaxed)
    }

    /// Returns the current count of leaf borrows.
    pub fn leaf_borrows(&self) -> u64 {
        self.leaf_borrows.load(AtomicOrdering::Relaxed)
    }

    /// Returns the current count of leaf merges.
    pub fn leaf_merges(&self) -> u64 {
        self.leaf_merges.load(AtomicOrdering::Relaxed)
    }

    /// Returns the current count of branch borrows.
    pub fn branch_borrows(&self) -> u64 {
        self.branch_borrows.load(AtomicOrdering::Relaxed)
    }

    /// Returns the current count of branch merges.
    pub fn branch_merges(&self) -> u64 {
        self.branch_merges.load(AtomicOrdering::Relaxed)
    }

    /// Returns how many times a new root was created.
    pub fn root_splits(&self) -> u64 {
        self.root_splits.load(AtomicOrdering::Relaxed)
    }

    /// Returns how many times the root was collapsed into its only child.
    pub fn root_collapses(&self) -> u64 {
        self.root_collapses.load(AtomicOrdering::Relaxed)
    }

    pub(crate) fn inc_searches(&self) {
        self.searches.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub(crate) fn inc_leaf_splits(&self) {
        self.leaf_splits.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub(crate) fn inc_branch_splits(&self) {
        self.branch_splits.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub(crate) fn inc_leaf_borrows(&self) {
        self.leaf_borrows.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub(crate) fn inc_leaf_merges(&self) {
        self.leaf_merges.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub(crate) fn inc_branch_borrows(&self) {
        self.branch_borrows.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub(crate) fn inc_branch_merges(&self) {
        self.branch_merges.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub(crate) fn inc_root_splits(&self) {
        self.root_splits.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub(crate) fn inc_root_collapses(&self) {
        self.root_collapses.fetch_add(1, AtomicOrdering::Relaxed);
    }

    /// Creates a snapshot of all current statistics.
    pub fn snapshot(&self) -> TreeStatsSnapshot {
        TreeStatsSnapshot {
            searches: self.searches(),
            leaf_splits: self.leaf_splits(),
            branch_splits: self.branch_splits(),
            leaf_borrows: self.leaf_borrows(),
            leaf_merges: self.leaf_merges(),
            branch_borrows: self.branch_borrows(),
            branch_merges: self.branch_merges(),
            root_splits: self.root_splits(),
            root_collapses: self.root_collapses(),
        }
    }

    /// Emits current statistics to the tracing infrastructure.
    pub fn emit_tracing(&self) {
        let snapshot = self.snapshot();
        tracing::info!(
            target: "digitree::stats",
            searches = snapshot.searches,
            leaf_splits = snapshot.leaf_splits,
            branch_splits = snapshot.branch_splits,
            leaf_borrows = snapshot.leaf_borrows,
            leaf_merges = snapshot.leaf_merges,
            branch_borrows = snapshot.branch_borrows,
            branch_merges = snapshot.branch_merges,
            root_splits = snapshot.root_splits,
            root_collapses = snapshot.root_collapses,
            "tree stats snapshot"
        );
    }
}
