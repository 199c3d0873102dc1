/// Configuration knobs for a [`DigiTree`].
#[derive(Clone, Debug)]
pub struct TreeOptions {
    /// Whether every non-equal comparison is double-checked against the
    /// reversed comparison, failing with
    /// [`TreeError::InconsistentComparator`] on disagreement.
    pub verify_comparator: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            verify_comparator: true,
        }
    }
}

/// In-memory sorted collection backed by a B+ tree.
///
/// Entries live only in leaves; branches hold routing partitions. Keys are
/// derived from entries by a caller-supplied extractor and ordered by a
/// caller-supplied comparator. Every read hands out a [`Path`] stamped with
/// the current version; every mutation advances the version, which makes
/// every earlier path stale except the one the mutation returned.
///
/// An entry's key must not change while the entry is in the tree except
/// through [`DigiTree::update_at`], [`DigiTree::upsert`] or
/// [`DigiTree::merge`]. The tree only hands out shared references to
/// entries, so this holds unless the entry type has interior mutability.
pub struct DigiTree<K, E> {
    pub(super) arena: NodeArena<K, E>,
    pub(super) root: NodeId,
    pub(super) version: u64,
    pub(super) key_of: KeyFn<E, K>,
    pub(super) order: KeyOrder<K>,
    pub(super) options: TreeOptions,
    pub(super) stats: TreeStats,
}

fn entry_as_key<E>(entry: &E) -> &E {
    entry
}
