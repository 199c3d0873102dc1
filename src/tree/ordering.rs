use std::cmp::Ordering;

use crate::types::{Result, TreeError};

/// Caller-supplied key comparator.
pub(crate) type CompareFn<K> = Box<dyn Fn(&K, &K) -> Ordering + Send + Sync>;

/// Caller-supplied key extractor. May return the entry itself.
pub(crate) type KeyFn<E, K> = Box<dyn Fn(&E) -> &K + Send + Sync>;

/// Comparator wrapper plus the two bisection searches every component uses.
pub(crate) struct KeyOrder<K> {
    compare: CompareFn<K>,
    verify: bool,
}

impl<K> KeyOrder<K> {
    pub(crate) fn new(compare: CompareFn<K>, verify: bool) -> Self {
        Self { compare, verify }
    }

    /// Compares `a` to `b`. When verification is on, every non-equal result
    /// is checked against the reversed comparison.
    pub(crate) fn compare(&self, a: &K, b: &K) -> Result<Ordering> {
        let ord = (self.compare)(a, b);
        if self.verify && ord != Ordering::Equal && (self.compare)(b, a) != ord.reverse() {
            tracing::warn!(
                target: "digitree::order",
                forward = ?ord,
                "comparator is not antisymmetric"
            );
            return Err(TreeError::InconsistentComparator);
        }
        Ok(ord)
    }

    /// Binary search of leaf entries by key. Returns `(found, index)` where
    /// `index` is the insertion point when the key is absent.
    pub(crate) fn locate_entry<E>(
        &self,
        entries: &[E],
        key: &K,
        key_of: &KeyFn<E, K>,
    ) -> Result<(bool, usize)> {
        let mut lo = 0usize;
        let mut hi = entries.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.compare(key_of(&entries[mid]), key)? {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return Ok((true, mid)),
            }
        }
        Ok((false, lo))
    }

    /// Binary search of branch partitions, returning the child index to
    /// descend into. A key equal to a partition routes to the right child.
    pub(crate) fn locate_partition(&self, partitions: &[K], key: &K) -> Result<usize> {
        let mut lo = 0usize;
        let mut hi = partitions.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.compare(&partitions[mid], key)? {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return Ok(mid + 1),
            }
        }
        Ok(lo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(entry: &u32) -> &u32 {
        entry
    }

    fn natural() -> KeyOrder<u32> {
        KeyOrder::new(Box::new(|a: &u32, b: &u32| a.cmp(b)), true)
    }

    #[test]
    fn locate_entry_reports_match_or_insertion_point() -> Result<()> {
        let order = natural();
        let key_of: KeyFn<u32, u32> = Box::new(identity);
        let entries = [10u32, 20, 30, 40];
        assert_eq!(order.locate_entry(&entries, &30, &key_of)?, (true, 2));
        assert_eq!(order.locate_entry(&entries, &5, &key_of)?, (false, 0));
        assert_eq!(order.locate_entry(&entries, &25, &key_of)?, (false, 2));
        assert_eq!(order.locate_entry(&entries, &45, &key_of)?, (false, 4));
        assert_eq!(order.locate_entry(&[], &1, &key_of)?, (false, 0));
        Ok(())
    }

    #[test]
    fn locate_partition_breaks_ties_right() -> Result<()> {
        let order = natural();
        let partitions = [10u32, 20, 30];
        assert_eq!(order.locate_partition(&partitions, &5)?, 0);
        assert_eq!(order.locate_partition(&partitions, &10)?, 1);
        assert_eq!(order.locate_partition(&partitions, &15)?, 1);
        assert_eq!(order.locate_partition(&partitions, &30)?, 3);
        assert_eq!(order.locate_partition(&partitions, &99)?, 3);
        Ok(())
    }

    #[test]
    fn asymmetric_comparator_is_rejected() {
        // Claims every distinct pair is "less", in both directions.
        let order = KeyOrder::new(
            Box::new(|a: &u32, b: &u32| {
                if a == b {
                    Ordering::Equal
                } else {
                    Ordering::Less
                }
            }),
            true,
        );
        assert_eq!(order.compare(&1, &1), Ok(Ordering::Equal));
        assert_eq!(order.compare(&1, &2), Err(TreeError::InconsistentComparator));
    }

    #[test]
    fn verification_can_be_disabled() {
        let order = KeyOrder::new(Box::new(|_: &u32, _: &u32| Ordering::Less), false);
        assert_eq!(order.compare(&1, &2), Ok(Ordering::Less));
    }
}
