use std::cmp::Ordering;

use super::definition::DigiTree;
use super::path::Path;
use crate::types::{Result, TreeError};

/// Scan direction for cursors and counts.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Direction {
    /// Smallest key first.
    #[default]
    Ascending,
    /// Largest key first.
    Descending,
}

impl Direction {
    /// The other direction.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }
}

/// One end of a [`KeyRange`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyBound<K> {
    /// Boundary key.
    pub key: K,
    /// Whether an entry with exactly `key` is part of the range.
    pub inclusive: bool,
}

impl<K> KeyBound<K> {
    /// Bound that includes `key`.
    pub fn inclusive(key: K) -> Self {
        Self {
            key,
            inclusive: true,
        }
    }

    /// Bound that excludes `key`.
    pub fn exclusive(key: K) -> Self {
        Self {
            key,
            inclusive: false,
        }
    }
}

/// Bounds and direction of a range scan.
///
/// `first` is where the scan starts and `last` where it stops, in scan
/// order: a descending range runs from a larger `first` down to a smaller
/// `last`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyRange<K> {
    /// Starting bound; `None` starts at the first entry in scan order.
    pub first: Option<KeyBound<K>>,
    /// Ending bound; `None` runs to the last entry in scan order.
    pub last: Option<KeyBound<K>>,
    /// Scan direction.
    pub direction: Direction,
}

impl<K> KeyRange<K> {
    /// Range between two optional bounds.
    pub fn new(first: Option<KeyBound<K>>, last: Option<KeyBound<K>>, direction: Direction) -> Self {
        Self {
            first,
            last,
            direction,
        }
    }

    /// Every entry, in `direction`.
    pub fn unbounded(direction: Direction) -> Self {
        Self::new(None, None, direction)
    }
}

/// Lazy, one-pass walk over a tree.
///
/// A cursor does not borrow the tree; each [`Cursor::advance`] takes the
/// tree explicitly and checks the cursor's position is still fresh, so a
/// mutation between two pulls surfaces as [`TreeError::StalePath`] instead
/// of a walk through rearranged nodes.
#[derive(Clone, Debug)]
pub struct Cursor<K> {
    path: Path,
    direction: Direction,
    end: Option<K>,
    started: bool,
    done: bool,
}

impl<K: Clone> Cursor<K> {
    pub(crate) fn new(path: Path, direction: Direction, end: Option<K>) -> Self {
        Self {
            path,
            direction,
            end,
            started: false,
            done: false,
        }
    }

    pub(crate) fn exhausted(path: Path, direction: Direction) -> Self {
        Self {
            path,
            direction,
            end: None,
            started: true,
            done: true,
        }
    }

    /// Direction this cursor walks in.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the cursor has run off its end.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Pulls the next position, or `None` once the walk is over.
    ///
    /// The first pull yields the starting entry itself, or the nearest entry
    /// in the walk direction when the cursor started on a crack.
    pub fn advance<E>(&mut self, tree: &DigiTree<K, E>) -> Result<Option<Path>> {
        if self.done {
            return Ok(None);
        }
        tree.validate(&self.path)?;
        if self.started || !self.path.is_on() {
            tree.step(&mut self.path, self.direction)?;
        }
        self.started = true;
        if !self.path.is_on() {
            self.done = true;
            return Ok(None);
        }
        if let Some(end) = &self.end {
            let ord = tree.order.compare(tree.key_at(&self.path)?, end)?;
            let past_end = match self.direction {
                Direction::Ascending => ord == Ordering::Greater,
                Direction::Descending => ord == Ordering::Less,
            };
            if past_end {
                self.done = true;
                return Ok(None);
            }
        }
        Ok(Some(self.path.clone()))
    }

    /// Adapts the cursor into an iterator over entries of `tree`.
    ///
    /// The iterator borrows the tree, so the tree cannot change underneath
    /// it.
    pub fn entries<E>(self, tree: &DigiTree<K, E>) -> Entries<'_, K, E> {
        Entries { cursor: self, tree }
    }
}

/// Iterator over the entries a [`Cursor`] visits.
pub struct Entries<'a, K, E> {
    cursor: Cursor<K>,
    tree: &'a DigiTree<K, E>,
}

impl<'a, K: Clone, E> Iterator for Entries<'a, K, E> {
    type Item = Result<&'a E>;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        match self.cursor.advance(tree) {
            Ok(Some(path)) => Some(
                tree.at(&path)
                    .and_then(|entry| entry.ok_or(TreeError::Corruption("cursor yielded a crack"))),
            ),
            Ok(None) => None,
            Err(err) => {
                self.cursor.done = true;
                Some(Err(err))
            }
        }
    }
}
