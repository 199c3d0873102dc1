impl<E: Ord + Clone + 'static> DigiTree<E, E> {
    /// Creates an empty tree whose entries are their own keys, in `Ord` order.
    pub fn new() -> Self {
        DigiTree::with_options(entry_as_key::<E>, E::cmp, TreeOptions::default())
    }
}

impl<E: Ord + Clone + 'static> Default for DigiTree<E, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + 'static, E: 'static> DigiTree<K, E> {
    /// Creates an empty tree keyed by `key_of`, in the key's `Ord` order.
    pub fn with_key<X>(key_of: X) -> Self
    where
        X: Fn(&E) -> &K + Send + Sync + 'static,
        K: Ord,
    {
        Self::with_options(key_of, K::cmp, TreeOptions::default())
    }

    /// Creates an empty tree with a custom key extractor and comparator.
    pub fn with_comparator<X, C>(key_of: X, compare: C) -> Self
    where
        X: Fn(&E) -> &K + Send + Sync + 'static,
        C: Fn(&K, &K) -> Ordering + Send + Sync + 'static,
    {
        Self::with_options(key_of, compare, TreeOptions::default())
    }

    /// Creates an empty tree with explicit options.
    pub fn with_options<X, C>(key_of: X, compare: C, options: TreeOptions) -> Self
    where
        X: Fn(&E) -> &K + Send + Sync + 'static,
        C: Fn(&K, &K) -> Ordering + Send + Sync + 'static,
    {
        let compare: CompareFn<K> = Box::new(compare);
        let mut arena = NodeArena::new();
        let root = arena.allocate(Node::Leaf(LeafNode::new(Vec::new())));
        Self {
            arena,
            root,
            version: 0,
            key_of: Box::new(key_of),
            order: KeyOrder::new(compare, options.verify_comparator),
            options,
            stats: TreeStats::default(),
        }
    }
}

impl<K: Clone, E> DigiTree<K, E> {
    /// Options this tree was created with.
    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Access the live statistics counters for this tree.
    pub fn stats(&self) -> &TreeStats {
        &self.stats
    }

    /// Snapshot the current statistics counters.
    pub fn stats_snapshot(&self) -> TreeStatsSnapshot {
        self.stats.snapshot()
    }

    /// Emit the current statistics to the tracing sink.
    pub fn emit_stats(&self) {
        self.stats.emit_tracing();
    }

    /// Current mutation counter.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Path to the first entry, or a crack if the tree is empty.
    pub fn first(&self) -> Result<Path> {
        let mut path = Path::new(self.root, self.version);
        self.descend_first(self.root, &mut path)?;
        Ok(path)
    }

    /// Path to the last entry, or a crack if the tree is empty.
    pub fn last(&self) -> Result<Path> {
        let mut path = Path::new(self.root, self.version);
        self.descend_last(self.root, &mut path)?;
        Ok(path)
    }

    /// Path to the entry with `key`, or to the crack where it would go.
    pub fn find(&self, key: &K) -> Result<Path> {
        let mut path = Path::new(self.root, self.version);
        self.descend_to_key(key, &mut path)?;
        Ok(path)
    }

    /// Retrieves the entry with `key`, if present.
    pub fn get(&self, key: &K) -> Result<Option<&E>> {
        let path = self.find(key)?;
        self.entry_at(&path)
    }

    /// Retrieves the entry under `path`; `None` when the path is a crack.
    pub fn at(&self, path: &Path) -> Result<Option<&E>> {
        self.validate(path)?;
        self.entry_at(path)
    }

    /// Whether `path` is still usable against this tree.
    pub fn is_valid(&self, path: &Path) -> bool {
        path.version == self.version
    }

    /// Whether the tree holds no entries.
    ///
    /// Only a leaf root can be empty; a branch root or a dangling root id
    /// reports `false`. Use [`DigiTree::verify`] to detect the latter.
    pub fn is_empty(&self) -> bool {
        matches!(self.arena.get(self.root), Ok(Node::Leaf(leaf)) if leaf.entries.is_empty())
    }

    /// Inserts `entry` unless its key is already present.
    ///
    /// The returned path is on the new entry when the insert happened. On a
    /// key conflict nothing changes and the returned path is a crack
    /// positioned right before the existing entry.
    pub fn insert(&mut self, entry: E) -> Result<Path> {
        let mut path = self.find((self.key_of)(&entry))?;
        if path.on {
            path.on = false;
            return Ok(path);
        }
        self.insert_at(&mut path, entry)?;
        self.advance_version(&mut path);
        Ok(path)
    }

    /// Inserts `entry`, or replaces the entry that has the same key.
    ///
    /// The returned path is on the entry when an existing entry was
    /// replaced. When the entry was newly inserted the path is a crack right
    /// before it, so [`DigiTree::next`] lands on it.
    pub fn upsert(&mut self, entry: E) -> Result<Path> {
        let mut path = self.find((self.key_of)(&entry))?;
        if path.on {
            *self.slot_mut(&path)? = entry;
        } else {
            self.insert_at(&mut path, entry)?;
            path.on = false;
        }
        self.advance_version(&mut path);
        Ok(path)
    }

    /// Inserts `entry` if its key is absent, otherwise replaces the existing
    /// entry with `update(existing)`.
    ///
    /// Returns the resulting path and whether an existing entry was updated.
    /// The update goes through [`DigiTree::update_at`], so a replacement that
    /// changes the key is moved to its new position, and is refused if that
    /// key is already taken.
    pub fn merge<F>(&mut self, entry: E, update: F) -> Result<(Path, bool)>
    where
        F: FnOnce(&E) -> E,
    {
        let mut path = self.find((self.key_of)(&entry))?;
        if path.on {
            let replacement = {
                let existing = self
                    .entry_at(&path)?
                    .ok_or(TreeError::Corruption("matched path without entry"))?;
                update(existing)
            };
            return self.update_at(&path, replacement);
        }
        self.insert_at(&mut path, entry)?;
        self.advance_version(&mut path);
        Ok((path, false))
    }

    /// Replaces the entry under `path` with `entry`.
    ///
    /// With an unchanged key the slot is overwritten in place. Otherwise the
    /// old entry is deleted and `entry` inserted at its own position; if the
    /// new key already belongs to another entry nothing changes and
    /// `(crack before that entry, false)` is returned.
    pub fn update_at(&mut self, path: &Path, entry: E) -> Result<(Path, bool)> {
        self.validate(path)?;
        if !path.on {
            return Ok((path.clone(), false));
        }
        let same_key = {
            let existing = self
                .entry_at(path)?
                .ok_or(TreeError::Corruption("matched path without entry"))?;
            self.order
                .compare((self.key_of)(existing), (self.key_of)(&entry))?
                == Ordering::Equal
        };
        if same_key {
            let mut path = path.clone();
            *self.slot_mut(&path)? = entry;
            self.advance_version(&mut path);
            return Ok((path, true));
        }

        let mut target = self.find((self.key_of)(&entry))?;
        if target.on {
            target.on = false;
            return Ok((target, false));
        }
        self.remove_at(path)?;
        self.version += 1;
        let mut target = self.find((self.key_of)(&entry))?;
        self.insert_at(&mut target, entry)?;
        self.advance_version(&mut target);
        Ok((target, true))
    }

    /// Deletes the entry under `path`.
    ///
    /// Returns `false` without touching the tree when the path is a crack.
    pub fn delete_at(&mut self, path: &Path) -> Result<bool> {
        self.validate(path)?;
        if !path.on {
            return Ok(false);
        }
        self.remove_at(path)?;
        self.version += 1;
        Ok(true)
    }

    /// Lazily walks entries upward from `path`. A crack starts at the
    /// nearest following entry.
    pub fn ascending(&self, path: &Path) -> Result<Cursor<K>> {
        self.validate(path)?;
        Ok(Cursor::new(path.clone(), Direction::Ascending, None))
    }

    /// Lazily walks entries downward from `path`. A crack starts at the
    /// nearest preceding entry.
    pub fn descending(&self, path: &Path) -> Result<Cursor<K>> {
        self.validate(path)?;
        Ok(Cursor::new(path.clone(), Direction::Descending, None))
    }

    /// Lazily walks the entries inside `range`, in the range's direction.
    ///
    /// `range.first` bounds where the walk starts and `range.last` where it
    /// ends; a missing bound means the corresponding end of the tree. An
    /// inverted range yields nothing.
    pub fn range(&self, range: &KeyRange<K>) -> Result<Cursor<K>> {
        let direction = range.direction;
        let start = match &range.first {
            Some(bound) => {
                let mut path = self.find(&bound.key)?;
                if !path.on || !bound.inclusive {
                    self.step(&mut path, direction)?;
                }
                path
            }
            None => match direction {
                Direction::Ascending => self.first()?,
                Direction::Descending => self.last()?,
            },
        };
        if !start.on {
            return Ok(Cursor::exhausted(start, direction));
        }
        let end = match &range.last {
            Some(bound) => {
                let mut path = self.find(&bound.key)?;
                if !path.on || !bound.inclusive {
                    self.step(&mut path, direction.opposite())?;
                }
                if !path.on {
                    return Ok(Cursor::exhausted(start, direction));
                }
                Some(self.key_at(&path)?.clone())
            }
            None => None,
        };
        Ok(Cursor::new(start, direction, end))
    }

    /// Counts entries from `from` (inclusive) to the end of the tree in
    /// `direction`, or every entry when `from` is `None`.
    ///
    /// A crack is first moved onto the nearest entry in `direction`. The
    /// count walks leaf to leaf, so it costs one step per leaf rather than
    /// one per entry.
    pub fn get_count(&self, from: Option<&Path>, direction: Direction) -> Result<usize> {
        let mut path = match from {
            Some(path) => {
                self.validate(path)?;
                path.clone()
            }
            None => match direction {
                Direction::Ascending => self.first()?,
                Direction::Descending => self.last()?,
            },
        };
        if !path.on {
            self.step(&mut path, direction)?;
        }
        let mut count = 0usize;
        while path.on {
            let len = self.arena.leaf(path.leaf)?.entries.len();
            match direction {
                Direction::Ascending => {
                    count += len - path.leaf_index;
                    path.leaf_index = len - 1;
                }
                Direction::Descending => {
                    count += path.leaf_index + 1;
                    path.leaf_index = 0;
                }
            }
            self.step(&mut path, direction)?;
        }
        Ok(count)
    }

    /// Number of levels, counting the leaf level.
    pub fn height(&self) -> Result<usize> {
        let mut path = Path::new(self.root, self.version);
        self.descend_first(self.root, &mut path)?;
        Ok(path.branches.len() + 1)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = self.arena.allocate(Node::Leaf(LeafNode::new(Vec::new())));
        self.version += 1;
        tracing::debug!(target: "digitree::root", version = self.version, "tree cleared");
    }

    pub(super) fn validate(&self, path: &Path) -> Result<()> {
        if path.version != self.version {
            return Err(TreeError::StalePath {
                path: path.version,
                tree: self.version,
            });
        }
        Ok(())
    }

    pub(super) fn entry_at(&self, path: &Path) -> Result<Option<&E>> {
        if !path.on {
            return Ok(None);
        }
        Ok(self.arena.leaf(path.leaf)?.entries.get(path.leaf_index))
    }

    pub(super) fn key_at(&self, path: &Path) -> Result<&K> {
        let entry = self
            .entry_at(path)?
            .ok_or(TreeError::Corruption("key requested from a crack"))?;
        Ok((self.key_of)(entry))
    }

    fn slot_mut(&mut self, path: &Path) -> Result<&mut E> {
        self.arena
            .leaf_mut(path.leaf)?
            .entries
            .get_mut(path.leaf_index)
            .ok_or(TreeError::Corruption("path index beyond leaf"))
    }

    fn advance_version(&mut self, path: &mut Path) {
        self.version += 1;
        path.version = self.version;
    }
}
