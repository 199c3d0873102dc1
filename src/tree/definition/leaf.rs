impl<K: Clone, E> DigiTree<K, E> {
    /// Inserts `entry` at the crack `path` points to and leaves `path` on it.
    ///
    /// The caller owns the version bump.
    fn insert_at(&mut self, path: &mut Path, entry: E) -> Result<()> {
        let index = path.leaf_index;
        let leaf = self.arena.leaf_mut(path.leaf)?;
        if index > leaf.entries.len() {
            return Err(TreeError::Corruption("insert index beyond leaf"));
        }
        if leaf.entries.len() < NODE_CAPACITY {
            leaf.entries.insert(index, entry);
            path.on = true;
            return Ok(());
        }

        let split = (leaf.entries.len() + 1) / 2;
        let mut right = leaf.entries.split_off(split);
        let went_right = index >= split;
        if went_right {
            right.insert(index - split, entry);
        } else {
            leaf.entries.insert(index, entry);
        }
        let left_len = leaf.entries.len();
        let partition = right
            .first()
            .map(|first| (self.key_of)(first).clone())
            .ok_or(TreeError::Corruption("split produced empty right leaf"))?;
        let right_len = right.len();

        let left = path.leaf;
        let right = self.arena.allocate(Node::Leaf(LeafNode::new(right)));
        if went_right {
            path.leaf = right;
            path.leaf_index = index - split;
        }
        path.on = true;
        self.stats.inc_leaf_splits();
        tracing::trace!(
            target: "digitree::split",
            left = left.0,
            right = right.0,
            left_len,
            right_len,
            went_right,
            "leaf split"
        );
        self.propagate_split(path, left, partition, right, went_right)
    }
}
