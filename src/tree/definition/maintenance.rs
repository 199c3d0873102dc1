impl<K: Clone, E> DigiTree<K, E> {
    /// Removes the entry under `path` and restores the fill invariants.
    ///
    /// The caller owns validation and the version bump.
    fn remove_at(&mut self, path: &Path) -> Result<()> {
        let leaf = self.arena.leaf_mut(path.leaf)?;
        if path.leaf_index >= leaf.entries.len() {
            return Err(TreeError::Corruption("delete index beyond leaf"));
        }
        leaf.entries.remove(path.leaf_index);
        if path.branches.is_empty() {
            return Ok(());
        }
        if path.leaf_index == 0 {
            let first = leaf.entries.first().map(|entry| (self.key_of)(entry).clone());
            if let Some(key) = first {
                self.update_partition(path, path.branches.len(), key)?;
            }
        }
        self.rebalance_leaf(path)
    }

    /// Rewrites the partition that bounds the node at `depth` from the left.
    ///
    /// That partition lives in the nearest ancestor reached through a child
    /// index greater than zero; a node on the leftmost spine has none.
    fn update_partition(&mut self, path: &Path, depth: usize, key: K) -> Result<()> {
        for frame in path.branches[..depth].iter().rev() {
            if frame.index > 0 {
                let slot = self
                    .arena
                    .branch_mut(frame.node)?
                    .partitions
                    .get_mut(frame.index - 1)
                    .ok_or(TreeError::Corruption("partition index out of range"))?;
                *slot = key;
                return Ok(());
            }
        }
        Ok(())
    }

    fn rebalance_leaf(&mut self, path: &Path) -> Result<()> {
        let depth = path.branches.len();
        let parent = path.branches[depth - 1];
        let leaf_id = path.leaf;
        let len = self.arena.leaf(leaf_id)?.entries.len();
        if len >= MIN_FILL {
            return Ok(());
        }

        let (left_id, right_id) = self.siblings(parent)?;
        let left_len = match left_id {
            Some(id) => self.arena.leaf(id)?.entries.len(),
            None => 0,
        };
        let right_len = match right_id {
            Some(id) => self.arena.leaf(id)?.entries.len(),
            None => 0,
        };

        if let Some(right_id) = right_id.filter(|_| right_len > MIN_FILL) {
            let right = self.arena.leaf_mut(right_id)?;
            let moved = right.entries.remove(0);
            let boundary = right
                .entries
                .first()
                .map(|entry| (self.key_of)(entry).clone())
                .ok_or(TreeError::Corruption("borrow emptied right leaf"))?;
            let leaf = self.arena.leaf_mut(leaf_id)?;
            let was_empty = leaf.entries.is_empty();
            leaf.entries.push(moved);
            *self.partition_mut(parent.node, parent.index)? = boundary;
            if was_empty {
                let key = self.first_key(leaf_id)?;
                self.update_partition(path, depth, key)?;
            }
            self.stats.inc_leaf_borrows();
            tracing::trace!(target: "digitree::rebalance", leaf = leaf_id.0, from = "right", "leaf borrow");
            return Ok(());
        }

        if let Some(left_id) = left_id.filter(|_| left_len > MIN_FILL) {
            let moved = self
                .arena
                .leaf_mut(left_id)?
                .entries
                .pop()
                .ok_or(TreeError::Corruption("borrow from empty left leaf"))?;
            let boundary = (self.key_of)(&moved).clone();
            self.arena.leaf_mut(leaf_id)?.entries.insert(0, moved);
            *self.partition_mut(parent.node, parent.index - 1)? = boundary;
            self.stats.inc_leaf_borrows();
            tracing::trace!(target: "digitree::rebalance", leaf = leaf_id.0, from = "left", "leaf borrow");
            return Ok(());
        }

        if let Some(right_id) = right_id.filter(|_| len + right_len <= NODE_CAPACITY) {
            let absorbed = self.arena.release_leaf(right_id)?;
            let leaf = self.arena.leaf_mut(leaf_id)?;
            let was_empty = leaf.entries.is_empty();
            leaf.entries.extend(absorbed.entries);
            if was_empty {
                let key = self.first_key(leaf_id)?;
                self.update_partition(path, depth, key)?;
            }
            let branch = self.arena.branch_mut(parent.node)?;
            branch.partitions.remove(parent.index);
            branch.nodes.remove(parent.index + 1);
            self.stats.inc_leaf_merges();
            tracing::trace!(target: "digitree::rebalance", leaf = leaf_id.0, absorbed = right_id.0, "leaf merge");
            return self.rebalance_branch(path, depth - 1);
        }

        if let Some(left_id) = left_id.filter(|_| len + left_len <= NODE_CAPACITY) {
            let merged = self.arena.release_leaf(leaf_id)?;
            self.arena.leaf_mut(left_id)?.entries.extend(merged.entries);
            let branch = self.arena.branch_mut(parent.node)?;
            branch.partitions.remove(parent.index - 1);
            branch.nodes.remove(parent.index);
            self.stats.inc_leaf_merges();
            tracing::trace!(target: "digitree::rebalance", leaf = leaf_id.0, into = left_id.0, "leaf merge");
            return self.rebalance_branch(path, depth - 1);
        }

        Err(TreeError::Corruption("underfull leaf has no usable sibling"))
    }

    /// Rebalances the branch the path passes through at `level`, after it
    /// lost a child.
    fn rebalance_branch(&mut self, path: &Path, level: usize) -> Result<()> {
        let node = path.branches[level].node;
        let count = self.arena.branch(node)?.nodes.len();
        if level == 0 {
            if count == 1 {
                let old_root = self.arena.release_branch(node)?;
                self.root = *old_root
                    .nodes
                    .first()
                    .ok_or(TreeError::Corruption("collapsed root without child"))?;
                self.stats.inc_root_collapses();
                tracing::debug!(target: "digitree::root", root = self.root.0, "tree shrank a level");
            }
            return Ok(());
        }
        if count >= MIN_FILL {
            return Ok(());
        }

        let parent = path.branches[level - 1];
        let (left_id, right_id) = self.siblings(parent)?;
        let left_count = match left_id {
            Some(id) => self.arena.branch(id)?.nodes.len(),
            None => 0,
        };
        let right_count = match right_id {
            Some(id) => self.arena.branch(id)?.nodes.len(),
            None => 0,
        };

        if let Some(right_id) = right_id.filter(|_| right_count > MIN_FILL) {
            let right = self.arena.branch_mut(right_id)?;
            let child = right.nodes.remove(0);
            let lifted = right.partitions.remove(0);
            let separator =
                std::mem::replace(self.partition_mut(parent.node, parent.index)?, lifted);
            let branch = self.arena.branch_mut(node)?;
            branch.partitions.push(separator);
            branch.nodes.push(child);
            self.stats.inc_branch_borrows();
            tracing::trace!(target: "digitree::rebalance", level, branch = node.0, from = "right", "branch borrow");
            return Ok(());
        }

        if let Some(left_id) = left_id.filter(|_| left_count > MIN_FILL) {
            let left = self.arena.branch_mut(left_id)?;
            let (child, lifted) = match (left.nodes.pop(), left.partitions.pop()) {
                (Some(child), Some(lifted)) => (child, lifted),
                _ => return Err(TreeError::Corruption("borrow from empty left branch")),
            };
            let separator =
                std::mem::replace(self.partition_mut(parent.node, parent.index - 1)?, lifted);
            let branch = self.arena.branch_mut(node)?;
            branch.partitions.insert(0, separator);
            branch.nodes.insert(0, child);
            self.stats.inc_branch_borrows();
            tracing::trace!(target: "digitree::rebalance", level, branch = node.0, from = "left", "branch borrow");
            return Ok(());
        }

        if let Some(right_id) = right_id.filter(|_| count + right_count <= NODE_CAPACITY) {
            let absorbed = self.arena.release_branch(right_id)?;
            let parent_branch = self.arena.branch_mut(parent.node)?;
            parent_branch.nodes.remove(parent.index + 1);
            let separator = parent_branch.partitions.remove(parent.index);
            let branch = self.arena.branch_mut(node)?;
            branch.partitions.push(separator);
            branch.partitions.extend(absorbed.partitions);
            branch.nodes.extend(absorbed.nodes);
            self.stats.inc_branch_merges();
            tracing::trace!(target: "digitree::rebalance", level, branch = node.0, absorbed = right_id.0, "branch merge");
            return self.rebalance_branch(path, level - 1);
        }

        if let Some(left_id) = left_id.filter(|_| count + left_count <= NODE_CAPACITY) {
            let merged = self.arena.release_branch(node)?;
            let parent_branch = self.arena.branch_mut(parent.node)?;
            parent_branch.nodes.remove(parent.index);
            let separator = parent_branch.partitions.remove(parent.index - 1);
            let left = self.arena.branch_mut(left_id)?;
            left.partitions.push(separator);
            left.partitions.extend(merged.partitions);
            left.nodes.extend(merged.nodes);
            self.stats.inc_branch_merges();
            tracing::trace!(target: "digitree::rebalance", level, branch = node.0, into = left_id.0, "branch merge");
            return self.rebalance_branch(path, level - 1);
        }

        Err(TreeError::Corruption("underfull branch has no usable sibling"))
    }

    /// Left and right neighbours of the child `frame` points at.
    fn siblings(&self, frame: PathBranch) -> Result<(Option<NodeId>, Option<NodeId>)> {
        let branch = self.arena.branch(frame.node)?;
        let left = frame
            .index
            .checked_sub(1)
            .and_then(|index| branch.nodes.get(index).copied());
        let right = branch.nodes.get(frame.index + 1).copied();
        Ok((left, right))
    }

    fn partition_mut(&mut self, node: NodeId, index: usize) -> Result<&mut K> {
        self.arena
            .branch_mut(node)?
            .partitions
            .get_mut(index)
            .ok_or(TreeError::Corruption("partition index out of range"))
    }

    fn first_key(&self, leaf: NodeId) -> Result<K> {
        self.arena
            .leaf(leaf)?
            .entries
            .first()
            .map(|entry| (self.key_of)(entry).clone())
            .ok_or(TreeError::Corruption("leaf unexpectedly empty"))
    }
}
