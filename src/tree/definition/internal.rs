impl<K: Clone, E> DigiTree<K, E> {
    /// Pushes a freshly split `(partition, right)` pair up the path.
    ///
    /// Each ancestor receives the pair right after the child the path went
    /// through; an ancestor that overflows splits in turn and promotes its
    /// middle partition. `path` is rewritten level by level so it keeps
    /// pointing at the tracked entry.
    fn propagate_split(
        &mut self,
        path: &mut Path,
        mut left: NodeId,
        mut partition: K,
        mut right: NodeId,
        mut went_right: bool,
    ) -> Result<()> {
        let mut depth = path.branches.len();
        while depth > 0 {
            depth -= 1;
            let frame = path.branches[depth];
            let branch = self.arena.branch_mut(frame.node)?;
            branch.partitions.insert(frame.index, partition);
            branch.nodes.insert(frame.index + 1, right);
            let tracked = frame.index + usize::from(went_right);
            if branch.nodes.len() <= NODE_CAPACITY {
                path.branches[depth].index = tracked;
                return Ok(());
            }

            let split = (branch.nodes.len() + 1) / 2;
            let right_nodes = branch.nodes.split_off(split);
            let right_partitions = branch.partitions.split_off(split);
            let promoted = branch
                .partitions
                .pop()
                .ok_or(TreeError::Corruption("branch split without partitions"))?;
            let sibling = self
                .arena
                .allocate(Node::Branch(BranchNode::new(right_partitions, right_nodes)));
            self.stats.inc_branch_splits();
            tracing::trace!(
                target: "digitree::split",
                depth,
                left = frame.node.0,
                right = sibling.0,
                "branch split"
            );

            went_right = tracked >= split;
            path.branches[depth] = if went_right {
                PathBranch::new(sibling, tracked - split)
            } else {
                PathBranch::new(frame.node, tracked)
            };
            left = frame.node;
            partition = promoted;
            right = sibling;
        }

        let root = self
            .arena
            .allocate(Node::Branch(BranchNode::new(vec![partition], vec![left, right])));
        path.branches.insert(0, PathBranch::new(root, usize::from(went_right)));
        self.root = root;
        self.stats.inc_root_splits();
        tracing::debug!(
            target: "digitree::root",
            root = root.0,
            height = path.branches.len() + 1,
            "tree grew a level"
        );
        Ok(())
    }
}
