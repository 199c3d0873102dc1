impl<K: Clone, E> DigiTree<K, E> {
    /// Moves `path` one entry forward.
    ///
    /// A crack moves onto the entry right after it. Moving past the last
    /// entry leaves an off-end crack; moving it again is a no-op.
    pub fn move_next(&self, path: &mut Path) -> Result<()> {
        self.validate(path)?;
        self.advance_next(path)
    }

    /// Moves `path` one entry backward.
    ///
    /// A crack moves onto the entry right before it. Moving before the first
    /// entry leaves a before-first crack.
    pub fn move_prior(&self, path: &mut Path) -> Result<()> {
        self.validate(path)?;
        self.advance_prior(path)
    }

    /// Returns a copy of `path` moved one entry forward.
    pub fn next(&self, path: &Path) -> Result<Path> {
        let mut next = path.clone();
        self.move_next(&mut next)?;
        Ok(next)
    }

    /// Returns a copy of `path` moved one entry backward.
    pub fn prior(&self, path: &Path) -> Result<Path> {
        let mut prior = path.clone();
        self.move_prior(&mut prior)?;
        Ok(prior)
    }

    pub(super) fn step(&self, path: &mut Path, direction: Direction) -> Result<()> {
        match direction {
            Direction::Ascending => self.advance_next(path),
            Direction::Descending => self.advance_prior(path),
        }
    }

    fn descend_to_key(&self, key: &K, path: &mut Path) -> Result<()> {
        self.stats.inc_searches();
        let mut node = self.root;
        loop {
            match self.arena.get(node)? {
                Node::Branch(branch) => {
                    let index = self.order.locate_partition(&branch.partitions, key)?;
                    path.branches.push(PathBranch::new(node, index));
                    node = *branch
                        .nodes
                        .get(index)
                        .ok_or(TreeError::Corruption("partition index beyond children"))?;
                }
                Node::Leaf(leaf) => {
                    let (found, index) =
                        self.order.locate_entry(&leaf.entries, key, &self.key_of)?;
                    path.leaf = node;
                    path.leaf_index = index;
                    path.on = found;
                    tracing::trace!(
                        target: "digitree::search",
                        depth = path.branches.len(),
                        leaf = node.0,
                        index,
                        found,
                        "descended to leaf"
                    );
                    return Ok(());
                }
            }
        }
    }

    fn descend_first(&self, mut node: NodeId, path: &mut Path) -> Result<()> {
        loop {
            match self.arena.get(node)? {
                Node::Branch(branch) => {
                    path.branches.push(PathBranch::new(node, 0));
                    node = *branch
                        .nodes
                        .first()
                        .ok_or(TreeError::Corruption("branch without children"))?;
                }
                Node::Leaf(leaf) => {
                    path.leaf = node;
                    path.leaf_index = 0;
                    path.on = !leaf.entries.is_empty();
                    return Ok(());
                }
            }
        }
    }

    fn descend_last(&self, mut node: NodeId, path: &mut Path) -> Result<()> {
        loop {
            match self.arena.get(node)? {
                Node::Branch(branch) => {
                    let index = branch
                        .nodes
                        .len()
                        .checked_sub(1)
                        .ok_or(TreeError::Corruption("branch without children"))?;
                    path.branches.push(PathBranch::new(node, index));
                    node = branch.nodes[index];
                }
                Node::Leaf(leaf) => {
                    path.leaf = node;
                    path.leaf_index = leaf.entries.len().saturating_sub(1);
                    path.on = !leaf.entries.is_empty();
                    return Ok(());
                }
            }
        }
    }

    fn advance_next(&self, path: &mut Path) -> Result<()> {
        let len = self.arena.leaf(path.leaf)?.entries.len();
        if !path.on && path.leaf_index < len {
            path.on = true;
            return Ok(());
        }
        if path.on && path.leaf_index + 1 < len {
            path.leaf_index += 1;
            return Ok(());
        }

        // Climb to the deepest branch that still has a child to the right.
        let mut depth = path.branches.len();
        while depth > 0 {
            let frame = path.branches[depth - 1];
            if frame.index + 1 < self.arena.branch(frame.node)?.nodes.len() {
                break;
            }
            depth -= 1;
        }
        if depth == 0 {
            path.leaf_index = len;
            path.on = false;
            return Ok(());
        }
        path.branches.truncate(depth);
        let frame = &mut path.branches[depth - 1];
        frame.index += 1;
        let child = self.arena.branch(frame.node)?.nodes[frame.index];
        self.descend_first(child, path)
    }

    fn advance_prior(&self, path: &mut Path) -> Result<()> {
        let len = self.arena.leaf(path.leaf)?.entries.len();
        if path.leaf_index > 0 && path.leaf_index <= len {
            path.leaf_index -= 1;
            path.on = true;
            return Ok(());
        }

        let mut depth = path.branches.len();
        while depth > 0 && path.branches[depth - 1].index == 0 {
            depth -= 1;
        }
        if depth == 0 {
            path.leaf_index = 0;
            path.on = false;
            return Ok(());
        }
        path.branches.truncate(depth);
        let frame = &mut path.branches[depth - 1];
        frame.index -= 1;
        let child = self.arena.branch(frame.node)?.nodes[frame.index];
        self.descend_last(child, path)
    }
}
