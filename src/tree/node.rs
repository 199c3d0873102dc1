use crate::types::{Result, TreeError};

/// Maximum number of entries in a leaf and children in a branch.
pub const NODE_CAPACITY: usize = 64;

/// Minimum fill for every node except the root.
pub(crate) const MIN_FILL: usize = NODE_CAPACITY / 2;

/// Index of a node slot inside a [`NodeArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NodeId(pub(crate) usize);

/// Leaf node: a dense run of entries sorted by key, no duplicate keys.
#[derive(Debug)]
pub(crate) struct LeafNode<E> {
    pub(crate) entries: Vec<E>,
}

impl<E> LeafNode<E> {
    pub(crate) fn new(entries: Vec<E>) -> Self {
        Self { entries }
    }
}

/// Branch node: `k` partitions routing into `k + 1` children.
///
/// Child `i` holds keys in `[partitions[i - 1], partitions[i])`, and
/// `partitions[i]` is always the smallest key reachable under `nodes[i + 1]`.
#[derive(Debug)]
pub(crate) struct BranchNode<K> {
    pub(crate) partitions: Vec<K>,
    pub(crate) nodes: Vec<NodeId>,
}

impl<K> BranchNode<K> {
    pub(crate) fn new(partitions: Vec<K>, nodes: Vec<NodeId>) -> Self {
        debug_assert_eq!(partitions.len() + 1, nodes.len());
        Self { partitions, nodes }
    }
}

/// A tree node. The engine branches on the tag, never on anything else.
#[derive(Debug)]
pub(crate) enum Node<K, E> {
    Leaf(LeafNode<E>),
    Branch(BranchNode<K>),
}

/// Slot storage for every node of one tree.
///
/// Released slots are recycled before the arena grows. The tree's root id is
/// the only strong reference; a node unreachable from it is released by the
/// engine during merges and root collapse.
#[derive(Debug)]
pub(crate) struct NodeArena<K, E> {
    slots: Vec<Option<Node<K, E>>>,
    free: Vec<NodeId>,
}

impl<K, E> NodeArena<K, E> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn allocate(&mut self, node: Node<K, E>) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.slots[id.0] = Some(node);
            return id;
        }
        self.slots.push(Some(node));
        NodeId(self.slots.len() - 1)
    }

    /// Removes a node from the arena and hands it back to the caller.
    pub(crate) fn release(&mut self, id: NodeId) -> Result<Node<K, E>> {
        let node = self
            .slots
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(TreeError::Corruption("release of unallocated node"))?;
        self.free.push(id);
        Ok(node)
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    /// Number of nodes currently allocated.
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn get(&self, id: NodeId) -> Result<&Node<K, E>> {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(TreeError::Corruption("dangling node id"))
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Result<&mut Node<K, E>> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(TreeError::Corruption("dangling node id"))
    }

    pub(crate) fn leaf(&self, id: NodeId) -> Result<&LeafNode<E>> {
        match self.get(id)? {
            Node::Leaf(leaf) => Ok(leaf),
            Node::Branch(_) => Err(TreeError::Corruption("expected leaf node")),
        }
    }

    pub(crate) fn leaf_mut(&mut self, id: NodeId) -> Result<&mut LeafNode<E>> {
        match self.get_mut(id)? {
            Node::Leaf(leaf) => Ok(leaf),
            Node::Branch(_) => Err(TreeError::Corruption("expected leaf node")),
        }
    }

    pub(crate) fn branch(&self, id: NodeId) -> Result<&BranchNode<K>> {
        match self.get(id)? {
            Node::Branch(branch) => Ok(branch),
            Node::Leaf(_) => Err(TreeError::Corruption("expected branch node")),
        }
    }

    pub(crate) fn branch_mut(&mut self, id: NodeId) -> Result<&mut BranchNode<K>> {
        match self.get_mut(id)? {
            Node::Branch(branch) => Ok(branch),
            Node::Leaf(_) => Err(TreeError::Corruption("expected branch node")),
        }
    }

    /// Releases a leaf and returns its entries.
    pub(crate) fn release_leaf(&mut self, id: NodeId) -> Result<LeafNode<E>> {
        match self.release(id)? {
            Node::Leaf(leaf) => Ok(leaf),
            Node::Branch(_) => Err(TreeError::Corruption("released branch where leaf expected")),
        }
    }

    pub(crate) fn release_branch(&mut self, id: NodeId) -> Result<BranchNode<K>> {
        match self.release(id)? {
            Node::Branch(branch) => Ok(branch),
            Node::Leaf(_) => Err(TreeError::Corruption("released leaf where branch expected")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_recycles_released_slots() -> Result<()> {
        let mut arena: NodeArena<u32, u32> = NodeArena::new();
        let a = arena.allocate(Node::Leaf(LeafNode::new(vec![1, 2])));
        let b = arena.allocate(Node::Leaf(LeafNode::new(vec![3])));
        assert_eq!(arena.live(), 2);

        let released = arena.release_leaf(a)?;
        assert_eq!(released.entries, vec![1, 2]);
        assert_eq!(arena.live(), 1);

        let c = arena.allocate(Node::Branch(BranchNode::new(vec![3], vec![b, b])));
        assert_eq!(c, a, "released slot should be reused");
        assert_eq!(arena.branch(c)?.partitions, vec![3]);
        Ok(())
    }

    #[test]
    fn arena_rejects_dangling_and_mistyped_ids() {
        let mut arena: NodeArena<u32, u32> = NodeArena::new();
        let id = arena.allocate(Node::Leaf(LeafNode::new(Vec::new())));
        assert!(matches!(arena.branch(id), Err(TreeError::Corruption(_))));
        arena.release(id).expect("release once");
        assert!(matches!(arena.leaf(id), Err(TreeError::Corruption(_))));
        assert!(matches!(arena.release(id), Err(TreeError::Corruption(_))));
    }
}
