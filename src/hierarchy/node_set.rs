use std::collections::BTreeMap;

/// Wrapped u32 identifier for `FrameNode`s in a `FrameNodeSet` for type safety.
/// The value is the index of the node in the `nodes` vec of the set, so two
/// parents holding the same id are holding the same node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameNodeId(u32);

impl FrameNodeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A frame in a hierarchy and the frames directly beneath it, keyed by name.
/// There's no back-reference to parents; a node with several parents is just
/// an id appearing in several `children` maps.
#[derive(Clone, Debug)]
pub struct FrameNode {
    pub name: String,
    pub children: BTreeMap<String, FrameNodeId>,
}

impl FrameNode {
    pub fn new(name: &str) -> Self {
        FrameNode {
            name: name.to_string(),
            children: BTreeMap::new(),
        }
    }
}

/// Append-only arena of the nodes of one forest.
///
/// - `nodes[0]` is always the sentinel whose children are the forest's roots.
///   Its name is a label for display and is deliberately absent from
///   `name_to_id`, so no lookup can ever land on it.
/// - Every other node is registered in `name_to_id` when it's minted and is
///   never removed, which is what guarantees one node per frame name.
#[derive(Clone, Debug)]
pub struct FrameNodeSet {
    nodes: Vec<FrameNode>,
    name_to_id: BTreeMap<String, u32>,
}

impl FrameNodeSet {
    pub fn new(sentinel_name: &str) -> Self {
        FrameNodeSet {
            nodes: vec![FrameNode::new(sentinel_name)],
            name_to_id: BTreeMap::new(),
        }
    }

    pub fn sentinel_id(&self) -> FrameNodeId {
        FrameNodeId(0)
    }

    pub fn get(&self, node_id: FrameNodeId) -> &FrameNode {
        // Only we mint FrameNodeIds and we never remove nodes, so the index is
        // always in bounds.
        &self.nodes[node_id.index()]
    }

    pub fn get_mut(&mut self, node_id: FrameNodeId) -> &mut FrameNode {
        &mut self.nodes[node_id.index()]
    }

    pub fn lookup(&self, name: &str) -> Option<FrameNodeId> {
        self.name_to_id.get(name).map(|index| FrameNodeId(*index))
    }

    /// Return the node for the given name, minting an empty one if this is the
    /// first time we've heard of it.  The boolean is true when the node is new.
    pub fn ensure_node(&mut self, name: &str) -> (FrameNodeId, bool) {
        if let Some(node_id) = self.lookup(name) {
            return (node_id, false);
        }

        let index = self.nodes.len() as u32;
        self.nodes.push(FrameNode::new(name));
        self.name_to_id.insert(name.to_string(), index);
        (FrameNodeId(index), true)
    }

    /// Number of distinct named nodes, excluding the sentinel.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All named node ids in creation order.
    pub fn ids(&self) -> impl Iterator<Item = FrameNodeId> + '_ {
        (1..self.nodes.len()).map(|index| FrameNodeId(index as u32))
    }
}
