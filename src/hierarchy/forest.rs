use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use serde_json::{json, Value};
use tracing::{trace, warn};

use super::node_set::{FrameNode, FrameNodeId, FrameNodeSet};
use super::render::{render_forest, render_node};
use crate::file_format::frame_record::{Direction, Relation};

/**
The roots of a frame hierarchy for one relation and direction, plus every node
reachable beneath them.

### Structure

Nodes live in a `FrameNodeSet` arena and refer to their children by
`FrameNodeId`, so a frame with two parents is one node whose id sits in both
parents' `children` maps.  Once parents share children the structure is a DAG
rather than a tree, and nothing stops the source data from describing a cycle,
so everything that walks the forest tracks which nodes are on its current path.

The roots are simply the children of the sentinel node in arena slot 0, which
means search, counting, deletion and rendering treat "the forest" and "a node"
the same way.

### Incremental insertion

Records arrive in whatever order the caller has them, so a record frequently
names a parent we haven't seen yet.  When that happens we mint a placeholder
node for the parent and make it a root holding the child.  When the parent's
own record shows up later, the arena hands back that same placeholder and the
record fills it in.  Because the arena is keyed by name, a second child naming
the same unresolved parent lands under the existing placeholder instead of a
fresh one, which is what makes the final shape independent of input order.

A node stays a root exactly until a record gives it a parent; at that point it
is moved out of the sentinel's children and only lives under its parents.
*/
#[derive(Clone, Debug)]
pub struct Forest {
    relation: Relation,
    direction: Direction,
    node_set: FrameNodeSet,
}

impl Forest {
    pub fn new(relation: Relation, direction: Direction) -> Self {
        let sentinel_name = match direction {
            Direction::Forward => format!("[{}]", relation.name()),
            Direction::Reverse => format!("[{} reversed]", relation.name()),
        };
        Forest {
            relation,
            direction,
            node_set: FrameNodeSet::new(&sentinel_name),
        }
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn sentinel(&self) -> NodeRef<'_> {
        self.node(self.node_set.sentinel_id())
    }

    pub fn node(&self, id: FrameNodeId) -> NodeRef<'_> {
        NodeRef { forest: self, id }
    }

    /// Look up any node this forest has ever created for the given name,
    /// whether or not it's currently reachable from a root.
    pub fn lookup(&self, name: &str) -> Option<NodeRef<'_>> {
        self.node_set.lookup(name).map(|id| self.node(id))
    }

    /// Is the given frame currently a root?  Only the top level is consulted.
    pub fn find_root(&self, name: &str) -> Option<NodeRef<'_>> {
        self.sentinel().child(name)
    }

    /// Depth-first search over all roots and their subtrees.
    pub fn find_anywhere(&self, name: &str) -> Option<NodeRef<'_>> {
        self.sentinel().find(name)
    }

    /// The roots in ascending name order.
    pub fn roots(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.sentinel().children()
    }

    pub fn root_names(&self) -> Vec<&str> {
        self.roots().map(|root| root.name()).collect()
    }

    pub fn count_roots(&self) -> usize {
        self.sentinel().count_children()
    }

    /// Number of positions in the forest including the sentinel; see
    /// `NodeRef::count_nodes`.
    pub fn count_nodes(&self) -> usize {
        self.sentinel().count_nodes()
    }

    /// Number of distinct frames the forest has created nodes for.
    pub fn count_distinct(&self) -> usize {
        self.node_set.len()
    }

    /// Place the frame `name` into the forest beneath each of `parents`, or as
    /// a root if it has none, returning its node id.
    ///
    /// - With no parents, a frame that isn't reachable from a root becomes a
    ///   root.  A frame already in the forest (e.g. as a placeholder) is left
    ///   where it is.
    /// - Each parent is resolved by name among the reachable nodes.  A parent
    ///   that isn't reachable, because nobody has mentioned it yet or because
    ///   it was deleted, becomes a placeholder root.  Attaching under the same
    ///   parent twice is a no-op.
    /// - Once the frame has at least one parent it is no longer a root.
    pub fn insert(&mut self, name: &str, parents: &[String]) -> FrameNodeId {
        let (node_id, is_new) = self.node_set.ensure_node(name);
        let sentinel_id = self.node_set.sentinel_id();

        if parents.is_empty() {
            if is_new || !self.reaches(sentinel_id, node_id) {
                trace!(frame = name, "new root");
                self.attach(sentinel_id, node_id);
            }
            return node_id;
        }

        for parent in parents {
            let parent_id = match self.node_set.lookup(parent) {
                Some(parent_id) if self.reaches(sentinel_id, parent_id) => parent_id,
                known => {
                    // A parent that was deleted out of the forest comes back as
                    // a root placeholder, reusing its node so names stay unique.
                    trace!(
                        frame = name,
                        parent = %parent,
                        detached = known.is_some(),
                        "creating placeholder parent"
                    );
                    let (placeholder_id, _) = self.node_set.ensure_node(parent);
                    self.attach(sentinel_id, placeholder_id);
                    placeholder_id
                }
            };
            self.attach(parent_id, node_id);
        }

        if self.node_set.get_mut(sentinel_id).children.remove(name).is_some() {
            trace!(frame = name, "no longer a root");
        }

        node_id
    }

    fn attach(&mut self, parent_id: FrameNodeId, child_id: FrameNodeId) {
        if parent_id != self.node_set.sentinel_id() && self.reaches(child_id, parent_id) {
            warn!(
                parent = %self.node_set.get(parent_id).name,
                child = %self.node_set.get(child_id).name,
                relation = %self.relation,
                "edge closes a cycle"
            );
        }
        let child_name = self.node_set.get(child_id).name.clone();
        self.node_set
            .get_mut(parent_id)
            .children
            .insert(child_name, child_id);
    }

    /// Can `target` be reached from `from` (including `from == target`)?
    fn reaches(&self, from: FrameNodeId, target: FrameNodeId) -> bool {
        let mut seen = HashSet::new();
        let mut pending = vec![from];
        while let Some(id) = pending.pop() {
            if id == target {
                return true;
            }
            if seen.insert(id) {
                pending.extend(self.node_set.get(id).children.values().copied());
            }
        }
        false
    }

    /// Remove the named child from the given parent's children, if present.
    /// The child node itself stays in the arena and under any other parents.
    pub fn delete_child(&mut self, parent_id: FrameNodeId, child_name: &str) {
        self.node_set.get_mut(parent_id).children.remove(child_name);
    }

    /// Remove the named root, if it is one.
    pub fn delete_root(&mut self, name: &str) {
        let sentinel_id = self.node_set.sentinel_id();
        self.delete_child(sentinel_id, name);
    }

    pub fn render(&self) -> String {
        render_forest(self)
    }

    /// Every frame reachable from a root mapped to the names of its children.
    /// Two forests with equal structures and equal roots are the same forest
    /// for all practical purposes, regardless of how they were built.
    pub fn structure(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut structure: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut pending: Vec<NodeRef> = self.roots().collect();
        while let Some(node) = pending.pop() {
            if structure.contains_key(node.name()) {
                continue;
            }
            structure.insert(
                node.name().to_string(),
                node.child_names().into_iter().map(|name| name.to_string()).collect(),
            );
            pending.extend(node.children());
        }
        structure
    }

    /// A `{ relation, direction, roots, nodes }` JSON rep where `roots` is a
    /// sorted array of names and `nodes` maps each reachable frame to its
    /// sorted child names.  Everything is sorted for stability in tests and
    /// for human readability.
    pub fn to_json(&self) -> Value {
        let direction = match self.direction {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        };
        json!({
            "relation": self.relation.name(),
            "direction": direction,
            "roots": self.root_names(),
            "nodes": self.structure(),
        })
    }
}

/// A borrowed handle on one node of a `Forest`.  Two handles compare equal
/// when they refer to the same node of the same forest.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    forest: &'a Forest,
    id: FrameNodeId,
}

impl<'a> NodeRef<'a> {
    fn data(&self) -> &'a FrameNode {
        self.forest.node_set.get(self.id)
    }

    pub fn id(&self) -> FrameNodeId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    pub fn is_sentinel(&self) -> bool {
        self.id == self.forest.node_set.sentinel_id()
    }

    /// Children in ascending name order.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let forest = self.forest;
        self.data()
            .children
            .values()
            .map(move |id| NodeRef { forest, id: *id })
    }

    pub fn child_names(&self) -> Vec<&'a str> {
        self.data().children.keys().map(|name| name.as_str()).collect()
    }

    pub fn child(&self, name: &str) -> Option<NodeRef<'a>> {
        let forest = self.forest;
        self.data()
            .children
            .get(name)
            .map(|id| NodeRef { forest, id: *id })
    }

    pub fn count_children(&self) -> usize {
        self.data().children.len()
    }

    /// Depth-first search for the named frame, this node first.  The sentinel
    /// never matches.
    pub fn find(&self, name: &str) -> Option<NodeRef<'a>> {
        let mut seen = HashSet::new();
        self.find_helper(name, &mut seen)
    }

    fn find_helper(&self, name: &str, seen: &mut HashSet<FrameNodeId>) -> Option<NodeRef<'a>> {
        if !self.is_sentinel() && self.name() == name {
            return Some(*self);
        }
        if !seen.insert(self.id) {
            return None;
        }
        self.children().find_map(|child| child.find_helper(name, seen))
    }

    /// 1 plus the node count of each child.  A node shared by several parents
    /// is counted once per parent, so this counts positions rather than
    /// distinct frames.  A child that is already an ancestor on the current
    /// path counts as 1 and isn't descended into.
    pub fn count_nodes(&self) -> usize {
        let mut path = vec![];
        self.count_helper(&mut path)
    }

    fn count_helper(&self, path: &mut Vec<FrameNodeId>) -> usize {
        if path.contains(&self.id) {
            return 1;
        }
        path.push(self.id);
        let count = 1 + self
            .children()
            .map(|child| child.count_helper(path))
            .sum::<usize>();
        path.pop();
        count
    }

    pub fn render(&self) -> String {
        render_node(*self)
    }
}

impl<'a> PartialEq for NodeRef<'a> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.forest, other.forest) && self.id == other.id
    }
}

impl<'a> fmt::Debug for NodeRef<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("children", &self.child_names())
            .finish()
    }
}
