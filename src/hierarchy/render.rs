use std::fs;
use std::path::Path;

use itertools::Itertools;
use tracing::info;

use super::forest::{Forest, NodeRef};
use super::node_set::FrameNodeId;
use crate::abstract_store::Result;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const CONTINUE: &str = "│   ";
const BLANK: &str = "    ";

/// Render a node and everything beneath it as a box-drawing tree.  The node
/// itself is printed bare; at every level children are printed in ascending
/// name order, so the output only depends on the shape of the hierarchy and
/// not on the order it was built in.
///
/// ```text
/// Event
/// ├── Change_of_state
/// │   └── Becoming
/// └── Process
/// ```
///
/// A child that is also one of its own ancestors is printed but not expanded
/// again.
pub fn render_node(node: NodeRef) -> String {
    let mut out = String::new();
    out.push_str(node.name());
    out.push('\n');
    let mut path = vec![node.id()];
    render_children(node, "", &mut path, &mut out);
    out
}

fn render_children(node: NodeRef, prefix: &str, path: &mut Vec<FrameNodeId>, out: &mut String) {
    let child_count = node.count_children();
    for (i, child) in node.children().enumerate() {
        let is_last = i + 1 == child_count;
        out.push_str(prefix);
        out.push_str(if is_last { LAST_BRANCH } else { BRANCH });
        out.push_str(child.name());
        out.push('\n');

        if path.contains(&child.id()) {
            continue;
        }
        let child_prefix = format!("{}{}", prefix, if is_last { BLANK } else { CONTINUE });
        path.push(child.id());
        render_children(child, &child_prefix, path, out);
        path.pop();
    }
}

/// Render every root of the forest as its own tree, in ascending name order,
/// with a blank line between trees.
pub fn render_forest(forest: &Forest) -> String {
    forest.roots().map(render_node).join("\n")
}

/// Write the text rendering of the forest to the given file.
pub fn save_hierarchy_to_file<P: AsRef<Path>>(forest: &Forest, path: P) -> Result<()> {
    fs::write(path.as_ref(), forest.render())?;
    info!(path = %path.as_ref().display(), "hierarchy saved");
    Ok(())
}
