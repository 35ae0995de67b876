use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, trace_span};

use super::forest::{Forest, NodeRef};
use super::node_set::FrameNodeId;
use crate::abstract_store::FrameRecordStore;

/// What was wrong with one position in the forest.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum InconsistencyKind {
    /// The store has no usable record for the node, which is what happens to
    /// placeholders for frames outside the store.
    MissingRecord { message: String },
    /// The node is a root but its record names parents.
    UnexpectedRoot { declared_parents: Vec<String> },
    /// The node sits under `parent` but its record doesn't name that parent.
    MissingParentLink { declared_parents: Vec<String> },
    /// The node's children differ from the ones its record declares, in
    /// either direction.
    ChildrenMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Inconsistency {
    pub node: String,
    /// `None` when the node is a root.
    pub parent: Option<String>,
    pub kind: InconsistencyKind,
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parent = self.parent.as_deref().unwrap_or("<root>");
        match &self.kind {
            InconsistencyKind::MissingRecord { message } => {
                write!(f, "{} (under {}): no record: {}", self.node, parent, message)
            }
            InconsistencyKind::UnexpectedRoot { declared_parents } => write!(
                f,
                "{} is a root but declares parents: {}",
                self.node,
                declared_parents.join(", ")
            ),
            InconsistencyKind::MissingParentLink { declared_parents } => write!(
                f,
                "{} is under {} but only declares parents: {}",
                self.node,
                parent,
                declared_parents.join(", ")
            ),
            InconsistencyKind::ChildrenMismatch {
                missing,
                unexpected,
            } => write!(
                f,
                "{} (under {}) children differ, missing: [{}], unexpected: [{}]",
                self.node,
                parent,
                missing.join(", "),
                unexpected.join(", ")
            ),
        }
    }
}

/// Outcome of `check_hierarchy`.  Problems are collected in the depth-first
/// order they were found in.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConsistencyReport {
    /// Positions visited, counted the same way as `count_nodes`.
    pub nodes_checked: usize,
    /// `count_nodes()` of the forest minus the sentinel.
    pub total_positions: usize,
    pub inconsistencies: Vec<Inconsistency>,
}

impl ConsistencyReport {
    pub fn passed(&self) -> bool {
        self.inconsistencies.is_empty()
    }

    pub fn first_failure(&self) -> Option<&Inconsistency> {
        self.inconsistencies.first()
    }

    /// Number of positions that had nothing wrong with them.
    pub fn nodes_passed(&self) -> usize {
        let failed_positions = self
            .inconsistencies
            .iter()
            .map(|problem| (&problem.node, &problem.parent))
            .unique()
            .count();
        self.nodes_checked - failed_positions
    }
}

impl fmt::Display for ConsistencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            write!(
                f,
                "Successfully passed {}/{} nodes!",
                self.nodes_checked, self.total_positions
            )
        } else {
            writeln!(
                f,
                "Failed! {}/{} nodes passed, {} problems.",
                self.nodes_passed(),
                self.total_positions,
                self.inconsistencies.len()
            )?;
            match self.first_failure() {
                Some(first) => write!(f, "First problem: {}", first),
                None => Ok(()),
            }
        }
    }
}

/// Walk the forest from the sentinel and verify every position against the
/// records it was built from.  For a node `n` found under `p`:
///
/// - `n`'s parent field (the one the forest was built from) must name `p`, or
///   be empty when `p` is the sentinel.
/// - `n`'s child field (the opposite direction of the same relation) must name
///   exactly the children `n` has, leaves included.
///
/// A node reachable from several parents is checked once per parent.  Problems
/// are reported, never raised.
pub fn check_hierarchy(forest: &Forest, store: &dyn FrameRecordStore) -> ConsistencyReport {
    let span = trace_span!("check_hierarchy", relation = %forest.relation());
    let _span_guard = span.enter();

    let mut report = ConsistencyReport {
        nodes_checked: 0,
        total_positions: forest.count_nodes() - 1,
        inconsistencies: vec![],
    };
    let sentinel = forest.sentinel();
    let mut path = vec![sentinel.id()];
    check_children(forest, store, sentinel, &mut path, &mut report);

    debug!(
        checked = report.nodes_checked,
        problems = report.inconsistencies.len(),
        "checked hierarchy"
    );
    report
}

fn check_children(
    forest: &Forest,
    store: &dyn FrameRecordStore,
    parent: NodeRef,
    path: &mut Vec<FrameNodeId>,
    report: &mut ConsistencyReport,
) {
    for node in parent.children() {
        report.nodes_checked += 1;
        check_position(forest, store, node, parent, report);

        if path.contains(&node.id()) {
            continue;
        }
        path.push(node.id());
        check_children(forest, store, node, path, report);
        path.pop();
    }
}

fn check_position(
    forest: &Forest,
    store: &dyn FrameRecordStore,
    node: NodeRef,
    parent: NodeRef,
    report: &mut ConsistencyReport,
) {
    let parent_name = if parent.is_sentinel() {
        None
    } else {
        Some(parent.name().to_string())
    };
    let mut problem = |kind| {
        report.inconsistencies.push(Inconsistency {
            node: node.name().to_string(),
            parent: parent_name.clone(),
            kind,
        })
    };

    let record = match store.lookup_record(node.name()) {
        Ok(record) => record,
        Err(err) => {
            problem(InconsistencyKind::MissingRecord {
                message: err.to_string(),
            });
            return;
        }
    };

    let declared_parents = record.related(forest.relation(), forest.direction());
    if parent.is_sentinel() {
        if !declared_parents.is_empty() {
            problem(InconsistencyKind::UnexpectedRoot {
                declared_parents: declared_parents.to_vec(),
            });
        }
    } else if !declared_parents.iter().any(|name| name == parent.name()) {
        problem(InconsistencyKind::MissingParentLink {
            declared_parents: declared_parents.to_vec(),
        });
    }

    let declared_children: BTreeSet<&str> = record
        .related(forest.relation(), forest.direction().flip())
        .iter()
        .map(|name| name.as_str())
        .collect();
    let actual_children: BTreeSet<&str> = node.child_names().into_iter().collect();
    if declared_children != actual_children {
        problem(InconsistencyKind::ChildrenMismatch {
            missing: declared_children
                .difference(&actual_children)
                .map(|name| name.to_string())
                .collect(),
            unexpected: actual_children
                .difference(&declared_children)
                .map(|name| name.to_string())
                .collect(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstract_store::MemoryStore;
    use crate::file_format::frame_record::{Direction, Relation};
    use crate::hierarchy::builder::build_hierarchy;

    fn frames(list: &[&str]) -> Vec<String> {
        list.iter().map(|name| name.to_string()).collect()
    }

    fn consistent_store() -> MemoryStore {
        MemoryStore::new()
            .with_relation("A", Relation::Inheritance, Direction::Reverse, &["B", "C"])
            .with_relation("B", Relation::Inheritance, Direction::Forward, &["A"])
            .with_relation("B", Relation::Inheritance, Direction::Reverse, &["D"])
            .with_relation("C", Relation::Inheritance, Direction::Forward, &["A"])
            .with_relation("C", Relation::Inheritance, Direction::Reverse, &["D"])
            .with_relation("D", Relation::Inheritance, Direction::Forward, &["B", "C"])
    }

    #[test]
    fn test_consistent_forest_passes() {
        let store = consistent_store();
        let forest = build_hierarchy(
            &store,
            &frames(&["D", "C", "B", "A"]),
            Relation::Inheritance,
            Direction::Forward,
        )
        .unwrap();

        let report = check_hierarchy(&forest, &store);
        assert!(report.passed(), "{}", report);
        // A, B, D, C, D: D is checked once under each parent.
        assert_eq!(report.nodes_checked, 5);
        assert_eq!(report.total_positions, 5);
        assert_eq!(report.to_string(), "Successfully passed 5/5 nodes!");
    }

    #[test]
    fn test_reverse_forest_passes() {
        let store = consistent_store();
        let forest = build_hierarchy(
            &store,
            &frames(&["A", "B", "C", "D"]),
            Relation::Inheritance,
            Direction::Reverse,
        )
        .unwrap();

        let report = check_hierarchy(&forest, &store);
        assert!(report.passed(), "{}", report);
    }

    #[test]
    fn test_leaf_with_declared_children_is_flagged() {
        // B claims D as a child, but D was never part of the build.
        let store = consistent_store();
        let forest = build_hierarchy(
            &store,
            &frames(&["A", "B", "C"]),
            Relation::Inheritance,
            Direction::Forward,
        )
        .unwrap();

        let report = check_hierarchy(&forest, &store);
        assert!(!report.passed());
        assert_eq!(
            report.first_failure(),
            Some(&Inconsistency {
                node: "B".to_string(),
                parent: Some("A".to_string()),
                kind: InconsistencyKind::ChildrenMismatch {
                    missing: vec!["D".to_string()],
                    unexpected: vec![],
                },
            })
        );
        assert_eq!(report.inconsistencies.len(), 2);
        assert_eq!(report.nodes_passed(), 1);
    }

    #[test]
    fn test_placeholder_without_record_is_flagged() {
        let store = MemoryStore::new().with_relation("E", Relation::Usage, Direction::Forward, &["Ghost"]);
        let forest =
            build_hierarchy(&store, &frames(&["E"]), Relation::Usage, Direction::Forward).unwrap();

        let report = check_hierarchy(&forest, &store);
        let first = report.first_failure().unwrap();
        assert_eq!(first.node, "Ghost");
        assert_eq!(first.parent, None);
        assert!(matches!(first.kind, InconsistencyKind::MissingRecord { .. }));
        // E itself is fine: it names Ghost and has no children.
        assert_eq!(report.inconsistencies.len(), 1);
        assert_eq!(report.nodes_checked, 2);
    }

    #[test]
    fn test_mismatched_records_are_flagged() {
        let store = MemoryStore::new()
            .with_relation("A", Relation::Inheritance, Direction::Forward, &["Z"])
            .with_relation("B", Relation::Inheritance, Direction::Forward, &["A"]);
        let mut forest = Forest::new(Relation::Inheritance, Direction::Forward);
        forest.insert("A", &[]);
        forest.insert("B", &frames(&["A"]));

        let report = check_hierarchy(&forest, &store);
        assert_eq!(
            report.inconsistencies[0].kind,
            InconsistencyKind::UnexpectedRoot {
                declared_parents: vec!["Z".to_string()]
            }
        );
        assert_eq!(
            report.inconsistencies[1].kind,
            InconsistencyKind::ChildrenMismatch {
                missing: vec![],
                unexpected: vec!["B".to_string()],
            }
        );
        assert!(report.to_string().starts_with("Failed! 1/2 nodes passed, 2 problems."));
    }

    #[test]
    fn test_foreign_parent_is_flagged() {
        let store = MemoryStore::new()
            .with_relation("A", Relation::Inheritance, Direction::Reverse, &["B"])
            .with_relation("B", Relation::Inheritance, Direction::Forward, &["Other"]);
        let mut forest = Forest::new(Relation::Inheritance, Direction::Forward);
        forest.insert("A", &[]);
        forest.insert("B", &frames(&["A"]));

        let report = check_hierarchy(&forest, &store);
        assert_eq!(report.inconsistencies.len(), 1);
        assert_eq!(
            report.inconsistencies[0],
            Inconsistency {
                node: "B".to_string(),
                parent: Some("A".to_string()),
                kind: InconsistencyKind::MissingParentLink {
                    declared_parents: vec!["Other".to_string()],
                },
            }
        );
    }
}
