use itertools::Itertools;

use frame_hierarchy::{
    abstract_store::MemoryStore,
    file_format::frame_record::{Direction, Relation},
    hierarchy::{analyze_hierarchy, check_hierarchy, Forest},
    logging::init_logging,
};

fn frames(list: &[&str]) -> Vec<String> {
    list.iter().map(|name| name.to_string()).collect()
}

/// A, B and C under A, and D under both B and C, with both directions filled
/// in so the consistency checker has something to agree with.
fn diamond_store() -> MemoryStore {
    MemoryStore::new()
        .with_relation("A", Relation::Inheritance, Direction::Forward, &[])
        .with_relation("A", Relation::Inheritance, Direction::Reverse, &["B", "C"])
        .with_relation("B", Relation::Inheritance, Direction::Forward, &["A"])
        .with_relation("B", Relation::Inheritance, Direction::Reverse, &["D"])
        .with_relation("C", Relation::Inheritance, Direction::Forward, &["A"])
        .with_relation("C", Relation::Inheritance, Direction::Reverse, &["D"])
        .with_relation("D", Relation::Inheritance, Direction::Forward, &["B", "C"])
}

fn build(store: &MemoryStore, order: &[String]) -> Forest {
    analyze_hierarchy(store, order, "Inheritance", false).unwrap()
}

#[test]
fn test_forward_references_match_natural_order() {
    init_logging();
    let store = diamond_store();
    let stressed = build(&store, &frames(&["D", "B", "C", "A"]));
    let natural = build(&store, &frames(&["A", "B", "C", "D"]));

    assert_eq!(stressed.to_json(), natural.to_json());
    assert_eq!(stressed.root_names(), vec!["A"]);
    assert!(stressed.find_root("D").is_none());

    let a = stressed.find_root("A").unwrap();
    assert_eq!(a.child_names(), vec!["B", "C"]);
    assert_eq!(a.child("B").unwrap().child_names(), vec!["D"]);
    assert_eq!(a.child("C").unwrap().child_names(), vec!["D"]);

    insta::assert_snapshot!(stressed.render(), @r###"
    A
    ├── B
    │   └── D
    └── C
        └── D
    "###);
}

#[test]
fn test_every_order_builds_the_same_forest() {
    let store = diamond_store();
    let baseline = build(&store, &frames(&["A", "B", "C", "D"]));
    let baseline_json = baseline.to_json();
    let baseline_render = baseline.render();

    for order in frames(&["A", "B", "C", "D"]).into_iter().permutations(4) {
        let forest = build(&store, &order);
        assert_eq!(forest.to_json(), baseline_json, "order {:?}", order);
        assert_eq!(forest.render(), baseline_render, "order {:?}", order);
        assert!(check_hierarchy(&forest, &store).passed(), "order {:?}", order);
    }
}

#[test]
fn test_shared_placeholders_are_order_independent() {
    // Two children naming the same parent that never gets a record of its own.
    let store = MemoryStore::new()
        .with_relation("E", Relation::Usage, Direction::Forward, &["Ghost"])
        .with_relation("F", Relation::Usage, Direction::Forward, &["Ghost", "Other"])
        .with_relation("G", Relation::Usage, Direction::Forward, &["F"]);

    let mut shapes = vec![];
    for order in frames(&["E", "F", "G"]).into_iter().permutations(3) {
        let forest = analyze_hierarchy(&store, &order, "Usage", false).unwrap();
        shapes.push(forest.to_json());
    }
    assert!(shapes.iter().all_equal());

    let forest = analyze_hierarchy(&store, &frames(&["G", "F", "E"]), "Usage", false).unwrap();
    assert_eq!(forest.root_names(), vec!["Ghost", "Other"]);
    assert_eq!(forest.find_root("Ghost").unwrap().child_names(), vec!["E", "F"]);
    assert_eq!(
        forest.find_root("Ghost").unwrap().child("F").unwrap(),
        forest.find_root("Other").unwrap().child("F").unwrap()
    );
}

#[test]
fn test_ghost_parent_placeholder() {
    let store = MemoryStore::new().with_relation("E", Relation::Inheritance, Direction::Forward, &["Ghost"]);
    let forest = build(&store, &frames(&["E"]));

    assert_eq!(forest.root_names(), vec!["Ghost"]);
    let ghost = forest.find_root("Ghost").unwrap();
    assert_eq!(ghost.child_names(), vec!["E"]);
    assert_eq!(ghost.count_nodes(), 2);
    assert_eq!(forest.render(), "Ghost\n└── E\n");
}

#[test]
fn test_duplicate_input_is_idempotent() {
    let store = diamond_store();
    let once = build(&store, &frames(&["D", "B", "C", "A"]));
    let twice = build(&store, &frames(&["D", "B", "D", "C", "A", "B", "A"]));
    assert_eq!(once.to_json(), twice.to_json());
    assert_eq!(once.count_nodes(), twice.count_nodes());
}

#[test]
fn test_no_duplicate_nodes() {
    let store = diamond_store();
    let forest = build(&store, &frames(&["D", "C", "A", "B"]));

    // Every position named D is the one arena node for D.
    let d = forest.lookup("D").unwrap();
    assert_eq!(forest.find_anywhere("D").unwrap(), d);
    for parent in ["B", "C"] {
        assert_eq!(forest.find_anywhere(parent).unwrap().child("D").unwrap(), d);
    }
    assert_eq!(forest.count_distinct(), 4);
    // Positions: sentinel, A, B, D, C, D.
    assert_eq!(forest.count_nodes(), 6);
}

#[test]
fn test_roots_shrink_once_parents_are_known() {
    let store = diamond_store();
    let order = frames(&["D", "B", "C", "A"]);
    let mut forest = Forest::new(Relation::Inheritance, Direction::Forward);

    for frame in &order {
        let parents = match frame.as_str() {
            "A" => frames(&[]),
            "B" | "C" => frames(&["A"]),
            _ => frames(&["B", "C"]),
        };
        forest.insert(frame, &parents);
        if !parents.is_empty() {
            assert!(forest.find_root(frame).is_none(), "{} should not be a root", frame);
        }
    }
    assert_eq!(forest.to_json(), build(&store, &order).to_json());
}

#[test]
fn test_relation_name_is_validated_up_front() {
    let store = diamond_store();
    let err = analyze_hierarchy(&store, &frames(&["A"]), "Inheritence", false).unwrap_err();
    assert!(err.to_string().contains("Inheritence"));
}
