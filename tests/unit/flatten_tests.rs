//! Unit tests for breadth-first path flattening

use uniquedb::error::UniqueDbError;
use uniquedb::flatten::{flatten, try_flatten};

#[derive(Debug, PartialEq)]
struct Node {
    name: String,
    children: Vec<Node>,
}

impl Node {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            children: Vec::new(),
        }
    }

    fn with_children(name: &str, children: Vec<Node>) -> Self {
        Self {
            name: name.to_string(),
            children,
        }
    }
}

fn names(paths: &[Vec<&Node>]) -> Vec<Vec<String>> {
    paths
        .iter()
        .map(|path| path.iter().map(|n| n.name.clone()).collect())
        .collect()
}

// ============================================================================
// Shape Tests
// ============================================================================

#[test]
fn test_single_root() {
    let root = Node::new("root");
    let paths = flatten(&root, |n| &n.children);

    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].len(), 1);
    assert!(std::ptr::eq(paths[0][0], &root));
}

#[test]
fn test_one_child() {
    let root = Node::with_children("root", vec![Node::new("child1")]);
    let paths = flatten(&root, |n| &n.children);

    assert_eq!(names(&paths), vec![vec!["root"], vec!["root", "child1"]]);
    assert!(std::ptr::eq(paths[1][1], &root.children[0]));
}

#[test]
fn test_deep_child() {
    let root = Node::with_children(
        "root",
        vec![Node::with_children("child1", vec![Node::new("child1.child1")])],
    );
    let paths = flatten(&root, |n| &n.children);

    assert_eq!(paths.len(), 3);
    assert_eq!(paths[0].len(), 1);
    assert_eq!(paths[1].len(), 2);
    assert_eq!(paths[2].len(), 3);
    assert_eq!(
        names(&paths)[2],
        vec!["root", "child1", "child1.child1"]
    );
}

#[test]
fn test_wide_children() {
    let root = Node::with_children("root", vec![Node::new("child1"), Node::new("child2")]);
    let paths = flatten(&root, |n| &n.children);

    assert_eq!(
        names(&paths),
        vec![
            vec!["root"],
            vec!["root", "child1"],
            vec!["root", "child2"],
        ]
    );
}

#[test]
fn test_paths_are_breadth_first() {
    // root -> a -> a1, root -> b -> b1
    let root = Node::with_children(
        "root",
        vec![
            Node::with_children("a", vec![Node::new("a1")]),
            Node::with_children("b", vec![Node::new("b1")]),
        ],
    );
    let paths = flatten(&root, |n| &n.children);
    let lengths: Vec<usize> = paths.iter().map(Vec::len).collect();

    assert_eq!(lengths, vec![1, 2, 2, 3, 3]);
    for window in paths.windows(2) {
        assert!(window[0].len() <= window[1].len());
    }
}

#[test]
fn test_every_path_extends_an_earlier_one() {
    let root = Node::with_children(
        "root",
        vec![
            Node::with_children("a", vec![Node::new("a1"), Node::new("a2")]),
            Node::new("b"),
        ],
    );
    let paths = flatten(&root, |n| &n.children);

    for (i, path) in paths.iter().enumerate().skip(1) {
        let prefix = &path[..path.len() - 1];
        assert!(
            paths[..i].iter().any(|earlier| earlier.as_slice() == prefix),
            "path {:?} has no earlier prefix",
            names(&paths)[i]
        );
    }
}

// ============================================================================
// Checked Flattening
// ============================================================================

#[test]
fn test_try_flatten_matches_flatten_on_trees() {
    let root = Node::with_children(
        "root",
        vec![Node::with_children("a", vec![Node::new("a1")]), Node::new("b")],
    );
    let checked = try_flatten(&root, |n| &n.children).unwrap();
    let plain = flatten(&root, |n| &n.children);
    assert_eq!(names(&checked), names(&plain));
}

#[test]
fn test_try_flatten_rejects_equal_distinct_nodes() {
    let root = Node::with_children("root", vec![Node::new("same"), Node::new("same")]);
    let result = try_flatten(&root, |n| &n.children);
    assert!(matches!(result, Err(UniqueDbError::DuplicateNode { .. })));
}

/// Arena-backed graph where children are looked up by index, so cycles and
/// shared nodes can be expressed.
#[derive(Debug, PartialEq)]
struct GraphNode {
    id: usize,
    edges: Vec<usize>,
}

#[test]
fn test_try_flatten_allows_shared_instance() {
    // 0 -> 1, 0 -> 2, 1 -> 3, 2 -> 3
    let arena = vec![
        GraphNode { id: 0, edges: vec![1, 2] },
        GraphNode { id: 1, edges: vec![3] },
        GraphNode { id: 2, edges: vec![3] },
        GraphNode { id: 3, edges: vec![] },
    ];
    let paths = try_flatten(&arena[0], |n| n.edges.iter().map(|&i| &arena[i])).unwrap();
    let ends: Vec<usize> = paths.iter().map(|p| p[p.len() - 1].id).collect();
    assert_eq!(ends, vec![0, 1, 2, 3, 3]);
}

#[test]
fn test_try_flatten_rejects_cycles() {
    // 0 -> 1 -> 2 -> 0
    let arena = vec![
        GraphNode { id: 0, edges: vec![1] },
        GraphNode { id: 1, edges: vec![2] },
        GraphNode { id: 2, edges: vec![0] },
    ];
    let result = try_flatten(&arena[0], |n| n.edges.iter().map(|&i| &arena[i]));
    assert!(matches!(result, Err(UniqueDbError::CyclicHierarchy { .. })));
}
