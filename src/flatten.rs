//! Breadth-first enumeration of root-to-node paths.
//!
//! Works over any hierarchy through a "children of" projection, so
//! dependency trees, constraint trees and ad-hoc node types can all be
//! linearized the same way.
//!
//! ```ignore
//! let paths = flatten(&root, |node| &node.children);
//! // paths[0] == [&root], then every depth-1 path, then depth-2, ...
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::ptr;

use crate::error::{Result, UniqueDbError};

/// Every root-to-node path of the hierarchy under `root`, in breadth-first
/// order of discovery. Each path is ordered root first.
///
/// The hierarchy must be finite and acyclic; a cycle reachable from `root`
/// never terminates. Use [`try_flatten`] for untrusted structures.
pub fn flatten<'a, N, F, I>(root: &'a N, mut children_of: F) -> Vec<Vec<&'a N>>
where
    F: FnMut(&'a N) -> I,
    I: IntoIterator<Item = &'a N>,
{
    let mut queue: VecDeque<Vec<&'a N>> = VecDeque::new();
    queue.push_back(vec![root]);
    let mut output = Vec::new();

    while let Some(path) = queue.pop_front() {
        let last = path[path.len() - 1];
        for child in children_of(last) {
            queue.push_back(extend_path(&path, child));
        }
        output.push(path);
    }

    output
}

/// Like [`flatten`], but tracks nodes by identity and rejects structures the
/// plain walk cannot handle:
///
/// - a node that reappears on its own path fails with `CyclicHierarchy`
/// - two distinct nodes that compare equal by value fail with `DuplicateNode`
///
/// The same node instance reached through several parents is allowed and
/// appears once per path.
pub fn try_flatten<'a, N, F, I>(root: &'a N, mut children_of: F) -> Result<Vec<Vec<&'a N>>>
where
    N: PartialEq + fmt::Debug,
    F: FnMut(&'a N) -> I,
    I: IntoIterator<Item = &'a N>,
{
    let mut queue: VecDeque<Vec<&'a N>> = VecDeque::new();
    queue.push_back(vec![root]);
    let mut seen: Vec<&'a N> = Vec::new();
    let mut output = Vec::new();

    while let Some(path) = queue.pop_front() {
        let last = path[path.len() - 1];

        if !seen.iter().any(|node| ptr::eq(*node, last)) {
            if seen.iter().any(|node| *node == last) {
                return Err(UniqueDbError::DuplicateNode {
                    path: describe_path(&path),
                });
            }
            seen.push(last);
        }

        for child in children_of(last) {
            if path.iter().any(|node| ptr::eq(*node, child)) {
                return Err(UniqueDbError::CyclicHierarchy {
                    path: describe_path(&extend_path(&path, child)),
                });
            }
            queue.push_back(extend_path(&path, child));
        }
        output.push(path);
    }

    Ok(output)
}

fn extend_path<'a, N>(path: &[&'a N], child: &'a N) -> Vec<&'a N> {
    let mut next = Vec::with_capacity(path.len() + 1);
    next.extend_from_slice(path);
    next.push(child);
    next
}

fn describe_path<N: fmt::Debug>(path: &[&N]) -> String {
    path.iter()
        .map(|node| format!("{:?}", node))
        .collect::<Vec<_>>()
        .join(" -> ")
}
