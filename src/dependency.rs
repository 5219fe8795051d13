//! Foreign-key dependency trees and their breadth-first work units

use std::collections::HashMap;
use std::fmt;

use tracing::warn;

use crate::error::{Result, UniqueDbError};
use crate::flatten::flatten;
use crate::schema::{SchemaQualifiedName, TableConstraintInfo};

/// A table and the tables whose foreign keys reference it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    pub table: SchemaQualifiedName,
    pub children: Vec<DependencyNode>,
}

impl DependencyNode {
    pub fn leaf(table: SchemaQualifiedName) -> Self {
        Self {
            table,
            children: Vec::new(),
        }
    }

    /// Build the tree rooted at `root` from foreign-key constraint rows.
    ///
    /// Children keep the order in which their referencing rows first appear.
    /// Rows that are not foreign keys and self-references are ignored. A
    /// table referenced again further down its own chain fails with
    /// `CyclicHierarchy`. A table reachable along two chains appears under
    /// both.
    pub fn build(root: &SchemaQualifiedName, constraints: &[TableConstraintInfo]) -> Result<Self> {
        let mut referencing: HashMap<SchemaQualifiedName, Vec<SchemaQualifiedName>> =
            HashMap::new();
        for constraint in constraints.iter().filter(|c| c.is_foreign_key()) {
            let Some(parent) = constraint.referenced_table() else {
                continue;
            };
            let child = constraint.table();
            if child == parent {
                continue;
            }
            let children = referencing.entry(parent).or_default();
            if !children.contains(&child) {
                children.push(child);
            }
        }

        let mut chain = Vec::new();
        build_node(root, &referencing, &mut chain)
    }

    /// Number of nodes in the tree, counting repeated tables once per path
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(DependencyNode::node_count)
            .sum::<usize>()
    }
}

fn build_node(
    table: &SchemaQualifiedName,
    referencing: &HashMap<SchemaQualifiedName, Vec<SchemaQualifiedName>>,
    chain: &mut Vec<SchemaQualifiedName>,
) -> Result<DependencyNode> {
    if chain.contains(table) {
        let path = chain
            .iter()
            .chain(std::iter::once(table))
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ");
        warn!("Foreign key cycle: {}", path);
        return Err(UniqueDbError::CyclicHierarchy { path });
    }

    chain.push(table.clone());
    let mut children = Vec::new();
    for child in referencing.get(table).into_iter().flatten() {
        children.push(build_node(child, referencing, chain)?);
    }
    chain.pop();

    Ok(DependencyNode {
        table: table.clone(),
        children,
    })
}

/// One root-to-table chain of the dependency tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkUnit {
    pub path: Vec<SchemaQualifiedName>,
}

impl WorkUnit {
    /// The table this unit ends at
    pub fn table(&self) -> &SchemaQualifiedName {
        &self.path[self.path.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }
}

impl fmt::Display for WorkUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.path.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(" -> "))
    }
}

/// Breadth-first, cumulative work units: the root alone, then every chain one
/// table longer, and so on.
pub fn work_units(root: &DependencyNode) -> Vec<WorkUnit> {
    flatten(root, |node| &node.children)
        .into_iter()
        .map(|path| WorkUnit {
            path: path.into_iter().map(|node| node.table.clone()).collect(),
        })
        .collect()
}
