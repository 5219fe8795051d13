//! uniquedb: SQL Server schema metadata, C# class generation and disposable
//! test databases
//!
//! This library normalizes raw SQL Server type metadata into canonical
//! descriptors, renders C# entity classes from introspected tables and
//! queries, orders tables by foreign-key dependency, and names the throwaway
//! databases integration tests run against.

pub mod codegen;
pub mod dependency;
pub mod error;
pub mod flatten;
pub mod introspect;
pub mod options;
pub mod provider;
pub mod schema;
pub mod types;
pub mod util;

use std::path::Path;

use anyhow::{bail, Result};
use tracing::info;

pub use codegen::GeneratorOptions;
pub use dependency::{work_units, DependencyNode, WorkUnit};
pub use error::UniqueDbError;
pub use options::UniqueDbOptions;
pub use provider::UniqueDbProvider;
pub use schema::SchemaQualifiedName;
pub use types::{DialectProfile, SqlType};

/// Generate classes for the tables in a schema dump.
///
/// With `table` set, only that table is generated; it must exist in the dump.
pub fn generate_from_schema_dump(
    path: &Path,
    table: Option<&SchemaQualifiedName>,
    options: &GeneratorOptions,
) -> Result<Vec<String>> {
    let dump = introspect::read_schema_dump(path)?;
    let mut definitions = dump.definitions();

    if let Some(table) = table {
        definitions.retain(|d| &d.table_name() == table);
        if definitions.is_empty() {
            bail!("Table {} not found in {}", table, path.display());
        }
    }

    let classes = codegen::generate_classes(&definitions, options)?;
    info!("Generated {} classes from {}", classes.len(), path.display());
    Ok(classes)
}

/// Generate one class from a saved result-set description.
pub fn generate_from_describe_dump(
    path: &Path,
    class_name: &str,
    options: &GeneratorOptions,
) -> Result<String> {
    let rows = introspect::read_describe_rows(path)?;
    if rows.is_empty() {
        bail!("No result set columns in {}", path.display());
    }
    Ok(codegen::generate_class_from_describe_rows(
        class_name, &rows, options,
    )?)
}

/// Foreign-key work units for `root` from the constraints in a schema dump.
pub fn dependency_work_units(path: &Path, root: &SchemaQualifiedName) -> Result<Vec<WorkUnit>> {
    let dump = introspect::read_schema_dump(path)?;
    if dump.find_table(root).is_none() {
        bail!("Table {} not found in {}", root, path.display());
    }
    let tree = DependencyNode::build(root, &dump.foreign_keys())?;
    let units = work_units(&tree);
    info!("{} work units under {}", units.len(), root);
    Ok(units)
}
