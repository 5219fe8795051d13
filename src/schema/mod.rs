//! Table identity and per-table schema facts

mod definition;
mod name;

pub use definition::*;
pub use name::SchemaQualifiedName;
