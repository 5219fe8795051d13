//! Schema-qualified object names

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::UniqueDbError;
use crate::util::{bracketize, debracketize};

/// A `(schema, name)` pair compared case-insensitively.
///
/// Bracket decoration is stripped on construction and added back by
/// `Display` when a schema is present.
#[derive(Debug, Clone, Eq)]
pub struct SchemaQualifiedName {
    schema: String,
    name: String,
}

impl SchemaQualifiedName {
    pub fn new(schema: &str, name: &str) -> Self {
        Self {
            schema: debracketize(schema.trim()),
            name: debracketize(name.trim()),
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for SchemaQualifiedName {
    type Err = UniqueDbError;

    /// Parse a dotted name such as `[dbo].[Users]`. The first segment is the
    /// schema; everything after it is the object name.
    fn from_str(full_name: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = full_name.split('.').filter(|p| !p.is_empty()).collect();
        if parts.len() < 2 {
            return Err(UniqueDbError::InvalidTableName {
                name: full_name.to_string(),
            });
        }
        Ok(Self::new(parts[0], &parts[1..].join(".")))
    }
}

impl PartialEq for SchemaQualifiedName {
    fn eq(&self, other: &Self) -> bool {
        self.schema.eq_ignore_ascii_case(&other.schema) && self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Hash for SchemaQualifiedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.schema.to_ascii_lowercase().hash(state);
        self.name.to_ascii_lowercase().hash(state);
    }
}

impl fmt::Display for SchemaQualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.schema.trim().is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", bracketize(&self.schema), bracketize(&self.name))
        }
    }
}
