//! INFORMATION_SCHEMA rows and the per-table definition aggregate

use crate::error::{Result, UniqueDbError};
use crate::types::{normalize, CharLength, DialectProfile, SqlType, TypeParams};
use crate::util::{insensitive_equals, split_on};

use super::SchemaQualifiedName;

/// `CONSTRAINT_TYPE` value of a primary-key constraint row
pub const PRIMARY_KEY_CONSTRAINT_TYPE: &str = "PRIMARY KEY";

/// `CONSTRAINT_TYPE` value of a foreign-key constraint row
pub const FOREIGN_KEY_CONSTRAINT_TYPE: &str = "FOREIGN KEY";

/// Row from `INFORMATION_SCHEMA.TABLES`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InformationSchemaTable {
    pub table_catalog: Option<String>,
    pub table_schema: String,
    pub table_name: String,
    /// "BASE TABLE" or "VIEW"
    pub table_type: String,
}

impl InformationSchemaTable {
    pub fn qualified_name(&self) -> SchemaQualifiedName {
        SchemaQualifiedName::new(&self.table_schema, &self.table_name)
    }
}

/// Row from `INFORMATION_SCHEMA.COLUMNS`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InformationSchemaColumn {
    pub table_schema: String,
    pub table_name: String,
    pub column_name: String,
    pub ordinal_position: i32,
    pub column_default: Option<String>,
    pub is_nullable: bool,
    /// Base system type name; user-defined types are already resolved here
    pub data_type: String,
    /// Length in characters, -1 for `(max)`
    pub character_maximum_length: Option<i32>,
    pub numeric_precision: Option<u8>,
    pub numeric_scale: Option<u8>,
    pub datetime_precision: Option<u8>,
}

impl InformationSchemaColumn {
    pub fn table(&self) -> SchemaQualifiedName {
        SchemaQualifiedName::new(&self.table_schema, &self.table_name)
    }

    /// Canonical descriptor for the column.
    ///
    /// INFORMATION_SCHEMA already reports character lengths as characters,
    /// so only the max sentinel needs translating.
    pub fn sql_type(&self, profile: &DialectProfile) -> SqlType {
        let length = self.character_maximum_length.and_then(|len| {
            if len == profile.max_length_sentinel {
                Some(CharLength::Max)
            } else {
                u32::try_from(len).ok().map(CharLength::Chars)
            }
        });

        normalize(
            &self.data_type.trim().to_lowercase(),
            TypeParams {
                length,
                precision: self.numeric_precision,
                scale: self.numeric_scale,
                datetime_precision: self.datetime_precision,
            },
            profile,
        )
    }
}

/// Constraint row joined from `INFORMATION_SCHEMA.TABLE_CONSTRAINTS`,
/// `KEY_COLUMN_USAGE` and (for foreign keys) `REFERENTIAL_CONSTRAINTS`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableConstraintInfo {
    pub constraint_name: String,
    pub constraint_type: String,
    pub table_schema: String,
    pub table_name: String,
    pub column_name: String,
    pub referenced_table_schema: Option<String>,
    pub referenced_table_name: Option<String>,
}

impl TableConstraintInfo {
    pub fn table(&self) -> SchemaQualifiedName {
        SchemaQualifiedName::new(&self.table_schema, &self.table_name)
    }

    /// Referenced table of a foreign-key row
    pub fn referenced_table(&self) -> Option<SchemaQualifiedName> {
        match (&self.referenced_table_schema, &self.referenced_table_name) {
            (Some(schema), Some(name)) => Some(SchemaQualifiedName::new(schema, name)),
            _ => None,
        }
    }

    pub fn is_primary_key(&self) -> bool {
        self.constraint_type.trim().eq_ignore_ascii_case(PRIMARY_KEY_CONSTRAINT_TYPE)
    }

    pub fn is_foreign_key(&self) -> bool {
        self.constraint_type.trim().eq_ignore_ascii_case(FOREIGN_KEY_CONSTRAINT_TYPE)
    }
}

/// Primary-key columns declared for a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkAnnotation {
    pub table: SchemaQualifiedName,
    pub pk_column_names: Vec<String>,
}

impl PkAnnotation {
    /// Build from a dotted table name and a comma-separated column list.
    pub fn new(table_name: &str, columns: &str) -> Result<Self> {
        Ok(Self {
            table: table_name.parse()?,
            pk_column_names: split_on(columns, ','),
        })
    }
}

/// A table's identity, columns and constraints, as introspected together.
///
/// Constructed once per table and not mutated afterwards.
#[derive(Debug, Clone)]
pub struct SchemaDefinition {
    table: InformationSchemaTable,
    columns: Vec<InformationSchemaColumn>,
    constraints: Vec<TableConstraintInfo>,
}

impl SchemaDefinition {
    pub fn new(
        table: InformationSchemaTable,
        columns: Vec<InformationSchemaColumn>,
        constraints: Vec<TableConstraintInfo>,
    ) -> Self {
        Self {
            table,
            columns,
            constraints,
        }
    }

    pub fn table(&self) -> &InformationSchemaTable {
        &self.table
    }

    pub fn table_name(&self) -> SchemaQualifiedName {
        self.table.qualified_name()
    }

    pub fn columns(&self) -> &[InformationSchemaColumn] {
        &self.columns
    }

    pub fn constraints(&self) -> &[TableConstraintInfo] {
        &self.constraints
    }

    /// Whether `column` is part of the primary key.
    ///
    /// Fails when the column belongs to a different table than this definition.
    pub fn is_column_primary_key(&self, column: &InformationSchemaColumn) -> Result<bool> {
        if column.table() != self.table_name() {
            return Err(UniqueDbError::TableMismatch {
                column_table: format!("{}.{}", column.table_schema, column.table_name),
                table: format!("{}.{}", self.table.table_schema, self.table.table_name),
            });
        }
        Ok(self.is_column_name_primary_key(&column.column_name))
    }

    /// Whether a column with this name (case-insensitive) is part of the primary key.
    pub fn is_column_name_primary_key(&self, column_name: &str) -> bool {
        self.constraints
            .iter()
            .filter(|c| c.is_primary_key())
            .any(|c| insensitive_equals(Some(c.column_name.as_str()), Some(column_name)))
    }

    /// Primary-key columns in column order.
    pub fn primary_key_columns(&self) -> Result<Vec<&InformationSchemaColumn>> {
        let mut pk_columns = Vec::new();
        for column in &self.columns {
            if self.is_column_primary_key(column)? {
                pk_columns.push(column);
            }
        }
        Ok(pk_columns)
    }

    pub fn primary_key_annotation(&self) -> Result<PkAnnotation> {
        Ok(PkAnnotation {
            table: self.table_name(),
            pk_column_names: self
                .primary_key_columns()?
                .into_iter()
                .map(|c| c.column_name.clone())
                .collect(),
        })
    }

    /// Foreign-key constraint rows declared on this table
    pub fn foreign_keys(&self) -> impl Iterator<Item = &TableConstraintInfo> {
        self.constraints.iter().filter(|c| c.is_foreign_key())
    }
}
