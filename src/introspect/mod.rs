//! Raw introspection rows and the queries that produce them
//!
//! The server side of introspection is a plain query ending in `FOR XML RAW`;
//! its output is saved to a file and read back here. Nothing in this module
//! talks to a live server.

mod reader;

pub use reader::{
    parse_describe_rows, parse_schema_dump, read_describe_rows, read_dump_file, read_schema_dump,
    SchemaDump,
};

use crate::types::{convert, is_fractional_time_type, DialectProfile, RawTypeAttributes, RawTypeRow, SqlType};

/// Describes the first result set of `@tsql`, one `<row/>` per column.
pub const DESCRIBE_FIRST_RESULT_SET_SQL: &str = "\
SELECT column_ordinal, name, is_nullable, system_type_name, max_length, precision, scale, user_type_name
FROM sys.dm_exec_describe_first_result_set(@tsql, NULL, 0)
FOR XML RAW('row');";

pub const SCHEMA_TABLES_SQL: &str = "\
SELECT TABLE_CATALOG, TABLE_SCHEMA, TABLE_NAME, TABLE_TYPE
FROM INFORMATION_SCHEMA.TABLES
ORDER BY TABLE_SCHEMA, TABLE_NAME
FOR XML RAW('table');";

pub const SCHEMA_COLUMNS_SQL: &str = "\
SELECT TABLE_SCHEMA, TABLE_NAME, COLUMN_NAME, ORDINAL_POSITION, COLUMN_DEFAULT, IS_NULLABLE,
       DATA_TYPE, CHARACTER_MAXIMUM_LENGTH, NUMERIC_PRECISION, NUMERIC_SCALE, DATETIME_PRECISION
FROM INFORMATION_SCHEMA.COLUMNS
ORDER BY TABLE_SCHEMA, TABLE_NAME, ORDINAL_POSITION
FOR XML RAW('column');";

pub const SCHEMA_CONSTRAINTS_SQL: &str = "\
SELECT tc.CONSTRAINT_NAME, tc.CONSTRAINT_TYPE, tc.TABLE_SCHEMA, tc.TABLE_NAME, kcu.COLUMN_NAME,
       pk.TABLE_SCHEMA AS REFERENCED_TABLE_SCHEMA, pk.TABLE_NAME AS REFERENCED_TABLE_NAME
FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS tc
JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE kcu
  ON kcu.CONSTRAINT_SCHEMA = tc.CONSTRAINT_SCHEMA AND kcu.CONSTRAINT_NAME = tc.CONSTRAINT_NAME
LEFT JOIN INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS rc
  ON rc.CONSTRAINT_SCHEMA = tc.CONSTRAINT_SCHEMA AND rc.CONSTRAINT_NAME = tc.CONSTRAINT_NAME
LEFT JOIN INFORMATION_SCHEMA.TABLE_CONSTRAINTS pk
  ON pk.CONSTRAINT_SCHEMA = rc.UNIQUE_CONSTRAINT_SCHEMA AND pk.CONSTRAINT_NAME = rc.UNIQUE_CONSTRAINT_NAME
FOR XML RAW('constraint');";

/// One row of `sys.dm_exec_describe_first_result_set`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeResultSetRow {
    pub column_ordinal: i32,
    pub name: Option<String>,
    pub is_nullable: bool,
    /// Full system type declaration, e.g. `nvarchar(10)`; for alias types this
    /// is the underlying system type
    pub system_type_name: String,
    /// Storage length in bytes, -1 for `(max)`
    pub max_length: i32,
    pub precision: u8,
    /// Numeric scale, or fractional-seconds precision for temporal types
    pub scale: u8,
    pub user_type_name: Option<String>,
}

/// A result-set column with its normalized type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlColumn {
    pub name: String,
    pub ordinal: i32,
    pub is_nullable: bool,
    pub sql_type: SqlType,
}

impl DescribeResultSetRow {
    /// System type name without its parameter list (`nvarchar(10)` -> `nvarchar`)
    pub fn system_base_type_name(&self) -> &str {
        let name = self.system_type_name.trim();
        name.split('(').next().unwrap_or(name).trim()
    }

    /// Raw type metadata in the converter's input shape
    pub fn type_row(&self) -> RawTypeRow {
        let base_name = self.system_base_type_name();
        let temporal = is_fractional_time_type(base_name);
        let system = RawTypeAttributes {
            type_name: base_name.to_string(),
            max_length: Some(self.max_length),
            precision: (self.precision > 0).then_some(self.precision),
            scale: (!temporal).then_some(self.scale),
            datetime_precision: temporal.then_some(self.scale),
        };

        match &self.user_type_name {
            Some(user_type) if !user_type.trim().is_empty() => {
                RawTypeRow::user_defined(user_type, system)
            }
            _ => RawTypeRow::system(system),
        }
    }

    pub fn to_sql_column(&self, profile: &DialectProfile) -> SqlColumn {
        SqlColumn {
            name: self
                .name
                .clone()
                .unwrap_or_else(|| format!("Column{}", self.column_ordinal)),
            ordinal: self.column_ordinal,
            is_nullable: self.is_nullable,
            sql_type: convert(&self.type_row(), profile),
        }
    }
}
