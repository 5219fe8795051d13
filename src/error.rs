//! Error types for uniquedb

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while normalizing schema metadata or generating code
#[derive(Error, Debug)]
pub enum UniqueDbError {
    #[error("Column and Table names do not match. Col: {column_table}; Table: {table}")]
    TableMismatch { column_table: String, table: String },

    #[error("Invalid table name '{name}': expected at least schema and table parts")]
    InvalidTableName { name: String },

    #[error("Invalid property: {message}")]
    InvalidProperty { message: String },

    #[error("Invalid type descriptor for '{type_name}': {message}")]
    InvalidTypeDescriptor { type_name: String, message: String },

    #[error("Cycle detected in hierarchy at path: {path}")]
    CyclicHierarchy { path: String },

    #[error("Distinct nodes compare equal in hierarchy at path: {path}")]
    DuplicateNode { path: String },

    #[error("Failed to read options file: {path}")]
    OptionsReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse options file: {path}")]
    OptionsParseError {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("Invalid options: {message}")]
    InvalidOptions { message: String },

    #[error("Failed to read introspection dump: {path}")]
    DumpReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse introspection dump: {path}")]
    DumpParseError {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("Invalid value '{value}' for attribute '{attribute}' in {path}")]
    InvalidDumpValue {
        path: PathBuf,
        attribute: String,
        value: String,
    },

    #[error("Unsupported timestamp format: {format}")]
    InvalidTimestampFormat { format: String },
}

/// Result type alias for the pure core operations
pub type Result<T> = std::result::Result<T, UniqueDbError>;
