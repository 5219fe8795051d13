//! Static classification of SQL Server type names.
//!
//! All lookups are case-insensitive. Unknown names simply classify as
//! nothing; none of these functions fail.

use std::collections::HashSet;
use std::sync::LazyLock;

const CHARACTER_TYPES: &[&str] = &["char", "nchar", "varchar", "nvarchar"];

const WIDE_CHARACTER_TYPES: &[&str] = &["nchar", "nvarchar"];

const NUMERIC_TYPES: &[&str] = &[
    "bigint",
    "bit",
    "decimal",
    "int",
    "money",
    "numeric",
    "smallint",
    "smallmoney",
    "tinyint",
    "float",
    "real",
];

const DECIMAL_TYPES: &[&str] = &["decimal", "numeric"];

const FRACTIONAL_TIME_TYPES: &[&str] = &["datetime2", "datetimeoffset", "time"];

const SPECIAL_TYPES: &[&str] = &["hierarchyid", "geometry", "geography", "sysname"];

static SYSTEM_TYPES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // exact and approximate numerics
        "bigint",
        "bit",
        "decimal",
        "int",
        "money",
        "numeric",
        "smallint",
        "smallmoney",
        "tinyint",
        "float",
        "real",
        // date and time
        "date",
        "datetime2",
        "datetime",
        "datetimeoffset",
        "smalldatetime",
        "time",
        // character strings
        "char",
        "nchar",
        "varchar",
        "nvarchar",
        "text",
        "ntext",
        // binary strings
        "binary",
        "image",
        "varbinary",
        // other
        "cursor",
        "hierarchyid",
        "sql_variant",
        "table",
        "timestamp",
        "rowversion",
        "uniqueidentifier",
        "xml",
        "geometry",
        "geography",
        "sysname",
    ]
    .into_iter()
    .collect()
});

/// Broad category of a SQL type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlTypeCategory {
    Character,
    Numeric,
    DateTime,
    Binary,
    /// Spatial, hierarchical and system alias types without a primitive mapping
    Special,
    /// Other system types (xml, uniqueidentifier, sql_variant, ...)
    Other,
    Unknown,
}

fn contains(list: &[&str], sql_type_name: &str) -> bool {
    let lowered = sql_type_name.trim().to_lowercase();
    list.contains(&lowered.as_str())
}

pub fn is_character_type(sql_type_name: &str) -> bool {
    contains(CHARACTER_TYPES, sql_type_name)
}

/// Double-byte character types whose raw storage length is twice the character count
pub fn is_wide_character_type(sql_type_name: &str) -> bool {
    contains(WIDE_CHARACTER_TYPES, sql_type_name)
}

pub fn is_numeric_type(sql_type_name: &str) -> bool {
    contains(NUMERIC_TYPES, sql_type_name)
}

/// The `decimal`/`numeric` family that carries precision and scale
pub fn is_decimal_type(sql_type_name: &str) -> bool {
    contains(DECIMAL_TYPES, sql_type_name)
}

pub fn is_fractional_time_type(sql_type_name: &str) -> bool {
    contains(FRACTIONAL_TIME_TYPES, sql_type_name)
}

pub fn is_known_system_type(sql_type_name: &str) -> bool {
    SYSTEM_TYPES.contains(sql_type_name.trim().to_lowercase().as_str())
}

pub fn is_opaque_special_type(sql_type_name: &str) -> bool {
    contains(SPECIAL_TYPES, sql_type_name)
}

/// Classify a type name into its broad category.
pub fn category_of(sql_type_name: &str) -> SqlTypeCategory {
    if is_opaque_special_type(sql_type_name) {
        return SqlTypeCategory::Special;
    }
    if is_character_type(sql_type_name) {
        return SqlTypeCategory::Character;
    }
    if is_numeric_type(sql_type_name) {
        return SqlTypeCategory::Numeric;
    }
    if !is_known_system_type(sql_type_name) {
        return SqlTypeCategory::Unknown;
    }
    match sql_type_name.trim().to_lowercase().as_str() {
        "date" | "datetime" | "datetime2" | "datetimeoffset" | "smalldatetime" | "time" => {
            SqlTypeCategory::DateTime
        }
        "binary" | "varbinary" | "image" | "timestamp" | "rowversion" => SqlTypeCategory::Binary,
        "text" | "ntext" => SqlTypeCategory::Character,
        _ => SqlTypeCategory::Other,
    }
}
