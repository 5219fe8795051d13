//! Mapping between canonical SQL types and C# (CLR) types

use crate::types::{SqlType, SqlTypeCategory};

/// C# type used to declare a property for a column of `sql_type`.
///
/// Spatial and hierarchical types map to their `Microsoft.SqlServer.Types`
/// representation; anything unrecognized falls back to `object`.
pub fn clr_type_for(sql_type: &SqlType) -> &'static str {
    match sql_type.type_name.as_str() {
        "bigint" => "long",
        "int" => "int",
        "smallint" => "short",
        "tinyint" => "byte",
        "bit" => "bool",
        "decimal" | "numeric" | "money" | "smallmoney" => "decimal",
        "float" => "double",
        "real" => "float",
        "date" | "datetime" | "datetime2" | "smalldatetime" => "DateTime",
        "datetimeoffset" => "DateTimeOffset",
        "time" => "TimeSpan",
        "char" | "nchar" | "varchar" | "nvarchar" | "text" | "ntext" | "sysname" => "string",
        "binary" | "varbinary" | "image" | "timestamp" | "rowversion" => "byte[]",
        "uniqueidentifier" => "Guid",
        "xml" => "XElement",
        "hierarchyid" => "SqlHierarchyId",
        "geometry" => "SqlGeometry",
        "geography" => "SqlGeography",
        _ => "object",
    }
}

/// Host-language primitive types that can back a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClrType {
    Bool,
    Byte,
    Int16,
    Int32,
    Int64,
    UInt16,
    UInt32,
    UInt64,
    Decimal,
    Double,
    Single,
    ByteArray,
    DateTime,
    DateTimeOffset,
    TimeSpan,
    String,
    Guid,
    SqlHierarchyId,
    XElement,
    Object,
}

impl ClrType {
    /// Parse a C# keyword or framework type name (`int`, `Int32`, `System.Int32`).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().trim_end_matches('?');
        let name = name.strip_prefix("System.").unwrap_or(name);
        let clr_type = match name {
            "bool" | "Boolean" => ClrType::Bool,
            "byte" | "Byte" => ClrType::Byte,
            "short" | "Int16" => ClrType::Int16,
            "int" | "Int32" => ClrType::Int32,
            "long" | "Int64" => ClrType::Int64,
            "ushort" | "UInt16" => ClrType::UInt16,
            "uint" | "UInt32" => ClrType::UInt32,
            "ulong" | "UInt64" => ClrType::UInt64,
            "decimal" | "Decimal" => ClrType::Decimal,
            "double" | "Double" => ClrType::Double,
            "float" | "Single" => ClrType::Single,
            "byte[]" | "Byte[]" => ClrType::ByteArray,
            "DateTime" => ClrType::DateTime,
            "DateTimeOffset" => ClrType::DateTimeOffset,
            "TimeSpan" => ClrType::TimeSpan,
            "string" | "String" => ClrType::String,
            "Guid" => ClrType::Guid,
            "SqlHierarchyId" => ClrType::SqlHierarchyId,
            "XElement" => ClrType::XElement,
            "object" | "Object" => ClrType::Object,
            _ => return None,
        };
        Some(clr_type)
    }

    /// The C# keyword or type name used in declarations
    pub fn keyword(&self) -> &'static str {
        match self {
            ClrType::Bool => "bool",
            ClrType::Byte => "byte",
            ClrType::Int16 => "short",
            ClrType::Int32 => "int",
            ClrType::Int64 => "long",
            ClrType::UInt16 => "ushort",
            ClrType::UInt32 => "uint",
            ClrType::UInt64 => "ulong",
            ClrType::Decimal => "decimal",
            ClrType::Double => "double",
            ClrType::Single => "float",
            ClrType::ByteArray => "byte[]",
            ClrType::DateTime => "DateTime",
            ClrType::DateTimeOffset => "DateTimeOffset",
            ClrType::TimeSpan => "TimeSpan",
            ClrType::String => "string",
            ClrType::Guid => "Guid",
            ClrType::SqlHierarchyId => "SqlHierarchyId",
            ClrType::XElement => "XElement",
            ClrType::Object => "object",
        }
    }

    /// SQL category a value of this type is stored as
    pub fn sql_category(&self) -> SqlTypeCategory {
        match self {
            ClrType::Bool
            | ClrType::Byte
            | ClrType::Int16
            | ClrType::Int32
            | ClrType::Int64
            | ClrType::UInt16
            | ClrType::UInt32
            | ClrType::UInt64
            | ClrType::Decimal
            | ClrType::Double
            | ClrType::Single => SqlTypeCategory::Numeric,
            ClrType::ByteArray => SqlTypeCategory::Binary,
            ClrType::DateTime | ClrType::DateTimeOffset | ClrType::TimeSpan => {
                SqlTypeCategory::DateTime
            }
            ClrType::String => SqlTypeCategory::Character,
            ClrType::Guid | ClrType::XElement => SqlTypeCategory::Other,
            ClrType::SqlHierarchyId => SqlTypeCategory::Special,
            ClrType::Object => SqlTypeCategory::Unknown,
        }
    }

    /// Whether values of this type map directly onto a SQL Server system type
    pub fn is_sql_system_type(&self) -> bool {
        !matches!(
            self,
            ClrType::Single | ClrType::DateTimeOffset | ClrType::Object
        )
    }
}
