//! Reading `FOR XML RAW` dumps back into introspection rows

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use encoding_rs::{UTF_16LE, WINDOWS_1252};
use tracing::{debug, info};

use crate::error::{Result, UniqueDbError};
use crate::schema::{
    InformationSchemaColumn, InformationSchemaTable, SchemaDefinition, SchemaQualifiedName,
    TableConstraintInfo,
};

use super::DescribeResultSetRow;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];

/// Tables, columns and constraints of one database, as dumped by the
/// `SCHEMA_*_SQL` queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDump {
    pub tables: Vec<InformationSchemaTable>,
    pub columns: Vec<InformationSchemaColumn>,
    pub constraints: Vec<TableConstraintInfo>,
}

impl SchemaDump {
    /// Group columns and constraints under their tables, in table order.
    /// Columns are sorted by ordinal position.
    pub fn definitions(&self) -> Vec<SchemaDefinition> {
        let mut columns: HashMap<SchemaQualifiedName, Vec<InformationSchemaColumn>> =
            HashMap::new();
        for column in &self.columns {
            columns.entry(column.table()).or_default().push(column.clone());
        }

        let mut constraints: HashMap<SchemaQualifiedName, Vec<TableConstraintInfo>> =
            HashMap::new();
        for constraint in &self.constraints {
            constraints
                .entry(constraint.table())
                .or_default()
                .push(constraint.clone());
        }

        self.tables
            .iter()
            .map(|table| {
                let name = table.qualified_name();
                let mut table_columns = columns.remove(&name).unwrap_or_default();
                table_columns.sort_by_key(|c| c.ordinal_position);
                SchemaDefinition::new(
                    table.clone(),
                    table_columns,
                    constraints.remove(&name).unwrap_or_default(),
                )
            })
            .collect()
    }

    /// Foreign-key rows across all tables
    pub fn foreign_keys(&self) -> Vec<TableConstraintInfo> {
        self.constraints
            .iter()
            .filter(|c| c.is_foreign_key())
            .cloned()
            .collect()
    }

    pub fn find_table(&self, name: &SchemaQualifiedName) -> Option<&InformationSchemaTable> {
        self.tables.iter().find(|t| &t.qualified_name() == name)
    }
}

/// Read a dump file as text.
///
/// Handles a UTF-8 or UTF-16LE byte order mark (SSMS saves results as
/// UTF-16), and falls back to Windows-1252 for files that are not valid UTF-8.
pub fn read_dump_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| UniqueDbError::DumpReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    decode_dump(&bytes).ok_or_else(|| UniqueDbError::DumpReadError {
        path: path.to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "File contains invalid characters",
        ),
    })
}

fn decode_dump(bytes: &[u8]) -> Option<String> {
    if let Some(rest) = bytes.strip_prefix(UTF16LE_BOM) {
        let (decoded, had_errors) = UTF_16LE.decode_without_bom_handling(rest);
        return (!had_errors).then(|| decoded.into_owned());
    }

    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => Some(s.to_string()),
        Err(_) => {
            let (decoded, _, had_errors) = WINDOWS_1252.decode(bytes);
            (!had_errors).then(|| decoded.into_owned())
        }
    }
}

/// Read the saved output of [`DESCRIBE_FIRST_RESULT_SET_SQL`](super::DESCRIBE_FIRST_RESULT_SET_SQL).
pub fn read_describe_rows(path: &Path) -> anyhow::Result<Vec<DescribeResultSetRow>> {
    let content = read_dump_file(path)?;
    let rows = parse_describe_rows(&content, path)
        .with_context(|| format!("Failed to load result set description from {}", path.display()))?;
    info!("Read {} result set columns from {}", rows.len(), path.display());
    Ok(rows)
}

/// Read a schema dump: the concatenated output of the three `SCHEMA_*_SQL`
/// queries, in any order.
pub fn read_schema_dump(path: &Path) -> anyhow::Result<SchemaDump> {
    let content = read_dump_file(path)?;
    let dump = parse_schema_dump(&content, path)
        .with_context(|| format!("Failed to load schema dump from {}", path.display()))?;
    info!(
        "Read {} tables, {} columns and {} constraints from {}",
        dump.tables.len(),
        dump.columns.len(),
        dump.constraints.len(),
        path.display()
    );
    Ok(dump)
}

/// Parse describe rows from dump text. `source` is only used in errors.
pub fn parse_describe_rows(content: &str, source: &Path) -> Result<Vec<DescribeResultSetRow>> {
    let wrapped = wrap_fragment(content);
    let doc = parse_document(&wrapped, source)?;
    let attrs = Attributes { source };

    let mut rows = Vec::new();
    for node in doc.descendants().filter(|n| is_element(n, "row")) {
        rows.push(DescribeResultSetRow {
            column_ordinal: attrs.required_i32(&node, "column_ordinal")?,
            name: attrs.string(&node, "name"),
            is_nullable: attrs.bool(&node, "is_nullable")?.unwrap_or(true),
            system_type_name: attrs.required_string(&node, "system_type_name")?,
            max_length: attrs.i32(&node, "max_length")?.unwrap_or(0),
            precision: attrs.u8(&node, "precision")?.unwrap_or(0),
            scale: attrs.u8(&node, "scale")?.unwrap_or(0),
            user_type_name: attrs.string(&node, "user_type_name"),
        });
    }
    rows.sort_by_key(|r| r.column_ordinal);
    debug!("Parsed {} describe rows", rows.len());
    Ok(rows)
}

/// Parse a schema dump from dump text. `source` is only used in errors.
pub fn parse_schema_dump(content: &str, source: &Path) -> Result<SchemaDump> {
    let wrapped = wrap_fragment(content);
    let doc = parse_document(&wrapped, source)?;
    let attrs = Attributes { source };
    let mut dump = SchemaDump::default();

    for node in doc.descendants().filter(|n| n.is_element()) {
        if is_element(&node, "table") {
            dump.tables.push(InformationSchemaTable {
                table_catalog: attrs.string(&node, "TABLE_CATALOG"),
                table_schema: attrs.required_string(&node, "TABLE_SCHEMA")?,
                table_name: attrs.required_string(&node, "TABLE_NAME")?,
                table_type: attrs
                    .string(&node, "TABLE_TYPE")
                    .unwrap_or_else(|| "BASE TABLE".to_string()),
            });
        } else if is_element(&node, "column") {
            dump.columns.push(InformationSchemaColumn {
                table_schema: attrs.required_string(&node, "TABLE_SCHEMA")?,
                table_name: attrs.required_string(&node, "TABLE_NAME")?,
                column_name: attrs.required_string(&node, "COLUMN_NAME")?,
                ordinal_position: attrs.required_i32(&node, "ORDINAL_POSITION")?,
                column_default: attrs.string(&node, "COLUMN_DEFAULT"),
                is_nullable: attrs.bool(&node, "IS_NULLABLE")?.unwrap_or(true),
                data_type: attrs.required_string(&node, "DATA_TYPE")?,
                character_maximum_length: attrs.i32(&node, "CHARACTER_MAXIMUM_LENGTH")?,
                numeric_precision: attrs.u8(&node, "NUMERIC_PRECISION")?,
                numeric_scale: attrs.u8(&node, "NUMERIC_SCALE")?,
                datetime_precision: attrs.u8(&node, "DATETIME_PRECISION")?,
            });
        } else if is_element(&node, "constraint") {
            dump.constraints.push(TableConstraintInfo {
                constraint_name: attrs.required_string(&node, "CONSTRAINT_NAME")?,
                constraint_type: attrs.required_string(&node, "CONSTRAINT_TYPE")?,
                table_schema: attrs.required_string(&node, "TABLE_SCHEMA")?,
                table_name: attrs.required_string(&node, "TABLE_NAME")?,
                column_name: attrs.required_string(&node, "COLUMN_NAME")?,
                referenced_table_schema: attrs.string(&node, "REFERENCED_TABLE_SCHEMA"),
                referenced_table_name: attrs.string(&node, "REFERENCED_TABLE_NAME"),
            });
        }
    }

    debug!(
        "Parsed schema dump: {} tables, {} columns, {} constraints",
        dump.tables.len(),
        dump.columns.len(),
        dump.constraints.len()
    );
    Ok(dump)
}

/// `FOR XML RAW` output is a sequence of sibling elements with no root, so
/// the content is wrapped in one before parsing.
fn wrap_fragment(content: &str) -> String {
    let mut body = content.trim();
    if body.starts_with("<?xml") {
        if let Some(end) = body.find("?>") {
            body = body[end + 2..].trim_start();
        }
    }
    format!("<dump>{}</dump>", body)
}

fn parse_document<'a>(wrapped: &'a str, source: &Path) -> Result<roxmltree::Document<'a>> {
    roxmltree::Document::parse(wrapped).map_err(|e| UniqueDbError::DumpParseError {
        path: source.to_path_buf(),
        source: e,
    })
}

fn is_element(node: &roxmltree::Node, tag: &str) -> bool {
    node.is_element() && node.tag_name().name().eq_ignore_ascii_case(tag)
}

/// Case-insensitive attribute access. A missing attribute is SQL NULL, since
/// `FOR XML RAW` omits NULL columns.
struct Attributes<'p> {
    source: &'p Path,
}

impl Attributes<'_> {
    fn raw<'a>(&self, node: &roxmltree::Node<'a, '_>, name: &str) -> Option<&'a str> {
        node.attributes()
            .find(|a| a.name().eq_ignore_ascii_case(name))
            .map(|a| a.value())
    }

    fn string(&self, node: &roxmltree::Node, name: &str) -> Option<String> {
        self.raw(node, name).map(|v| v.to_string())
    }

    fn required_string(&self, node: &roxmltree::Node, name: &str) -> Result<String> {
        self.string(node, name)
            .ok_or_else(|| self.invalid(name, "<missing>"))
    }

    fn i32(&self, node: &roxmltree::Node, name: &str) -> Result<Option<i32>> {
        match self.raw(node, name) {
            None => Ok(None),
            Some(value) => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| self.invalid(name, value)),
        }
    }

    fn required_i32(&self, node: &roxmltree::Node, name: &str) -> Result<i32> {
        self.i32(node, name)?
            .ok_or_else(|| self.invalid(name, "<missing>"))
    }

    fn u8(&self, node: &roxmltree::Node, name: &str) -> Result<Option<u8>> {
        match self.raw(node, name) {
            None => Ok(None),
            Some(value) => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| self.invalid(name, value)),
        }
    }

    fn bool(&self, node: &roxmltree::Node, name: &str) -> Result<Option<bool>> {
        match self.raw(node, name) {
            None => Ok(None),
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => Ok(Some(true)),
                "0" | "false" | "no" => Ok(Some(false)),
                _ => Err(self.invalid(name, value)),
            },
        }
    }

    fn invalid(&self, attribute: &str, value: &str) -> UniqueDbError {
        UniqueDbError::InvalidDumpValue {
            path: self.source.to_path_buf(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }
}
