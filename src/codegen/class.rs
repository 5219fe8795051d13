//! Whole-class generation

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::introspect::DescribeResultSetRow;
use crate::schema::SchemaDefinition;
use crate::types::{is_opaque_special_type, CharLength, SqlType};

use super::clr::clr_type_for;
use super::property::{CSharpProperty, DataAnnotation};
use super::GeneratorOptions;

/// Minimum number of tables before class generation fans out across threads.
const PARALLEL_THRESHOLD: usize = 8;

const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "static", "string", "struct", "switch", "this", "throw", "true", "try", "typeof",
    "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual", "void", "volatile",
    "while",
];

/// Turn a database identifier into a valid C# identifier.
///
/// Invalid characters become `_`, a leading digit gets a `_` prefix and
/// keywords are escaped with `@`.
pub fn sanitize_identifier(name: &str) -> String {
    let mut ident: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if CSHARP_KEYWORDS.contains(&ident.as_str()) {
        ident.insert(0, '@');
    }
    ident
}

/// Build the property descriptor for one column.
pub fn property_for_column(
    column_name: &str,
    sql_type: &SqlType,
    is_nullable: bool,
    is_primary_key: bool,
) -> CSharpProperty {
    let name = sanitize_identifier(column_name);
    let data_type = clr_type_for(sql_type);
    let mut annotations = Vec::new();

    if is_primary_key {
        annotations.push(DataAnnotation::Key);
    }
    if !is_nullable && matches!(data_type, "string" | "byte[]") {
        annotations.push(DataAnnotation::Required);
    }
    match sql_type.maximum_char_length {
        Some(CharLength::Chars(n)) => annotations.push(DataAnnotation::StringLength(n)),
        Some(CharLength::Max) => annotations.push(DataAnnotation::MaxLength),
        None => {}
    }

    let renamed = name.trim_start_matches('@') != column_name;
    let store_type = (is_opaque_special_type(&sql_type.type_name) && data_type != "string")
        .then(|| sql_type.type_name.clone());
    if renamed || store_type.is_some() {
        annotations.push(DataAnnotation::Column {
            name: renamed.then(|| column_name.to_string()),
            type_name: store_type,
        });
    }

    CSharpProperty {
        is_nullable,
        annotations,
        ..CSharpProperty::new(&name, data_type)
    }
}

/// Make member names unique within a class and distinct from the class name.
///
/// A clashing member gets the first free `_N` suffix, and its `[Column]`
/// annotation keeps the database name.
fn assign_member_names(class_name: &str, properties: &mut [CSharpProperty], column_names: &[&str]) {
    let class_ident = sanitize_identifier(class_name);
    let mut used: HashSet<String> = HashSet::new();
    used.insert(class_ident.trim_start_matches('@').to_string());

    for (property, column_name) in properties.iter_mut().zip(column_names) {
        let base = property.name.trim_start_matches('@').to_string();
        if used.insert(base.clone()) {
            continue;
        }

        let mut n = 1;
        let unique = loop {
            let candidate = format!("{}_{}", base, n);
            if used.insert(candidate.clone()) {
                break candidate;
            }
            n += 1;
        };
        debug!("Member {} renamed to {} in class {}", property.name, unique, class_ident);
        property.name = unique;

        let column_annotation = property
            .annotations
            .iter_mut()
            .find_map(|annotation| match annotation {
                DataAnnotation::Column { name, .. } => Some(name),
                _ => None,
            });
        match column_annotation {
            Some(name) => *name = Some(column_name.to_string()),
            None => property.annotations.push(DataAnnotation::Column {
                name: Some(column_name.to_string()),
                type_name: None,
            }),
        }
    }
}

fn render_class(
    class_name: &str,
    properties: &[CSharpProperty],
    options: &GeneratorOptions,
) -> Result<String> {
    let nl = options.newline.as_str();
    let mut body = Vec::with_capacity(properties.len());
    for property in properties {
        body.push(property.render(&options.indent, nl)?);
    }

    Ok(format!(
        "{} class {}{nl}{{{nl}{}{nl}}}{nl}",
        options.class_access_modifier.keyword(),
        sanitize_identifier(class_name),
        body.join(nl),
        nl = nl,
    ))
}

/// Generate a class for one table. Properties follow the definition's column
/// order; primary-key columns are marked `[Key]`.
pub fn generate_class(definition: &SchemaDefinition, options: &GeneratorOptions) -> Result<String> {
    let mut properties = Vec::with_capacity(definition.columns().len());
    for column in definition.columns() {
        let is_primary_key = definition.is_column_primary_key(column)?;
        let sql_type = column.sql_type(&options.profile);
        properties.push(property_for_column(
            &column.column_name,
            &sql_type,
            column.is_nullable,
            is_primary_key,
        ));
    }

    let table_name = definition.table_name();
    let column_names: Vec<&str> = definition
        .columns()
        .iter()
        .map(|c| c.column_name.as_str())
        .collect();
    assign_member_names(table_name.name(), &mut properties, &column_names);
    debug!("Generated class for {} ({} properties)", table_name, properties.len());
    render_class(table_name.name(), &properties, options)
}

/// Generate a class from the described result set of an arbitrary query.
pub fn generate_class_from_describe_rows(
    class_name: &str,
    rows: &[DescribeResultSetRow],
    options: &GeneratorOptions,
) -> Result<String> {
    let columns: Vec<_> = rows
        .iter()
        .map(|row| row.to_sql_column(&options.profile))
        .collect();
    let mut properties: Vec<CSharpProperty> = columns
        .iter()
        .map(|column| {
            property_for_column(&column.name, &column.sql_type, column.is_nullable, false)
        })
        .collect();
    let column_names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assign_member_names(class_name, &mut properties, &column_names);
    render_class(class_name, &properties, options)
}

/// Generate classes for many tables, in input order.
pub fn generate_classes(
    definitions: &[SchemaDefinition],
    options: &GeneratorOptions,
) -> Result<Vec<String>> {
    if definitions.len() >= PARALLEL_THRESHOLD {
        definitions
            .par_iter()
            .map(|definition| generate_class(definition, options))
            .collect()
    } else {
        definitions
            .iter()
            .map(|definition| generate_class(definition, options))
            .collect()
    }
}
