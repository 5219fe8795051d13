//! C# class generation from introspected schema metadata

mod class;
mod clr;
mod property;

pub use class::{
    generate_class, generate_class_from_describe_rows, generate_classes, property_for_column,
    sanitize_identifier,
};
pub use clr::{clr_type_for, ClrType};
pub use property::{
    parse_declaration_line, AccessModifier, CSharpProperty, DataAnnotation, ParsedDeclaration,
};

use crate::types::DialectProfile;

/// Options controlling the layout of generated source text
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Line terminator; CRLF keeps output identical to earlier generations
    pub newline: String,
    /// Indentation for members inside the class body
    pub indent: String,
    /// Accessibility of the generated class
    pub class_access_modifier: AccessModifier,
    /// Dialect defaults used when normalizing column types
    pub profile: DialectProfile,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            newline: "\r\n".to_string(),
            indent: "    ".to_string(),
            class_access_modifier: AccessModifier::Public,
            profile: DialectProfile::SQL_SERVER,
        }
    }
}
