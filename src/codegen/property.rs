//! Rendering of a single C# auto-property declaration

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, UniqueDbError};
use crate::util::bracify;

/// C# value types that take a `?` suffix when the column is nullable.
/// Reference types are nullable already and are never wrapped.
const NULLABLE_VALUE_TYPES: &[&str] = &[
    "bool",
    "byte",
    "char",
    "decimal",
    "double",
    "enum",
    "float",
    "int",
    "long",
    "sbyte",
    "short",
    "struct",
    "uint",
    "ulong",
    "ushort",
    "UInt",
    "UInt16",
    "UInt32",
    "UInt64",
    "Int",
    "Int16",
    "Int32",
    "Int64",
    "datetime",
    "DateTime",
    "DateTimeOffset",
    "TimeSpan",
    "Guid",
];

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@?[A-Za-z_][A-Za-z0-9_]*$").unwrap());

static DECLARATION_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:public|private|protected internal|protected|internal)\s+(\S+?)(\?)?\s+(@?[A-Za-z_][A-Za-z0-9_]*)\s*\{",
    )
    .unwrap()
});

/// Accessibility of a property or one of its accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessModifier {
    #[default]
    Public,
    Protected,
    Internal,
    ProtectedInternal,
    Private,
}

impl AccessModifier {
    pub fn keyword(&self) -> &'static str {
        match self {
            AccessModifier::Public => "public",
            AccessModifier::Protected => "protected",
            AccessModifier::Internal => "internal",
            AccessModifier::ProtectedInternal => "protected internal",
            AccessModifier::Private => "private",
        }
    }
}

/// Attribute rendered above a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataAnnotation {
    Key,
    Required,
    StringLength(u32),
    MaxLength,
    /// `[Column(...)]` carrying the database column name and/or store type
    Column {
        name: Option<String>,
        type_name: Option<String>,
    },
}

impl DataAnnotation {
    pub fn to_attribute_string(&self) -> String {
        match self {
            DataAnnotation::Key => "[Key]".to_string(),
            DataAnnotation::Required => "[Required]".to_string(),
            DataAnnotation::StringLength(n) => format!("[StringLength({})]", n),
            DataAnnotation::MaxLength => "[MaxLength]".to_string(),
            DataAnnotation::Column { name, type_name } => {
                let mut args = Vec::new();
                if let Some(name) = name {
                    args.push(string_literal(name));
                }
                if let Some(type_name) = type_name {
                    args.push(format!("TypeName = {}", string_literal(type_name)));
                }
                format!("[Column({})]", args.join(", "))
            }
        }
    }
}

/// Everything needed to emit one property declaration.
///
/// `data_type` is already the target C# type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CSharpProperty {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub access_modifier: AccessModifier,
    pub getter_access_modifier: AccessModifier,
    pub setter_access_modifier: AccessModifier,
    pub annotations: Vec<DataAnnotation>,
}

impl CSharpProperty {
    pub fn new(name: &str, data_type: &str) -> Self {
        Self {
            name: name.to_string(),
            data_type: data_type.to_string(),
            is_nullable: false,
            access_modifier: AccessModifier::Public,
            getter_access_modifier: AccessModifier::Public,
            setter_access_modifier: AccessModifier::Public,
            annotations: Vec::new(),
        }
    }

    /// Declared type, with a `?` suffix for nullable value types
    pub fn data_type_string(&self) -> String {
        if self.is_nullable && NULLABLE_VALUE_TYPES.contains(&self.data_type.as_str()) {
            format!("{}?", self.data_type)
        } else {
            self.data_type.clone()
        }
    }

    fn validate(&self) -> Result<()> {
        if !IDENTIFIER_RE.is_match(&self.name) {
            return Err(UniqueDbError::InvalidProperty {
                message: format!("'{}' is not a valid property name", self.name),
            });
        }
        if self.data_type.trim().is_empty() {
            return Err(UniqueDbError::InvalidProperty {
                message: format!("property '{}' has no data type", self.name),
            });
        }
        if self.getter_access_modifier != AccessModifier::Public
            && self.setter_access_modifier != AccessModifier::Public
        {
            return Err(UniqueDbError::InvalidProperty {
                message: format!(
                    "property '{}' cannot restrict both the getter and the setter",
                    self.name
                ),
            });
        }
        Ok(())
    }

    /// Render the attribute lines and the declaration line.
    ///
    /// Each attribute line is `indent + attribute + newline`; the declaration
    /// itself has no trailing newline.
    pub fn render(&self, indent: &str, newline: &str) -> Result<String> {
        self.validate()?;

        let attributes: String = self
            .annotations
            .iter()
            .map(|a| format!("{}{}{}", indent, a.to_attribute_string(), newline))
            .collect();

        let accessors = bracify(&format!(
            "{} get;{} set; ",
            accessor_modifier(self.getter_access_modifier),
            accessor_modifier(self.setter_access_modifier),
        ));
        Ok(format!(
            "{}{}{} {} {} {}",
            attributes,
            indent,
            self.access_modifier.keyword(),
            self.data_type_string(),
            self.name,
            accessors,
        ))
    }
}

/// A regular C# string literal, escaping backslashes, quotes and control characters.
fn string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for c in value.chars() {
        match c {
            '\\' => literal.push_str("\\\\"),
            '"' => literal.push_str("\\\""),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            '\0' => literal.push_str("\\0"),
            c if c.is_control() => literal.push_str(&format!("\\u{:04x}", c as u32)),
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}

fn accessor_modifier(modifier: AccessModifier) -> String {
    if modifier == AccessModifier::Public {
        String::new()
    } else {
        format!(" {}", modifier.keyword())
    }
}

/// Type token, nullability and name recovered from a rendered declaration line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDeclaration {
    pub data_type: String,
    pub is_nullable: bool,
    pub name: String,
}

/// Parse a declaration line produced by [`CSharpProperty::render`].
/// Attribute lines and anything else return `None`.
pub fn parse_declaration_line(line: &str) -> Option<ParsedDeclaration> {
    let caps = DECLARATION_LINE_RE.captures(line)?;
    Some(ParsedDeclaration {
        data_type: caps[1].to_string(),
        is_nullable: caps.get(2).is_some(),
        name: caps[3].to_string(),
    })
}
