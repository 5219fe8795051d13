//! Canonical SQL type model
//!
//! Raw, dialect-specific column metadata is normalized into a [`SqlType`]
//! descriptor. Only the fields relevant to the type's category are populated:
//! precision/scale for the decimal family, a character length for character
//! types, and a fractional-seconds precision for the higher-precision
//! temporal types.

mod classify;
mod conversion;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, UniqueDbError};

pub use classify::*;
pub use conversion::{convert, RawTypeAttributes, RawTypeRow};
pub(crate) use conversion::{normalize, TypeParams};

/// Dialect defaults applied while normalizing type metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectProfile {
    /// Precision assumed for `decimal`/`numeric` declared without one
    pub default_decimal_precision: u8,
    /// Scale assumed for `decimal`/`numeric` declared without one
    pub default_decimal_scale: u8,
    /// Fractional-seconds precision assumed for `datetime2`/`time`/`datetimeoffset`
    pub default_fractional_seconds_precision: u8,
    /// Storage bytes per character for wide (Unicode) character types
    pub wide_char_bytes: u32,
    /// Raw length value the server reports for `(max)` columns
    pub max_length_sentinel: i32,
}

impl DialectProfile {
    pub const SQL_SERVER: DialectProfile = DialectProfile {
        default_decimal_precision: 18,
        default_decimal_scale: 0,
        default_fractional_seconds_precision: 7,
        wide_char_bytes: 2,
        max_length_sentinel: -1,
    };
}

impl Default for DialectProfile {
    fn default() -> Self {
        DialectProfile::SQL_SERVER
    }
}

/// Maximum length of a character column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharLength {
    /// Bounded length, in characters
    Chars(u32),
    /// `(max)` - unbounded
    Max,
}

impl fmt::Display for CharLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharLength::Chars(n) => write!(f, "{}", n),
            CharLength::Max => write!(f, "max"),
        }
    }
}

/// Canonical type descriptor for one column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SqlType {
    /// Lower-cased system type name (e.g. "decimal", "nvarchar")
    pub type_name: String,
    pub numeric_precision: Option<u8>,
    pub numeric_scale: Option<u8>,
    pub maximum_char_length: Option<CharLength>,
    pub fractional_seconds_precision: Option<u8>,
}

static DECLARATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*\[?([a-z_][a-z0-9_]*)\]?\s*(?:\(\s*(max|\d+)\s*(?:,\s*(\d+)\s*)?\))?\s*$")
        .unwrap()
});

impl SqlType {
    /// Descriptor carrying only a type name
    pub fn name_only(type_name: &str) -> Self {
        Self {
            type_name: type_name.trim().to_lowercase(),
            ..Self::default()
        }
    }

    pub fn decimal(type_name: &str, precision: u8, scale: u8) -> Self {
        Self {
            numeric_precision: Some(precision),
            numeric_scale: Some(scale),
            ..Self::name_only(type_name)
        }
    }

    pub fn character(type_name: &str, length: CharLength) -> Self {
        Self {
            maximum_char_length: Some(length),
            ..Self::name_only(type_name)
        }
    }

    pub fn fractional_time(type_name: &str, precision: u8) -> Self {
        Self {
            fractional_seconds_precision: Some(precision),
            ..Self::name_only(type_name)
        }
    }

    /// Check that at most one category of optional fields is populated.
    pub fn validate(&self) -> Result<()> {
        let numeric = self.numeric_precision.is_some() || self.numeric_scale.is_some();
        let populated = [
            numeric,
            self.maximum_char_length.is_some(),
            self.fractional_seconds_precision.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count();

        if self.type_name.trim().is_empty() {
            return Err(UniqueDbError::InvalidTypeDescriptor {
                type_name: self.type_name.clone(),
                message: "type name is empty".to_string(),
            });
        }
        if populated > 1 {
            return Err(UniqueDbError::InvalidTypeDescriptor {
                type_name: self.type_name.clone(),
                message: "more than one of precision/scale, length and fractional precision is set"
                    .to_string(),
            });
        }
        Ok(())
    }

    /// Parse a T-SQL type declaration such as `nvarchar(10)`, `decimal(30, 5)`,
    /// `varchar(max)` or `datetime2`.
    ///
    /// Lengths in a declaration are already character counts, so no storage
    /// width adjustment is applied.
    pub fn parse_declaration(declaration: &str, profile: &DialectProfile) -> Result<Self> {
        let invalid = || UniqueDbError::InvalidTypeDescriptor {
            type_name: declaration.to_string(),
            message: "not a recognizable type declaration".to_string(),
        };
        let caps = DECLARATION_RE.captures(declaration).ok_or_else(invalid)?;
        let name = caps[1].to_lowercase();
        let first = caps.get(2).map(|m| m.as_str());
        let second = caps.get(3).map(|m| m.as_str());
        let parse_u8 = |s: &str| s.parse::<u8>().map_err(|_| invalid());

        if is_decimal_type(&name) {
            let precision = match first {
                Some(p) => parse_u8(p)?,
                None => profile.default_decimal_precision,
            };
            let scale = match second {
                Some(s) => parse_u8(s)?,
                None => profile.default_decimal_scale,
            };
            return Ok(Self::decimal(&name, precision, scale));
        }

        if is_character_type(&name) {
            return Ok(match first {
                Some(len) if len.eq_ignore_ascii_case("max") => {
                    Self::character(&name, CharLength::Max)
                }
                Some(len) => Self::character(
                    &name,
                    CharLength::Chars(len.parse().map_err(|_| invalid())?),
                ),
                // char/nchar/varchar/nvarchar without a length default to 1
                None => Self::character(&name, CharLength::Chars(1)),
            });
        }

        if is_fractional_time_type(&name) {
            let precision = match first {
                Some(p) => parse_u8(p)?,
                None => profile.default_fractional_seconds_precision,
            };
            return Ok(Self::fractional_time(&name, precision));
        }

        Ok(Self::name_only(&name))
    }

    /// Render the descriptor back into T-SQL declaration text.
    pub fn to_declaration(&self) -> String {
        if let Some(length) = self.maximum_char_length {
            return format!("{}({})", self.type_name, length);
        }
        if let Some(precision) = self.numeric_precision {
            return format!(
                "{}({},{})",
                self.type_name,
                precision,
                self.numeric_scale.unwrap_or(0)
            );
        }
        if let Some(precision) = self.fractional_seconds_precision {
            return format!("{}({})", self.type_name, precision);
        }
        self.type_name.clone()
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_declaration())
    }
}
