//! Conversion of raw introspection metadata into a [`SqlType`].

use super::classify::{
    is_character_type, is_decimal_type, is_fractional_time_type, is_known_system_type,
    is_wide_character_type,
};
use super::{CharLength, DialectProfile, SqlType};

/// Type attributes as reported by the server for one type.
///
/// `max_length` is the raw storage length in bytes, with the dialect's
/// sentinel (-1 on SQL Server) for `(max)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTypeAttributes {
    pub type_name: String,
    pub max_length: Option<i32>,
    pub precision: Option<u8>,
    pub scale: Option<u8>,
    pub datetime_precision: Option<u8>,
}

impl RawTypeAttributes {
    pub fn named(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            ..Self::default()
        }
    }
}

/// One row of raw type metadata for a column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTypeRow {
    /// The declared type, which may be a user-defined alias
    pub declared: RawTypeAttributes,
    /// Underlying system type, reported for user-defined/aliased types
    pub system: Option<RawTypeAttributes>,
}

impl RawTypeRow {
    pub fn system(declared: RawTypeAttributes) -> Self {
        Self {
            declared,
            system: None,
        }
    }

    pub fn user_defined(type_name: &str, system: RawTypeAttributes) -> Self {
        Self {
            declared: RawTypeAttributes::named(type_name),
            system: Some(system),
        }
    }

    /// Attributes every category branch reads from: the declared type when it
    /// is a system type, otherwise the underlying system type.
    fn effective(&self) -> &RawTypeAttributes {
        if is_known_system_type(&self.declared.type_name) {
            return &self.declared;
        }
        self.system.as_ref().unwrap_or(&self.declared)
    }
}

/// Normalize one raw metadata row into a canonical descriptor.
///
/// Never fails: a type that is neither a system type nor resolvable through
/// its underlying system type yields a name-only descriptor.
pub fn convert(row: &RawTypeRow, profile: &DialectProfile) -> SqlType {
    let attrs = row.effective();
    let type_name = attrs.type_name.trim().to_lowercase();
    let length = attrs
        .max_length
        .and_then(|raw| char_length(&type_name, raw, profile));

    normalize(
        &type_name,
        TypeParams {
            length,
            precision: attrs.precision,
            scale: attrs.scale,
            datetime_precision: attrs.datetime_precision,
        },
        profile,
    )
}

/// Type parameters already expressed in canonical units.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TypeParams {
    pub length: Option<CharLength>,
    pub precision: Option<u8>,
    pub scale: Option<u8>,
    pub datetime_precision: Option<u8>,
}

/// Keep only the parameters that belong to the type's category and fill in
/// dialect defaults.
pub(crate) fn normalize(type_name: &str, params: TypeParams, profile: &DialectProfile) -> SqlType {
    if is_decimal_type(type_name) {
        return match params.precision {
            Some(precision) => SqlType::decimal(
                type_name,
                precision,
                params.scale.unwrap_or(profile.default_decimal_scale),
            ),
            None => SqlType::decimal(
                type_name,
                profile.default_decimal_precision,
                profile.default_decimal_scale,
            ),
        };
    }

    if is_character_type(type_name) {
        return SqlType {
            maximum_char_length: params.length,
            ..SqlType::name_only(type_name)
        };
    }

    if is_fractional_time_type(type_name) {
        let precision = params
            .datetime_precision
            .unwrap_or(profile.default_fractional_seconds_precision);
        return SqlType::fractional_time(type_name, precision);
    }

    SqlType::name_only(type_name)
}

/// Convert a raw storage length into a character length.
fn char_length(type_name: &str, raw: i32, profile: &DialectProfile) -> Option<CharLength> {
    if raw == profile.max_length_sentinel {
        return Some(CharLength::Max);
    }
    let bytes = u32::try_from(raw).ok()?;
    if is_wide_character_type(type_name) {
        Some(CharLength::Chars(bytes / profile.wide_char_bytes))
    } else {
        Some(CharLength::Chars(bytes))
    }
}
