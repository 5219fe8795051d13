//! Translation of .NET-style custom date/time formats to chrono formats

use crate::error::{Result, UniqueDbError};

/// Supported tokens, longest first so `yyyy` wins over `yy`
const TOKENS: &[(&str, &str)] = &[
    ("yyyy", "%Y"),
    ("yy", "%y"),
    ("MM", "%m"),
    ("dd", "%d"),
    ("HH", "%H"),
    ("mm", "%M"),
    ("ss", "%S"),
    ("fff", "%3f"),
];

/// Letters that carry meaning in .NET custom formats. Any of these outside a
/// supported token would silently change the rendered name, so they are
/// rejected instead of copied literally.
const SPECIFIER_LETTERS: &str = "yMdHhmsfFtzKg";

/// Translate a format such as `yyMMdd.HHmmss.fff` into `%y%m%d.%H%M%S.%3f`.
pub fn to_chrono_format(format: &str) -> Result<String> {
    let mut out = String::with_capacity(format.len() * 2);
    let mut rest = format;

    'outer: while let Some(c) = rest.chars().next() {
        for (token, replacement) in TOKENS {
            if let Some(after) = rest.strip_prefix(token) {
                out.push_str(replacement);
                rest = after;
                continue 'outer;
            }
        }

        if SPECIFIER_LETTERS.contains(c) {
            return Err(UniqueDbError::InvalidTimestampFormat {
                format: format.to_string(),
            });
        }
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }

    Ok(out)
}
