//! Shared identifier and string helpers.

/// Case-insensitive equality where two absent values are equal and an absent
/// value never equals a present one.
#[inline]
pub fn insensitive_equals(left: Option<&str>, right: Option<&str>) -> bool {
    match (left, right) {
        (None, None) => true,
        (Some(l), Some(r)) => l.eq_ignore_ascii_case(r),
        _ => false,
    }
}

/// Strips leading/trailing `[` and `]` from an identifier, or a matching pair
/// of double quotes (undoubling any `""` inside).
pub fn debracketize(ident: &str) -> String {
    if let Some(inner) = ident
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        return inner.replace("\"\"", "\"");
    }
    ident.trim_matches(|c| c == '[' || c == ']').to_string()
}

/// Wraps an identifier in brackets unconditionally.
pub fn bracketize(ident: &str) -> String {
    format!("[{}]", ident)
}

/// Wraps text in curly braces.
pub fn bracify(text: &str) -> String {
    format!("{{{}}}", text)
}

/// Splits a delimited list, trimming entries and dropping empty ones.
pub fn split_on(input: &str, delimiter: char) -> Vec<String> {
    input
        .split(delimiter)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
