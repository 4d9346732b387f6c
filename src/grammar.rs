//! Character-class predicates for each field of a PHC string.
//!
//! The base64 field alphabet deliberately overlaps the parameter value alphabet. The decoder
//! relies on `=` and `,` never appearing in a salt or hash to tell the two apart.

/// Maximum length of an identifier or a parameter name
pub const MAX_NAME_LEN: usize = 32;

fn is_name_char(b: u8) -> bool {
    matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'-')
}

fn is_value_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'+' | b'.' | b'-')
}

fn is_b64_field_char(b: u8) -> bool {
    is_value_char(b) || b == b'/'
}

/// Returns true if `s` is 1-32 characters of `[a-z0-9-]`.
pub fn is_valid_id(s: &str) -> bool {
    (1..=MAX_NAME_LEN).contains(&s.len()) && s.bytes().all(is_name_char)
}

/// Parameter names follow the same rule as identifiers.
pub fn is_valid_param_name(s: &str) -> bool {
    is_valid_id(s)
}

/// Returns true if `s` is 1 or more characters of `[a-zA-Z0-9+.-]`. Note that `/` and `=`
/// are not allowed.
pub fn is_valid_param_value(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_value_char)
}

/// Returns true if `s` is 0 or more characters of `[a-zA-Z0-9/+.-]`.
pub fn is_valid_b64_field(s: &str) -> bool {
    s.bytes().all(is_b64_field_char)
}

/// Returns true if `s` is exactly `v=` followed by one or more ASCII digits.
pub fn is_valid_version(s: &str) -> bool {
    version_digits(s).is_some()
}

/// Returns the digits of a version field, or `None` if `s` is not version-shaped.
pub(crate) fn version_digits(s: &str) -> Option<&str> {
    let digits = s.strip_prefix("v=")?;

    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Some(digits)
    } else {
        None
    }
}

/// Returns true if `s` is a canonical base-10 integer: `0`, or an optionally negative number
/// without leading zeros.
pub fn is_decimal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);

    match digits.as_bytes() {
        [b'0'] => digits.len() == s.len(),
        [b'1'..=b'9', rest @ ..] => rest.iter().all(u8::is_ascii_digit),
        _ => false,
    }
}
