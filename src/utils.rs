use std::convert::TryFrom;

pub const EMPTY_VALUE: &str = "";

/// BIRD pads each rendered community component with a "0000" width suffix
pub const WIDTH_SUFFIX: &str = "0000";

/// Strip a single trailing width suffix, if present
/// E.g. "0x80060000" -> "0x8006"
pub fn strip_width_suffix(value: &str) -> &str {
    value.strip_suffix(WIDTH_SUFFIX).unwrap_or(value)
}

/// Parse an integer literal the way a human would write it in a config or CLI:
/// optional sign, then `0x`/`0o`/`0b` prefixed, leading-zero octal, or decimal.
/// ```
/// use bird_flowspec::utils::parse_int_literal;
/// assert_eq!(parse_int_literal("0x8006"), Some(0x8006));
/// assert_eq!(parse_int_literal("-42"), Some(-42));
/// ```
pub fn parse_int_literal(value: &str) -> Option<i64> {
    let (negative, unsigned) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    let (radix, digits) = if let Some(hex) = strip_prefix_ci(unsigned, "0x") {
        (16, hex)
    } else if let Some(oct) = strip_prefix_ci(unsigned, "0o") {
        (8, oct)
    } else if let Some(bin) = strip_prefix_ci(unsigned, "0b") {
        (2, bin)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };
    // from_str_radix would otherwise accept a second sign ("0x-5")
    if digits.is_empty() || digits.starts_with(|c: char| c == '+' || c == '-') {
        return None;
    }
    let magnitude = i128::from_str_radix(digits, radix).ok()?;
    i64::try_from(if negative { -magnitude } else { magnitude }).ok()
}

pub fn maybe_string<T>(item: Option<&T>) -> String
where
    T: ToString,
{
    item.map(std::string::ToString::to_string)
        .unwrap_or_else(|| String::from(EMPTY_VALUE))
}

fn strip_prefix_ci<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    match value.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => Some(&value[prefix.len()..]),
        _ => None,
    }
}
