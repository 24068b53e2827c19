use chrono::DateTime;

/// RFC 3339 `date-time`: `YYYY-MM-DDTHH:MM:SS[.frac](Z|±HH:MM)`.
///
/// Calendar validity is enforced, so `2023-02-29` fails and `2024-02-29`
/// passes. The separator must be an upper-case `T`.
pub fn is_date_time(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() < 20 || bytes[10] != b'T' || !bytes[..4].iter().all(u8::is_ascii_digit) {
        return false;
    }
    DateTime::parse_from_rfc3339(value).is_ok()
}
