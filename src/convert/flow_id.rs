//! Flow identifier normalization
//!
//! V1 flows carry a numeric `id`. V2 flows identify themselves with a UUID whose
//! 128-bit value is that number, packed most-significant byte first.

use serde_json::Value;
use uuid::Uuid;

use super::migrate_flow::MigrationError;

/// Build the UUID whose big-endian integer representation equals `n`.
pub fn uuid_from_integer(n: u128) -> Uuid {
    Uuid::from_bytes(n.to_be_bytes())
}

/// Decide whether a flow `id` value needs rewriting.
///
/// Returns the hyphenated lowercase UUID text when `id` is an integer number,
/// `None` for anything that is left as-is (strings, floats, booleans, null).
///
/// # Errors
///
/// Returns [`MigrationError::FlowIdOutOfRange`] for integers that do not fit in
/// an unsigned 128-bit value.
pub fn normalize_flow_id(id: &Value) -> Result<Option<String>, MigrationError> {
    let Value::Number(number) = id else {
        return Ok(None);
    };

    // Numbers keep their source text, so `1.0` and `1e3` stay floats here.
    let text = number.to_string();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.as_str()),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }

    let value: u128 = digits
        .parse()
        .map_err(|_| MigrationError::FlowIdOutOfRange(text.clone()))?;
    if negative && value != 0 {
        return Err(MigrationError::FlowIdOutOfRange(text));
    }

    Ok(Some(uuid_from_integer(value).hyphenated().to_string()))
}
