//! Lenient conversions for loosely typed JSON input.
//!
//! Seed catalog payloads, request bodies, and legacy documents carry numbers
//! as JSON numbers, numeric strings, or not at all. These helpers turn such a
//! value into a typed number, treating anything unparseable as absent.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

/// Interpret `value` as a decimal amount.
#[must_use]
pub fn decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

/// Parse a decimal from text, accepting scientific notation.
#[must_use]
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Interpret `value` as a float.
#[must_use]
pub fn float(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

/// Interpret `value` as a non-negative whole count, truncating fractions and
/// clamping negatives to zero.
#[must_use]
pub fn count(value: &Value) -> Option<u32> {
    let f = float(value)?;
    if f <= 0.0 {
        return Some(0);
    }
    // Clamped to the u32 range above and below
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = f.min(f64::from(u32::MAX)).trunc() as u32;
    Some(n)
}

/// Interpret `value` as a non-empty string; numbers are rendered in JSON form.
#[must_use]
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Look up the first present, non-null field among `names`.
#[must_use]
pub fn first_field<'a>(
    object: &'a serde_json::Map<String, Value>,
    names: &[&str],
) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| object.get(*name))
        .find(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decimal_from_number_and_string() {
        assert_eq!(decimal(&json!(9.99)), Some(Decimal::new(999, 2)));
        assert_eq!(decimal(&json!("150")), Some(Decimal::new(150, 0)));
        assert_eq!(decimal(&json!(" 1e2 ")), Some(Decimal::new(100, 0)));
    }

    #[test]
    fn test_decimal_rejects_garbage() {
        assert_eq!(decimal(&json!("abc")), None);
        assert_eq!(decimal(&json!("")), None);
        assert_eq!(decimal(&json!(null)), None);
        assert_eq!(decimal(&json!([1])), None);
    }

    #[test]
    fn test_count_clamps_and_truncates() {
        assert_eq!(count(&json!(3.7)), Some(3));
        assert_eq!(count(&json!(-4)), Some(0));
        assert_eq!(count(&json!("12")), Some(12));
        assert_eq!(count(&json!(true)), None);
    }

    #[test]
    fn test_text_renders_numbers() {
        assert_eq!(text(&json!(7)).as_deref(), Some("7"));
        assert_eq!(text(&json!("")), None);
    }

    #[test]
    fn test_first_field_skips_null() {
        let obj = json!({"name": null, "title": "Phone"});
        let obj = obj.as_object().cloned().unwrap_or_default();
        assert_eq!(first_field(&obj, &["name", "title"]), Some(&json!("Phone")));
    }
}
