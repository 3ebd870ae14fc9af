//! Tolerant numeric parsing for coordinates and depths.
//!
//! Accepts "12.34", "78 12.3" (degrees + decimal minutes), "78°12'30\"",
//! "12.34N", "1,234.5" and plain JSON numbers. Anything without a numeric
//! token parses to `None`; parsing never panics.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Signed decimal token; commas inside the integer part are thousands separators.
static NUMERIC_TOKEN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"[+-]?(?:\d[\d,]*(?:\.\d+)?|\.\d+)").ok());

/// Parse a textual coordinate or depth. `None` means "not a number".
pub fn parse(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let re = NUMERIC_TOKEN.as_ref()?;
    let tokens: Vec<&str> = re.find_iter(s).map(|m| m.as_str()).take(2).collect();
    match tokens.as_slice() {
        [] => None,
        [single] => parse_token(single),
        [deg, min, ..] => {
            let degrees = parse_token(deg)?;
            let minutes = parse_token(min)?;
            let sign = if deg.starts_with('-') { -1.0 } else { 1.0 };
            finite(sign * (degrees.abs() + minutes.abs() / 60.0))
        }
    }
}

/// Parse a JSON scalar. Numbers pass through, strings go through [`parse`].
pub fn parse_value(raw: Option<&Value>) -> Option<f64> {
    match raw? {
        Value::Number(n) => n.as_f64().and_then(finite),
        Value::String(s) => parse(s),
        _ => None,
    }
}

/// Parse a latitude, rejecting anything outside [-90, 90].
pub fn parse_latitude(raw: Option<&Value>) -> Option<f64> {
    parse_value(raw).filter(|v| (-90.0..=90.0).contains(v))
}

/// Parse a longitude, rejecting anything outside [-180, 180].
pub fn parse_longitude(raw: Option<&Value>) -> Option<f64> {
    parse_value(raw).filter(|v| (-180.0..=180.0).contains(v))
}

fn parse_token(token: &str) -> Option<f64> {
    let cleaned = token.replace(',', "");
    cleaned.parse::<f64>().ok().and_then(finite)
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_degrees_and_minutes() {
        let v = parse("78 12.3").unwrap();
        assert!((v - 78.205).abs() < 1e-6);
    }

    #[test]
    fn test_negative_degrees_and_minutes() {
        let v = parse("-72 30").unwrap();
        assert!((v + 72.5).abs() < 1e-9);
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(parse("12,345.6"), Some(12345.6));
        assert_eq!(parse("1,234.5 m"), Some(1234.5));
    }

    #[test]
    fn test_symbols_and_units() {
        assert_eq!(parse("12.34N"), Some(12.34));
        assert_eq!(parse("  40 m "), Some(40.0));
        let dms = parse("78°12'30\"").unwrap();
        assert!((dms - 78.2).abs() < 1e-9);
    }

    #[test]
    fn test_not_a_number() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
        assert_eq!(parse("-"), None);
        assert_eq!(parse("n/a"), None);
        assert_eq!(parse_value(None), None);
        assert_eq!(parse_value(Some(&json!(null))), None);
    }

    #[test]
    fn test_json_numbers() {
        assert_eq!(parse_value(Some(&json!(18.52))), Some(18.52));
        assert_eq!(parse_value(Some(&json!(40))), Some(40.0));
        assert_eq!(parse_value(Some(&json!(true))), None);
    }

    #[test]
    fn test_range_checks() {
        assert_eq!(parse_latitude(Some(&json!("91"))), None);
        assert_eq!(parse_latitude(Some(&json!("-90"))), Some(-90.0));
        assert_eq!(parse_longitude(Some(&json!(181))), None);
        let lon = parse_longitude(Some(&json!("72 49.5"))).unwrap();
        assert!((lon - 72.825).abs() < 1e-9);
    }
}
