//! Deserializers for admin form fields that may arrive as JSON numbers/booleans or as the
//! strings an HTML form posts. A blank string counts as an absent value.

use serde::{de::Error, Deserialize, Deserializer};
use serde_json::Value;

pub fn optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .map(Some)
            .ok_or_else(|| D::Error::custom("number out of range")),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<i64>()
                .or_else(|_| s.parse::<f64>().map(|f| f.trunc() as i64))
                .map(Some)
                .map_err(|_| D::Error::custom(format!("expected an integer, got {s:?}")))
        }
        Some(other) => Err(D::Error::custom(format!("expected an integer, got {other}"))),
    }
}

/// Like [`optional_i64`], but a string that is not a number reads its leading digits, or 0
/// when there are none, so range validation reports it instead of the JSON parser.
pub fn optional_i64_or_zero<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.trim().is_empty() => {
            let s = s.trim();
            let parsed = s
                .parse::<i64>()
                .or_else(|_| s.parse::<f64>().map(|f| f.trunc() as i64))
                .unwrap_or_else(|_| leading_integer(s));
            Ok(Some(parsed))
        }
        Some(Value::Bool(b)) => Ok(Some(i64::from(b))),
        other => optional_i64(other.unwrap_or(Value::Null)).map_err(D::Error::custom),
    }
}

fn leading_integer(s: &str) -> i64 {
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    digits[..end].parse::<i64>().map_or(0, |n| sign * n)
}

pub fn optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<f64>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("expected a number, got {s:?}")))
        }
        Some(other) => Err(D::Error::custom(format!("expected a number, got {other}"))),
    }
}

pub fn optional_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::Number(n)) => Ok(Some(n.as_f64().is_some_and(|f| f != 0.0))),
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "" => Ok(None),
            "1" | "true" | "on" | "yes" => Ok(Some(true)),
            "0" | "false" | "off" | "no" => Ok(Some(false)),
            other => Err(D::Error::custom(format!("expected a boolean, got {other:?}"))),
        },
        Some(other) => Err(D::Error::custom(format!("expected a boolean, got {other}"))),
    }
}

/// Trims the value and treats a blank string as missing.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "optional_i64")]
        level: Option<i64>,
        #[serde(default, deserialize_with = "optional_f64")]
        gpa: Option<f64>,
        #[serde(default, deserialize_with = "optional_bool")]
        flag: Option<bool>,
    }

    fn parse(json: &str) -> Form {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn numbers_accept_string_forms() {
        let form = parse(r#"{"level":"85","gpa":"3.7","flag":"1"}"#);
        assert_eq!(form.level, Some(85));
        assert_eq!(form.gpa, Some(3.7));
        assert_eq!(form.flag, Some(true));
    }

    #[test]
    fn blank_and_missing_values_are_absent() {
        let form = parse(r#"{"level":"  ","gpa":""}"#);
        assert_eq!(form.level, None);
        assert_eq!(form.gpa, None);
        assert_eq!(form.flag, None);
    }

    #[test]
    fn native_json_types_pass_through() {
        let form = parse(r#"{"level":42,"gpa":4,"flag":false}"#);
        assert_eq!(form.level, Some(42));
        assert_eq!(form.gpa, Some(4.0));
        assert_eq!(form.flag, Some(false));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(serde_json::from_str::<Form>(r#"{"level":"lots"}"#).is_err());
        assert!(serde_json::from_str::<Form>(r#"{"flag":"maybe"}"#).is_err());
    }

    #[derive(Debug, Deserialize)]
    struct Level {
        #[serde(default, deserialize_with = "optional_i64_or_zero")]
        level: Option<i64>,
    }

    #[test]
    fn level_reads_leading_digits_or_zero() {
        let level = |json: &str| serde_json::from_str::<Level>(json).unwrap().level;
        assert_eq!(level(r#"{"level":"high"}"#), Some(0));
        assert_eq!(level(r#"{"level":"75%"}"#), Some(75));
        assert_eq!(level(r#"{"level":"90"}"#), Some(90));
        assert_eq!(level(r#"{"level":55}"#), Some(55));
        assert_eq!(level(r#"{"level":" "}"#), None);
        assert_eq!(level("{}"), None);
    }

    #[test]
    fn present_trims_and_drops_blank() {
        assert_eq!(present(&Some("  React ".into())), Some("React"));
        assert_eq!(present(&Some("   ".into())), None);
        assert_eq!(present(&None), None);
    }
}
