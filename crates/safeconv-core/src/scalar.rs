use serde_json::Value;

use crate::error::{ConversionError, Result};
use crate::outcome::{Outcome, describe_input, kind_name};

/// Convert to `i64`, falling back to `0`.
///
/// Accepts integral numbers and strings holding a base-10 integer.
pub fn to_int(value: &Value) -> Outcome<i64> {
    Outcome::recover(int_value(value), 0, describe_input(value))
}

/// Convert to `f64`, falling back to `0.0`.
pub fn to_float(value: &Value) -> Outcome<f64> {
    Outcome::recover(float_value(value), 0.0, describe_input(value))
}

/// Convert to `bool`, falling back to `false`.
pub fn to_bool(value: &Value) -> Outcome<bool> {
    Outcome::recover(bool_value(value), false, describe_input(value))
}

fn int_value(value: &Value) -> Result<i64> {
    match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Ok(int);
            }
            match number.as_f64() {
                Some(float) if float.fract() == 0.0 && in_i64_range(float) => Ok(float as i64),
                _ => Err(ConversionError::Decode(format!(
                    "{number} is not an integer in i64 range"
                ))),
            }
        }
        Value::String(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|err| ConversionError::Decode(format!("'{text}': {err}"))),
        other => Err(mismatch("an integer", other)),
    }
}

fn float_value(value: &Value) -> Result<f64> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| ConversionError::Decode(format!("{number} is not representable as f64"))),
        Value::String(text) => {
            let parsed = text
                .trim()
                .parse::<f64>()
                .map_err(|err| ConversionError::Decode(format!("'{text}': {err}")))?;
            if !parsed.is_finite() {
                return Err(ConversionError::Decode(format!("'{text}' is not finite")));
            }
            Ok(parsed)
        }
        other => Err(mismatch("a number", other)),
    }
}

fn bool_value(value: &Value) -> Result<bool> {
    match value {
        Value::Bool(flag) => Ok(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(ConversionError::Decode(format!(
                "{number} is neither 0 nor 1"
            ))),
        },
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(ConversionError::Decode(format!(
                "'{text}' is not a boolean word"
            ))),
        },
        other => Err(mismatch("a boolean", other)),
    }
}

fn mismatch(expected: &str, got: &Value) -> ConversionError {
    ConversionError::TypeMismatch(format!("expected {expected}, got {}", kind_name(got)))
}

fn in_i64_range(float: f64) -> bool {
    // 2^63 itself is out of range; -2^63 is in range.
    (-9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0).contains(&float)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FailureCategory;
    use serde_json::json;

    #[test]
    fn int_accepts_integral_forms() {
        assert_eq!(to_int(&json!(42)).value, 42);
        assert_eq!(to_int(&json!(-3.0)).value, -3);
        assert_eq!(to_int(&json!(" 17 ")).value, 17);
        assert!(to_int(&json!("17")).is_success());
    }

    #[test]
    fn int_rejects_fractions_and_words() {
        let outcome = to_int(&json!(2.5));
        assert_eq!(outcome.value, 0);
        assert_eq!(outcome.category(), Some(FailureCategory::Decode));

        let outcome = to_int(&json!("twelve"));
        assert_eq!(outcome.category(), Some(FailureCategory::Decode));

        let outcome = to_int(&json!(1e30));
        assert_eq!(outcome.category(), Some(FailureCategory::Decode));

        let outcome = to_int(&json!(null));
        assert_eq!(outcome.category(), Some(FailureCategory::TypeMismatch));
    }

    #[test]
    fn float_parses_numbers_and_strings() {
        assert_eq!(to_float(&json!(1.25)).value, 1.25);
        assert_eq!(to_float(&json!("-0.5")).value, -0.5);

        let outcome = to_float(&json!("inf"));
        assert_eq!(outcome.value, 0.0);
        assert_eq!(outcome.category(), Some(FailureCategory::Decode));

        let outcome = to_float(&json!([1.0]));
        assert_eq!(outcome.category(), Some(FailureCategory::TypeMismatch));
    }

    #[test]
    fn bool_understands_common_words() {
        assert!(to_bool(&json!("Yes")).value);
        assert!(!to_bool(&json!("off")).value);
        assert!(to_bool(&json!(1)).value);
        assert!(to_bool(&json!(true)).value);

        let outcome = to_bool(&json!("maybe"));
        assert!(!outcome.value);
        assert_eq!(outcome.category(), Some(FailureCategory::Decode));

        let outcome = to_bool(&json!({}));
        assert_eq!(outcome.category(), Some(FailureCategory::TypeMismatch));
    }
}
