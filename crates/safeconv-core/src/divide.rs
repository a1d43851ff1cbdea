use serde_json::Value;

use crate::error::{ConversionError, Result};
use crate::outcome::{Outcome, describe_input, kind_name};

/// Divide `numerator` by `denominator`, falling back to `0.0`.
///
/// Operands must be JSON numbers; numeric strings are rejected rather than
/// coerced.
pub fn safe_divide(numerator: &Value, denominator: &Value) -> Outcome<f64> {
    let input = format!(
        "{} / {}",
        describe_input(numerator),
        describe_input(denominator)
    );
    Outcome::recover(divide(numerator, denominator), 0.0, input)
}

fn divide(numerator: &Value, denominator: &Value) -> Result<f64> {
    let a = operand(numerator, "numerator")?;
    let b = operand(denominator, "denominator")?;

    if b == 0.0 {
        return Err(ConversionError::DivideByZero(format!("{a} / {b}")));
    }

    let quotient = a / b;
    if !quotient.is_finite() {
        return Err(ConversionError::Unexpected(format!(
            "{a} / {b} is not a finite number"
        )));
    }
    Ok(quotient)
}

fn operand(value: &Value, role: &str) -> Result<f64> {
    match value {
        Value::Number(number) => number.as_f64().ok_or_else(|| {
            ConversionError::TypeMismatch(format!("{role} {number} is not representable as f64"))
        }),
        other => Err(ConversionError::TypeMismatch(format!(
            "{role} must be a number, got {}",
            kind_name(other)
        ))),
    }
}
