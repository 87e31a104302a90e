use serde_json::Value;

use super::{FormatContext, Formatter};
use crate::error::Result;
use crate::value::{display, fixed_text, number_value, parse_float_prefix, parse_int_prefix};

/// Numeric display formatting.
///
/// Options, applied in this order, each on the output of the previous one:
///
/// | Option | Type | Effect |
/// |--------|------|--------|
/// | `toFixed` | number | round to N decimals (ties away from zero), result is text |
/// | `toInteger` | `true` | parse the leading integer |
/// | `toFloat` | `true` | parse the leading decimal number |
/// | `unit` | text | append to the text form |
///
/// `toFixed` only applies to numeric sources. A failed parse gives `null`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NumberFormatter;

/// Upper bound accepted for `toFixed`.
const MAX_FRACTION_DIGITS: usize = 100;

impl Formatter for NumberFormatter {
    fn name(&self) -> &str {
        "Number"
    }

    fn format(&self, ctx: &FormatContext<'_>) -> Result<Option<Value>> {
        let mut current = ctx.source().cloned();

        if let Some(digits) = ctx.option("toFixed").and_then(Value::as_f64) {
            if let Some(n) = current.as_ref().and_then(Value::as_f64) {
                let digits = (digits.max(0.0) as usize).min(MAX_FRACTION_DIGITS);
                current = Some(Value::String(fixed_text(n, digits)));
            }
        }

        if ctx.option("toInteger") == Some(&Value::Bool(true)) {
            current = Some(
                parse_int_prefix(&display(current.as_ref()))
                    .map(Value::from)
                    .unwrap_or(Value::Null),
            );
        }

        if ctx.option("toFloat") == Some(&Value::Bool(true)) {
            current = Some(
                parse_float_prefix(&display(current.as_ref()))
                    .map(number_value)
                    .unwrap_or(Value::Null),
            );
        }

        if let Some(unit) = ctx.option("unit").and_then(Value::as_str) {
            current = Some(Value::String(format!("{}{}", display(current.as_ref()), unit)));
        }

        Ok(current)
    }
}
