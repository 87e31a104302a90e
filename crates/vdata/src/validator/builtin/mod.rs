//! Built-in validators.
//!
//! | Registry name | Type | Parameters |
//! |---------------|------|------------|
//! | `Required` | [`RequiredValidator`] | |
//! | `Number` | [`NumberValidator`] | `min`, `max` |
//! | `Integer` | [`IntegerValidator`] | `min`, `max` |
//! | `String` | [`StringValidator`] | `min`, `max`, `length` |
//! | `Enum` | [`EnumValidator`] | `in`, `notIn` |
//! | `Compare` | [`CompareValidator`] | `operator`, `value` or `attribute` |
//! | `Function` | [`FunctionValidator`] | callback |
//! | `Trim` | [`TrimValidator`] | |
//!
//! Numeric parameters (`min`, `max`, `length`) are only honoured when they
//! are JSON numbers; anything else is ignored. `in` / `notIn` likewise only
//! apply when they are arrays.

mod compare;

pub use compare::CompareOp;

use serde_json::Value;
use tracing::warn;

use super::{ValidationContext, Validator};
use crate::value::{as_finite, display, is_truthy, is_whole_number, strict_eq, to_number};

pub const MSG_REQUIRED: &str = "{attribute} must not be empty";
pub const MSG_NOT_NUMBER: &str = "{attribute} must be a number";
pub const MSG_NOT_INTEGER: &str = "{attribute} must be an integer";
pub const MSG_NOT_STRING: &str = "{attribute} must be a string";
pub const MSG_NOT_IN: &str = "{attribute} out of allowed range";
pub const MSG_FORBIDDEN: &str = "{attribute} may not use this value";
pub const MSG_INVALID_OPERATOR: &str = "{attribute} declares an invalid comparison operator";

/// Numeric rule parameter, if present and numeric.
fn numeric_param<'a>(ctx: &ValidationContext<'a>, key: &str) -> Option<&'a Value> {
    ctx.rule_param(key).filter(|v| v.is_number())
}

/// Check `measured` against the rule's `min` / `max`.
///
/// `subject` prefixes the bound wording, e.g. `"length "`.
fn check_bounds(ctx: &mut ValidationContext<'_>, measured: f64, subject: &str) -> bool {
    if let Some(min) = numeric_param(ctx, "min") {
        if measured < to_number(Some(min)) {
            ctx.add_error(&format!(
                "{{attribute}} {subject}must not be less than {}",
                display(Some(min))
            ));
            return false;
        }
    }
    if let Some(max) = numeric_param(ctx, "max") {
        if measured > to_number(Some(max)) {
            ctx.add_error(&format!(
                "{{attribute}} {subject}must not be greater than {}",
                display(Some(max))
            ));
            return false;
        }
    }
    true
}

/// Fails on empty values.
///
/// Numeric zero is *not* empty. Absent values, `null`, `false`, `""`, empty
/// arrays, and objects whose every value is falsy are.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequiredValidator;

impl RequiredValidator {
    pub fn is_empty(value: Option<&Value>) -> bool {
        match value {
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => false,
            v if !is_truthy(v) => true,
            Some(Value::Array(items)) => items.is_empty(),
            Some(Value::Object(map)) => !map.values().any(|v| is_truthy(Some(v))),
            _ => false,
        }
    }
}

impl Validator for RequiredValidator {
    fn name(&self) -> &'static str {
        "Required"
    }

    fn run(&self, ctx: &mut ValidationContext<'_>) -> bool {
        if Self::is_empty(ctx.validate_value()) {
            ctx.add_error(MSG_REQUIRED);
            return false;
        }
        true
    }
}

/// Requires a finite number, optionally bounded by `min` / `max`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NumberValidator;

impl Validator for NumberValidator {
    fn name(&self) -> &'static str {
        "Number"
    }

    fn run(&self, ctx: &mut ValidationContext<'_>) -> bool {
        let Some(number) = as_finite(ctx.validate_value()) else {
            ctx.add_error(MSG_NOT_NUMBER);
            return false;
        };
        check_bounds(ctx, number, "")
    }
}

/// Requires a whole number, optionally bounded by `min` / `max`.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntegerValidator;

impl Validator for IntegerValidator {
    fn name(&self) -> &'static str {
        "Integer"
    }

    fn run(&self, ctx: &mut ValidationContext<'_>) -> bool {
        let value = ctx.validate_value();
        let whole = is_whole_number(value);
        let number = to_number(value);
        if !whole {
            ctx.add_error(MSG_NOT_INTEGER);
            return false;
        }
        check_bounds(ctx, number, "")
    }
}

/// Requires text, with optional length bounds (`min`, `max`) and an exact
/// `length`. Length counts characters, not bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringValidator;

impl Validator for StringValidator {
    fn name(&self) -> &'static str {
        "String"
    }

    fn run(&self, ctx: &mut ValidationContext<'_>) -> bool {
        let length = ctx
            .validate_value()
            .and_then(Value::as_str)
            .map(|s| s.chars().count());
        let Some(length) = length else {
            ctx.add_error(MSG_NOT_STRING);
            return false;
        };

        if !check_bounds(ctx, length as f64, "length ") {
            return false;
        }

        if let Some(expected) = numeric_param(ctx, "length") {
            if length as f64 != to_number(Some(expected)) {
                ctx.add_error(&format!(
                    "{{attribute}} length must be exactly {}",
                    display(Some(expected))
                ));
                return false;
            }
        }
        true
    }
}

/// Membership check against `in` (allow list) and `notIn` (deny list).
///
/// Membership uses strict equality.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnumValidator;

impl Validator for EnumValidator {
    fn name(&self) -> &'static str {
        "Enum"
    }

    fn run(&self, ctx: &mut ValidationContext<'_>) -> bool {
        let value = ctx.validate_value().cloned();
        let contains = |list: &[Value]| list.iter().any(|item| strict_eq(Some(item), value.as_ref()));

        if let Some(Value::Array(allowed)) = ctx.rule_param("in") {
            if !contains(allowed.as_slice()) {
                ctx.add_error(MSG_NOT_IN);
                return false;
            }
        }
        if let Some(Value::Array(denied)) = ctx.rule_param("notIn") {
            if contains(denied.as_slice()) {
                ctx.add_error(MSG_FORBIDDEN);
                return false;
            }
        }
        true
    }
}

/// Compares the value against a literal (`value`) or another attribute's raw
/// value (`attribute`). A literal takes priority; with neither parameter the
/// rule passes.
#[derive(Debug, Default, Clone, Copy)]
pub struct CompareValidator;

impl Validator for CompareValidator {
    fn name(&self) -> &'static str {
        "Compare"
    }

    fn run(&self, ctx: &mut ValidationContext<'_>) -> bool {
        let target = if ctx.rule().has_param("value") {
            ctx.rule_param("value").cloned()
        } else if let Some(other) = ctx.rule_param("attribute") {
            let name = match other {
                Value::String(name) => name.clone(),
                other => display(Some(other)),
            };
            ctx.record().get_source(&name).cloned()
        } else {
            return true;
        };

        let Some(op) = ctx
            .rule_param("operator")
            .and_then(Value::as_str)
            .and_then(CompareOp::parse)
        else {
            ctx.add_error(MSG_INVALID_OPERATOR);
            return false;
        };

        if !op.holds(ctx.validate_value(), target.as_ref()) {
            ctx.add_error(&format!(
                "{{attribute}} must be {} {}",
                op.relation(),
                display(target.as_ref())
            ));
            return false;
        }
        true
    }
}

/// Delegates to the rule's callback.
///
/// A rule without a callback has nothing to check and passes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FunctionValidator;

impl Validator for FunctionValidator {
    fn name(&self) -> &'static str {
        "Function"
    }

    fn run(&self, ctx: &mut ValidationContext<'_>) -> bool {
        let Some(callback) = ctx.rule().callback.clone() else {
            warn!(attribute = ctx.attribute(), "Function rule declared without a callback");
            return true;
        };
        callback(ctx)
    }
}

/// Rewrites a text value to its whitespace-trimmed form. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrimValidator;

impl Validator for TrimValidator {
    fn name(&self) -> &'static str {
        "Trim"
    }

    fn run(&self, ctx: &mut ValidationContext<'_>) -> bool {
        let trimmed = ctx
            .validate_value()
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string());
        if let Some(trimmed) = trimmed {
            let attribute = ctx.attribute();
            ctx.record_mut().set_value(attribute, Value::String(trimmed));
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::schema::Schema;
    use crate::validator::{Rule, ValidatorRegistry};
    use serde_json::json;

    fn record_with(values: Value) -> Record {
        let mut record = Record::new(Schema::new());
        if let Value::Object(map) = values {
            record.set_values(map);
        }
        record
    }

    fn run(record: &mut Record, rule: Rule) -> bool {
        let registry = ValidatorRegistry::with_builtins();
        let attribute = rule.attributes[0].clone();
        registry.dispatch(record, &attribute, &rule)
    }

    // --- Required ---

    #[test]
    fn test_required_accepts_numeric_zero() {
        let mut record = record_with(json!({"id": 0}));
        assert!(run(&mut record, Rule::new(["id"], "Required")));
        assert!(!record.has_errors());
    }

    #[test]
    fn test_required_rejects_empty_values() {
        for empty in [json!(""), json!([]), json!(null), json!(false), json!({"a": 0, "b": ""})] {
            let mut record = record_with(json!({"field": empty.clone()}));
            assert!(!run(&mut record, Rule::new(["field"], "Required")), "{empty}");
            assert_eq!(record.error("field"), ["Field must not be empty"]);
        }
    }

    #[test]
    fn test_required_rejects_absent_value() {
        let mut record = record_with(json!({}));
        assert!(!run(&mut record, Rule::new(["title"], "Required")));
        assert_eq!(record.error("title"), ["Title must not be empty"]);
    }

    #[test]
    fn test_required_accepts_filled_values() {
        for filled in [json!("x"), json!([0]), json!({"a": 1}), json!(-3), json!(true)] {
            let mut record = record_with(json!({"field": filled.clone()}));
            assert!(run(&mut record, Rule::new(["field"], "Required")), "{filled}");
        }
    }

    // --- Number ---

    #[test]
    fn test_number_rejects_text() {
        let mut record = record_with(json!({"price": "12"}));
        assert!(!run(&mut record, Rule::new(["price"], "Number")));
        assert_eq!(record.error("price"), ["Price must be a number"]);
    }

    #[test]
    fn test_number_checks_bounds() {
        let mut record = record_with(json!({"price": 2.5}));
        assert!(!run(&mut record, Rule::new(["price"], "Number").param("min", 3)));
        assert_eq!(record.error("price"), ["Price must not be less than 3"]);

        let mut record = record_with(json!({"price": 2.5}));
        assert!(!run(&mut record, Rule::new(["price"], "Number").param("max", 1.5)));
        assert_eq!(record.error("price"), ["Price must not be greater than 1.5"]);

        let mut record = record_with(json!({"price": 2.5}));
        let rule = Rule::new(["price"], "Number").param("min", 0).param("max", 10);
        assert!(run(&mut record, rule));
    }

    #[test]
    fn test_number_ignores_non_numeric_bounds() {
        let mut record = record_with(json!({"price": 2}));
        assert!(run(&mut record, Rule::new(["price"], "Number").param("min", "5")));
    }

    // --- Integer ---

    #[test]
    fn test_integer_accepts_whole_numbers() {
        let mut record = record_with(json!({"age": 30}));
        assert!(run(&mut record, Rule::new(["age"], "Integer").param("min", 0)));
        assert!(!record.has_errors());
    }

    #[test]
    fn test_integer_rejects_fractions_and_text() {
        let mut record = record_with(json!({"age": 30.5}));
        assert!(!run(&mut record, Rule::new(["age"], "Integer")));
        assert_eq!(record.error("age"), ["Age must be an integer"]);

        let mut record = record_with(json!({"age": "30"}));
        assert!(!run(&mut record, Rule::new(["age"], "Integer")));
    }

    #[test]
    fn test_integer_checks_bounds() {
        let mut record = record_with(json!({"age": 200}));
        assert!(!run(&mut record, Rule::new(["age"], "Integer").param("max", 150)));
        assert_eq!(record.error("age"), ["Age must not be greater than 150"]);
    }

    // --- String ---

    #[test]
    fn test_string_min_length() {
        let mut record = record_with(json!({"code": "ab"}));
        assert!(!run(&mut record, Rule::new(["code"], "String").param("min", 3)));
        assert_eq!(record.error("code"), ["Code length must not be less than 3"]);
    }

    #[test]
    fn test_string_max_length_passes_within_bound() {
        let mut record = record_with(json!({"code": "abcd"}));
        assert!(run(&mut record, Rule::new(["code"], "String").param("max", 5)));
        assert!(!record.has_errors());
    }

    #[test]
    fn test_string_max_length_compares_against_max() {
        let mut record = record_with(json!({"code": "abcdef"}));
        let rule = Rule::new(["code"], "String").param("min", 1).param("max", 5);
        assert!(!run(&mut record, rule));
        assert_eq!(record.error("code"), ["Code length must not be greater than 5"]);
    }

    #[test]
    fn test_string_exact_length() {
        let mut record = record_with(json!({"pin": "123"}));
        assert!(!run(&mut record, Rule::new(["pin"], "String").param("length", 4)));
        assert_eq!(record.error("pin"), ["Pin length must be exactly 4"]);

        let mut record = record_with(json!({"pin": "1234"}));
        assert!(run(&mut record, Rule::new(["pin"], "String").param("length", 4)));
    }

    #[test]
    fn test_string_counts_characters_not_bytes() {
        let mut record = record_with(json!({"name": "héllo"}));
        assert!(run(&mut record, Rule::new(["name"], "String").param("max", 5)));
    }

    #[test]
    fn test_string_rejects_non_text() {
        let mut record = record_with(json!({"name": 12}));
        assert!(!run(&mut record, Rule::new(["name"], "String")));
        assert_eq!(record.error("name"), ["Name must be a string"]);
    }

    // --- Enum ---

    #[test]
    fn test_enum_in_list() {
        let mut record = record_with(json!({"status": "done"}));
        let rule = Rule::new(["status"], "Enum").param("in", json!(["draft", "done"]));
        assert!(run(&mut record, rule));

        let mut record = record_with(json!({"status": "lost"}));
        let rule = Rule::new(["status"], "Enum").param("in", json!(["draft", "done"]));
        assert!(!run(&mut record, rule));
        assert_eq!(record.error("status"), ["Status out of allowed range"]);
    }

    #[test]
    fn test_enum_in_list_is_strict() {
        let mut record = record_with(json!({"level": "1"}));
        let rule = Rule::new(["level"], "Enum").param("in", json!([1, 2]));
        assert!(!run(&mut record, rule));
    }

    #[test]
    fn test_enum_not_in_list() {
        let mut record = record_with(json!({"name": "root"}));
        let rule = Rule::new(["name"], "Enum").param("notIn", json!(["root", "admin"]));
        assert!(!run(&mut record, rule));
        assert_eq!(record.error("name"), ["Name may not use this value"]);
    }

    #[test]
    fn test_enum_ignores_non_array_lists() {
        let mut record = record_with(json!({"name": "root"}));
        let rule = Rule::new(["name"], "Enum").param("in", "root");
        assert!(run(&mut record, rule));
    }

    // --- Compare ---

    #[test]
    fn test_compare_with_literal_value() {
        let mut record = record_with(json!({"age": 16}));
        let rule = Rule::new(["age"], "Compare")
            .param("operator", ">=")
            .param("value", 18);
        assert!(!run(&mut record, rule));
        assert_eq!(record.error("age"), ["Age must be greater than or equal to 18"]);
    }

    #[test]
    fn test_compare_with_other_attribute() {
        let mut record = record_with(json!({"password": "s3cret", "password_confirm": "s3cret"}));
        let rule = Rule::new(["password_confirm"], "Compare")
            .param("operator", "===")
            .param("attribute", "password");
        assert!(run(&mut record, rule));

        record.set_value("password_confirm", json!("typo"));
        let rule = Rule::new(["password_confirm"], "Compare")
            .param("operator", "===")
            .param("attribute", "password");
        assert!(!run(&mut record, rule));
        assert_eq!(
            record.error("password_confirm"),
            ["PasswordConfirm must be equal to s3cret"]
        );
    }

    #[test]
    fn test_compare_literal_takes_priority_over_attribute() {
        let mut record = record_with(json!({"a": 1, "b": 2}));
        let rule = Rule::new(["a"], "Compare")
            .param("operator", "==")
            .param("value", 1)
            .param("attribute", "b");
        assert!(run(&mut record, rule));
    }

    #[test]
    fn test_compare_without_target_passes() {
        let mut record = record_with(json!({"a": 1}));
        let rule = Rule::new(["a"], "Compare").param("operator", "%");
        assert!(run(&mut record, rule));
        assert!(!record.has_errors());
    }

    #[test]
    fn test_compare_rejects_unknown_operator() {
        let mut record = record_with(json!({"a": 1}));
        let rule = Rule::new(["a"], "Compare")
            .param("operator", "%")
            .param("value", 1);
        assert!(!run(&mut record, rule));
        assert_eq!(record.error("a"), ["A declares an invalid comparison operator"]);
    }

    // --- Function ---

    #[test]
    fn test_function_uses_callback_verdict() {
        let mut record = record_with(json!({"slug": "Has Spaces"}));
        let rule = Rule::new(["slug"], "Function").callback(|ctx| {
            let ok = ctx
                .validate_value()
                .and_then(Value::as_str)
                .is_some_and(|s| !s.contains(' '));
            if !ok {
                ctx.add_error("{attribute} must not contain spaces");
            }
            ok
        });
        assert!(!run(&mut record, rule));
        assert_eq!(record.error("slug"), ["Slug must not contain spaces"]);
    }

    #[test]
    fn test_function_callback_sees_rule_params() {
        let mut record = record_with(json!({"n": 4}));
        let rule = Rule::new(["n"], "Function")
            .param("divisor", 2)
            .callback(|ctx| {
                let divisor = ctx.rule_param("divisor").and_then(Value::as_i64).unwrap_or(1);
                ctx.validate_value().and_then(Value::as_i64).is_some_and(|n| n % divisor == 0)
            });
        assert!(run(&mut record, rule));
    }

    #[test]
    fn test_function_without_callback_passes() {
        let mut record = record_with(json!({"n": 4}));
        assert!(run(&mut record, Rule::new(["n"], "Function")));
    }

    // --- Trim ---

    #[test]
    fn test_trim_rewrites_text() {
        let mut record = record_with(json!({"title": "  hello \n"}));
        assert!(run(&mut record, Rule::new(["title"], "Trim")));
        assert_eq!(record.get_source("title"), Some(&json!("hello")));
    }

    #[test]
    fn test_trim_leaves_other_values_alone() {
        let mut record = record_with(json!({"count": 3}));
        assert!(run(&mut record, Rule::new(["count"], "Trim")));
        assert_eq!(record.get_source("count"), Some(&json!(3)));

        let mut record = record_with(json!({}));
        assert!(run(&mut record, Rule::new(["missing"], "Trim")));
        assert!(record.get_source("missing").is_none());
        assert!(record.attribute_names().is_empty());
    }
}
