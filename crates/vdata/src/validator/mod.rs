//! # Rule-Based Validation
//!
//! Validation is declarative: a record carries a list of [`Rule`]s, each
//! binding one or more attribute names to a validator plus its parameters.
//! [`Record::validate`](crate::record::Record::validate) walks the rules in
//! declaration order and hands every (attribute, rule) pair to the
//! [`ValidatorRegistry`], which resolves the validator and runs it.
//!
//! ## Validator Lifecycle
//!
//! ```text
//! Rule { attributes, validator, params }
//!          │
//!          ▼  (per attribute)
//! ValidatorRegistry::dispatch
//!   ├── Direct(factory)  → factory()
//!   ├── Named("Number")  → registry lookup → factory()
//!   └── Unset / unknown  → vacuous pass
//!          │
//!          ▼
//! Validator::run(&mut ValidationContext) → bool
//! ```
//!
//! A validator instance lives for exactly one `run` call. It never returns an
//! error to signal a failed check: it records a message through
//! [`ValidationContext::add_error`] and returns `false`.
//!
//! ## Message Templates
//!
//! Messages may contain the literal token `{attribute}`, which is replaced by
//! the attribute's display label before the message is stored on the record.

mod builtin;
mod registry;
mod rule;

pub use builtin::{
    CompareOp, CompareValidator, EnumValidator, FunctionValidator, IntegerValidator,
    NumberValidator, RequiredValidator, StringValidator, TrimValidator,
};
pub use registry::ValidatorRegistry;
pub use rule::{Callback, Rule, ValidatorFactory, ValidatorRef};

use serde_json::Value;

use crate::record::Record;

/// Token substituted with the attribute label in error messages.
pub const ATTRIBUTE_TOKEN: &str = "{attribute}";

/// A single validation predicate.
///
/// Implementors inspect the value through the context, call
/// [`ValidationContext::add_error`] on failure and return whether the check
/// passed.
pub trait Validator {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Run the check against the bound (record, attribute, rule).
    fn run(&self, ctx: &mut ValidationContext<'_>) -> bool;
}

/// Binding of one validator run to a record, an attribute and a rule.
pub struct ValidationContext<'a> {
    record: &'a mut Record,
    attribute: &'a str,
    rule: &'a Rule,
}

impl<'a> ValidationContext<'a> {
    pub fn new(record: &'a mut Record, attribute: &'a str, rule: &'a Rule) -> Self {
        Self {
            record,
            attribute,
            rule,
        }
    }

    /// The attribute under validation.
    pub fn attribute(&self) -> &'a str {
        self.attribute
    }

    /// The rule being applied.
    pub fn rule(&self) -> &'a Rule {
        self.rule
    }

    pub fn record(&self) -> &Record {
        self.record
    }

    /// Mutable access, for validators that rewrite values (see `Trim`).
    pub fn record_mut(&mut self) -> &mut Record {
        self.record
    }

    /// Raw value of the attribute under validation.
    pub fn validate_value(&self) -> Option<&Value> {
        self.record.get_source(self.attribute)
    }

    /// A rule parameter by key (e.g. `min`, `operator`).
    pub fn rule_param(&self, key: &str) -> Option<&'a Value> {
        self.rule.param_value(key)
    }

    /// Record an error for the attribute under validation.
    ///
    /// Every `{attribute}` token in `message` is replaced by the attribute's
    /// label. Returns the expanded message.
    pub fn add_error(&mut self, message: &str) -> String {
        let label = self.record.label(self.attribute);
        let expanded = message.replace(ATTRIBUTE_TOKEN, &label);
        self.record.add_error(self.attribute, expanded.clone());
        expanded
    }
}
