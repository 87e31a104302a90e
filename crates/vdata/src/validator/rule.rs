//! Rule declarations.

use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use super::{ValidationContext, Validator};

/// Builds a fresh validator instance for one run.
pub type ValidatorFactory = Rc<dyn Fn() -> Box<dyn Validator>>;

/// Predicate consumed by the `Function` validator.
///
/// The callback receives the full validation context, so it can read the
/// value, the rule, other attributes, and record its own messages.
pub type Callback = Rc<dyn Fn(&mut ValidationContext<'_>) -> bool>;

/// How a rule refers to its validator.
#[derive(Clone, Default)]
pub enum ValidatorRef {
    /// A constructor supplied directly by the rule author.
    Direct(ValidatorFactory),
    /// A name resolved through the [`ValidatorRegistry`](super::ValidatorRegistry)
    /// at validation time.
    Named(String),
    /// No validator. The rule is vacuously satisfied.
    #[default]
    Unset,
}

impl ValidatorRef {
    /// Direct reference to a default-constructible validator type.
    pub fn of<V>() -> Self
    where
        V: Validator + Default + 'static,
    {
        ValidatorRef::Direct(Rc::new(|| Box::new(V::default())))
    }

    pub fn named(name: impl Into<String>) -> Self {
        ValidatorRef::Named(name.into())
    }

    /// Short description for logs: the name for named references.
    pub fn describe(&self) -> &str {
        match self {
            ValidatorRef::Direct(_) => "<direct>",
            ValidatorRef::Named(name) => name,
            ValidatorRef::Unset => "<unset>",
        }
    }
}

impl From<&str> for ValidatorRef {
    fn from(name: &str) -> Self {
        ValidatorRef::Named(name.to_string())
    }
}

impl From<String> for ValidatorRef {
    fn from(name: String) -> Self {
        ValidatorRef::Named(name)
    }
}

impl fmt::Debug for ValidatorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidatorRef::Direct(_) => f.write_str("Direct(..)"),
            ValidatorRef::Named(name) => f.debug_tuple("Named").field(name).finish(),
            ValidatorRef::Unset => f.write_str("Unset"),
        }
    }
}

/// A declarative binding of attributes to a validator and its parameters.
///
/// ```ignore
/// Rule::new(["age"], "Integer").param("min", 0).param("max", 150);
/// Rule::new(["password_confirm"], "Compare")
///     .param("operator", "===")
///     .param("attribute", "password");
/// ```
#[derive(Clone, Default)]
pub struct Rule {
    pub attributes: Vec<String>,
    pub validator: ValidatorRef,
    pub params: Map<String, Value>,
    pub callback: Option<Callback>,
}

impl Rule {
    pub fn new<I, S>(attributes: I, validator: impl Into<ValidatorRef>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attributes: attributes.into_iter().map(Into::into).collect(),
            validator: validator.into(),
            params: Map::new(),
            callback: None,
        }
    }

    /// Set a validator-specific parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Attach the predicate used by the `Function` validator.
    pub fn callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut ValidationContext<'_>) -> bool + 'static,
    {
        self.callback = Some(Rc::new(callback));
        self
    }

    pub fn param_value(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    pub fn has_param(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("attributes", &self.attributes)
            .field("validator", &self.validator)
            .field("params", &self.params)
            .field("callback", &self.callback.as_ref().map(|_| ".."))
            .finish()
    }
}
