//! Validator resolution and dispatch.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{trace, warn};

use super::builtin::{
    CompareValidator, EnumValidator, FunctionValidator, IntegerValidator, NumberValidator,
    RequiredValidator, StringValidator, TrimValidator,
};
use super::{Rule, ValidationContext, Validator, ValidatorFactory, ValidatorRef};
use crate::record::Record;

thread_local! {
    static BUILTINS: Rc<ValidatorRegistry> = Rc::new(ValidatorRegistry::with_builtins());
}

/// Maps validator names to factories and runs rules against records.
///
/// The registry is populated up front; resolving a name is a plain map
/// lookup. Names that are not registered resolve to nothing, and the rule is
/// then treated as satisfied.
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    factories: HashMap<String, ValidatorFactory>,
}

impl ValidatorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in validators under their short names:
    /// `Required`, `Number`, `Integer`, `String`, `Enum`, `Compare`,
    /// `Function` and `Trim`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_default::<RequiredValidator>("Required");
        registry.register_default::<NumberValidator>("Number");
        registry.register_default::<IntegerValidator>("Integer");
        registry.register_default::<StringValidator>("String");
        registry.register_default::<EnumValidator>("Enum");
        registry.register_default::<CompareValidator>("Compare");
        registry.register_default::<FunctionValidator>("Function");
        registry.register_default::<TrimValidator>("Trim");
        registry
    }

    /// The shared built-in registry for the current thread.
    pub fn builtins() -> Rc<Self> {
        BUILTINS.with(Rc::clone)
    }

    /// Register (or replace) a factory under `name`.
    pub fn register(&mut self, name: impl Into<String>, factory: ValidatorFactory) {
        self.factories.insert(name.into(), factory);
    }

    /// Register a default-constructible validator type under `name`.
    pub fn register_default<V>(&mut self, name: impl Into<String>)
    where
        V: Validator + Default + 'static,
    {
        self.register(name, Rc::new(|| Box::new(V::default())));
    }

    /// Whether a factory is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build a validator instance for the given reference.
    ///
    /// Returns `None` for [`ValidatorRef::Unset`] and for unknown names.
    pub fn resolve(&self, reference: &ValidatorRef) -> Option<Box<dyn Validator>> {
        match reference {
            ValidatorRef::Direct(factory) => Some(factory()),
            ValidatorRef::Named(name) => self.factories.get(name).map(|factory| factory()),
            ValidatorRef::Unset => None,
        }
    }

    /// Run one rule against one attribute of `record`.
    ///
    /// Returns the validator's verdict. An unresolvable validator yields
    /// `true`; the dispatcher never adds messages of its own.
    pub fn dispatch(&self, record: &mut Record, attribute: &str, rule: &Rule) -> bool {
        let reference = rule.validator.describe();
        let Some(validator) = self.resolve(&rule.validator) else {
            match rule.validator {
                ValidatorRef::Unset => {
                    trace!(validator = reference, attribute, "rule has no validator")
                }
                _ => warn!(validator = reference, attribute, "unresolved validator, rule skipped"),
            }
            return true;
        };

        let mut ctx = ValidationContext::new(record, attribute, rule);
        let passed = validator.run(&mut ctx);
        trace!(
            validator = validator.name(),
            reference,
            attribute,
            passed,
            "rule dispatched"
        );
        passed
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("names", &self.names())
            .finish()
    }
}
