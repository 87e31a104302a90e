//! # Formatter Chain
//!
//! A record keeps raw values exactly as they were assigned. What callers read
//! back through [`Record::get_value`](crate::record::Record::get_value) may
//! differ: an attribute can carry a [`FormatSpec`] that derives the visible
//! value from the raw one.
//!
//! ## Resolution
//!
//! ```text
//! source  = raw[attr]
//! shadow  = raw[attr + postfix]          (postfix defaults to "_view")
//! fmt     = formatter.format(ctx)        (only when a formatter is attached)
//!
//! Resolve::With(f)   → f(source, shadow, fmt)
//! Resolve::Map(m)    → m[display(source)]
//! Resolve::Formatter → fmt if a formatter is attached, else source
//! ```
//!
//! ## Recursion Safety
//!
//! Formatters receive a [`FormatContext`], which exposes raw values only.
//! There is deliberately no way to reach `get_value` from inside a formatter,
//! so a formatter cannot re-enter its own resolution.

mod number;

pub use number::NumberFormatter;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::error::{DataError, Result};
use crate::record::Record;
use crate::value::display;

/// Computes a derived value for one attribute.
pub trait Formatter {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Compute the formatted value. `Ok(None)` means "no value".
    ///
    /// Concrete formatters must override this. The default reports
    /// [`DataError::FormatterNotImplemented`].
    fn format(&self, ctx: &FormatContext<'_>) -> Result<Option<Value>> {
        Err(DataError::FormatterNotImplemented {
            formatter: self.name().to_string(),
            attribute: ctx.attribute().to_string(),
        })
    }
}

/// Read-only view handed to a formatter.
pub struct FormatContext<'a> {
    record: &'a Record,
    attribute: &'a str,
    options: &'a Map<String, Value>,
}

impl<'a> FormatContext<'a> {
    pub fn new(record: &'a Record, attribute: &'a str, options: &'a Map<String, Value>) -> Self {
        Self {
            record,
            attribute,
            options,
        }
    }

    pub fn attribute(&self) -> &'a str {
        self.attribute
    }

    /// Raw value of the attribute being formatted.
    pub fn source(&self) -> Option<&'a Value> {
        self.record.get_source(self.attribute)
    }

    /// Raw value of any attribute on the record.
    pub fn source_of(&self, attribute: &str) -> Option<&'a Value> {
        self.record.get_source(attribute)
    }

    pub fn options(&self) -> &'a Map<String, Value> {
        self.options
    }

    pub fn option(&self, key: &str) -> Option<&'a Value> {
        self.options.get(key)
    }
}

/// Custom resolution: `(source, shadow, formatter_value) -> final value`.
pub type ResolveFn = Rc<dyn Fn(Option<&Value>, Option<&Value>, Option<&Value>) -> Option<Value>>;

/// How the final value of a formatted attribute is chosen.
#[derive(Clone, Default)]
pub enum Resolve {
    /// Formatter output when a formatter is attached, the raw value otherwise.
    #[default]
    Formatter,
    /// Lookup keyed by the raw value's text form. A miss yields no value.
    Map(HashMap<String, Value>),
    /// Caller-supplied function.
    With(ResolveFn),
}

impl fmt::Debug for Resolve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolve::Formatter => f.write_str("Formatter"),
            Resolve::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Resolve::With(_) => f.write_str("With(..)"),
        }
    }
}

/// Per-attribute formatting configuration.
///
/// ```ignore
/// // "3.14159" -> "3.14 kg"
/// FormatSpec::with_formatter(NumberFormatter)
///     .option("toFixed", 2)
///     .option("unit", " kg");
///
/// // 1 -> "Active", 0 -> "Disabled"
/// FormatSpec::lookup([("1", "Active"), ("0", "Disabled")]);
/// ```
#[derive(Clone, Default)]
pub struct FormatSpec {
    pub formatter: Option<Rc<dyn Formatter>>,
    pub options: Map<String, Value>,
    pub resolve: Resolve,
}

impl FormatSpec {
    /// A spec with no formatter and default resolution (raw value).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_formatter(formatter: impl Formatter + 'static) -> Self {
        Self {
            formatter: Some(Rc::new(formatter)),
            ..Self::default()
        }
    }

    /// A spec that maps raw values to display values.
    pub fn lookup<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::new().resolve_map(entries)
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn options(mut self, options: Map<String, Value>) -> Self {
        self.options = options;
        self
    }

    pub fn resolve_map<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.resolve = Resolve::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn resolve_with<F>(mut self, resolve: F) -> Self
    where
        F: Fn(Option<&Value>, Option<&Value>, Option<&Value>) -> Option<Value> + 'static,
    {
        self.resolve = Resolve::With(Rc::new(resolve));
        self
    }

    /// Resolve the final value of `attribute` on `record`.
    pub fn apply(&self, record: &Record, attribute: &str, shadow: Option<&Value>) -> Result<Option<Value>> {
        let source = record.get_source(attribute);

        let formatted = match &self.formatter {
            Some(formatter) => {
                let ctx = FormatContext::new(record, attribute, &self.options);
                formatter.format(&ctx)?
            }
            None => None,
        };

        Ok(match &self.resolve {
            Resolve::With(resolve) => resolve(source, shadow, formatted.as_ref()),
            Resolve::Map(map) => map.get(&display(source)).cloned(),
            Resolve::Formatter if self.formatter.is_some() => formatted,
            Resolve::Formatter => source.cloned(),
        })
    }
}

impl fmt::Debug for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatSpec")
            .field("formatter", &self.formatter.as_ref().map(|fmt| fmt.name().to_string()))
            .field("options", &self.options)
            .field("resolve", &self.resolve)
            .finish()
    }
}
