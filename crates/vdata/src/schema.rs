//! Per-entity static configuration.
//!
//! A [`Schema`] is everything an entity declares up front: labels, format
//! specs, validation rules, endpoints and optional overrides of the primary
//! key and shadow postfix. It is authored in code, not parsed.
//!
//! ```ignore
//! struct Product;
//!
//! impl Entity for Product {
//!     fn schema() -> Schema {
//!         Schema::new()
//!             .primary_key("sku")
//!             .label("sku", "SKU")
//!             .format("price", FormatSpec::with_formatter(NumberFormatter).option("toFixed", 2))
//!             .rule(Rule::new(["sku", "name"], "Required"))
//!             .rule(Rule::new(["price"], "Number").param("min", 0))
//!             .endpoints(Endpoints::new().list("/products").view("/products/view"))
//!     }
//! }
//! ```

use std::collections::HashMap;

use crate::format::FormatSpec;
use crate::transport::Endpoints;
use crate::validator::Rule;

/// Declarative description of one entity type.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Overrides the configured primary key name when set.
    pub primary_key: Option<String>,

    /// Overrides the configured shadow postfix when set.
    pub attribute_postfix: Option<String>,

    pub labels: HashMap<String, String>,

    pub formats: HashMap<String, FormatSpec>,

    /// Run in declaration order by `Record::validate`.
    pub rules: Vec<Rule>,

    pub endpoints: Endpoints,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary_key(mut self, name: impl Into<String>) -> Self {
        self.primary_key = Some(name.into());
        self
    }

    pub fn attribute_postfix(mut self, postfix: impl Into<String>) -> Self {
        self.attribute_postfix = Some(postfix.into());
        self
    }

    pub fn label(mut self, attribute: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(attribute.into(), label.into());
        self
    }

    pub fn format(mut self, attribute: impl Into<String>, spec: FormatSpec) -> Self {
        self.formats.insert(attribute.into(), spec);
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

/// An entity type with a static schema.
pub trait Entity {
    fn schema() -> Schema;
}
