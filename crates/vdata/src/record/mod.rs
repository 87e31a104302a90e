//! # Records
//!
//! A [`Record`] is one instance of an entity: a bag of named values plus the
//! entity's [`Schema`]. It knows three things about each attribute:
//!
//! - **Tracked**: the name was assigned at least once. Tracked names keep
//!   first-assignment order and drive [`Record::get_values`].
//! - **Raw**: the last assigned value, returned untouched by
//!   [`Record::get_source`].
//! - **Visible**: the value produced by [`Record::get_value`], which may run
//!   a format spec or pick the attribute's shadow (`name` + postfix).
//!
//! Reads never change what is tracked or stored.
//!
//! ## Errors
//!
//! [`Record::validate`] runs every rule against every listed attribute and
//! collects messages into an [`ErrorBag`]. Messages accumulate across calls
//! until [`Record::clear_errors`].

mod errors;

pub use errors::ErrorBag;

use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::RecordConfig;
use crate::error::{DataError, Result};
use crate::format::FormatSpec;
use crate::schema::{Entity, Schema};
use crate::transport::{ApiCall, CallKind, Endpoints, Transport};
use crate::validator::{Rule, ValidatorRegistry};

/// Query half of an action request and the whole of a view request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

/// `{get: {id}, body: {...values}}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRequest {
    pub get: ViewRequest,
    pub body: Map<String, Value>,
}

/// A single entity instance with tracked attributes, formatting and
/// validation.
#[derive(Debug, Clone)]
pub struct Record {
    /// Raw values keyed by attribute, in first-assignment order.
    values: Map<String, Value>,
    primary_key: String,
    postfix: String,
    labels: HashMap<String, String>,
    formats: HashMap<String, FormatSpec>,
    rules: Vec<Rule>,
    endpoints: Endpoints,
    errors: ErrorBag,
    registry: Rc<ValidatorRegistry>,
}

impl Record {
    /// A record using compiled config defaults and the built-in validators.
    pub fn new(schema: Schema) -> Self {
        Self::with_config(schema, &RecordConfig::default())
    }

    /// A record whose primary key and postfix fall back to `config` where the
    /// schema does not override them.
    pub fn with_config(schema: Schema, config: &RecordConfig) -> Self {
        let Schema {
            primary_key,
            attribute_postfix,
            labels,
            formats,
            rules,
            endpoints,
        } = schema;

        Self {
            values: Map::new(),
            primary_key: primary_key.unwrap_or_else(|| config.primary_key.clone()),
            postfix: attribute_postfix.unwrap_or_else(|| config.attribute_postfix.clone()),
            labels,
            formats,
            rules,
            endpoints,
            errors: ErrorBag::new(),
            registry: ValidatorRegistry::builtins(),
        }
    }

    /// A record for entity type `E`.
    pub fn from_entity<E: Entity>() -> Self {
        Self::new(E::schema())
    }

    /// Resolve named validators through `registry` instead of the built-ins.
    pub fn with_registry(mut self, registry: Rc<ValidatorRegistry>) -> Self {
        self.registry = registry;
        self
    }

    // --- Values ---

    /// Store `value` under `attribute`, tracking the name on first use.
    pub fn set_value(&mut self, attribute: impl Into<String>, value: impl Into<Value>) {
        // Re-inserting an existing key keeps its original position.
        self.values.insert(attribute.into(), value.into());
    }

    /// `set_value` for each entry, in iteration order.
    pub fn set_values<I, K, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (attribute, value) in values {
            self.set_value(attribute, value);
        }
    }

    /// Raw value, exactly as last assigned.
    pub fn get_source(&self, attribute: &str) -> Option<&Value> {
        self.values.get(attribute)
    }

    /// Raw values for `names`. Names never assigned are left out.
    pub fn get_sources<I, S>(&self, names: I) -> Map<String, Value>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|name| {
                let name = name.as_ref();
                self.get_source(name).map(|value| (name.to_string(), value.clone()))
            })
            .collect()
    }

    /// The visible value of `attribute`.
    ///
    /// With a format spec, the spec decides (see [`FormatSpec::apply`]).
    /// Without one, a tracked shadow attribute wins over the raw value.
    ///
    /// Fails only when an attached formatter does not implement `format`.
    pub fn get_value(&self, attribute: &str) -> Result<Option<Value>> {
        let shadow_name = self.shadow_name(attribute);
        let shadow = self.get_source(&shadow_name);

        match self.formats.get(attribute) {
            Some(spec) => spec.apply(self, attribute, shadow).map_err(|err| {
                warn!(attribute, error = %err, "formatter failed");
                err
            }),
            None if self.is_tracked(&shadow_name) => Ok(shadow.cloned()),
            None => Ok(self.get_source(attribute).cloned()),
        }
    }

    /// Visible values of every tracked attribute, in tracking order.
    pub fn get_values(&self) -> Result<Map<String, Value>> {
        self.get_values_of(self.values.keys())
    }

    /// Visible values of `names`, in the given order. Attributes that resolve
    /// to no value are left out.
    pub fn get_values_of<I, S>(&self, names: I) -> Result<Map<String, Value>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut values = Map::new();
        for name in names {
            let name = name.as_ref();
            if let Some(value) = self.get_value(name)? {
                values.insert(name.to_string(), value);
            }
        }
        Ok(values)
    }

    /// Tracked attribute names in first-assignment order.
    pub fn attribute_names(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }

    pub fn is_tracked(&self, attribute: &str) -> bool {
        self.values.contains_key(attribute)
    }

    /// Raw value of the primary key.
    pub fn id(&self) -> Option<&Value> {
        self.get_source(&self.primary_key)
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn attribute_postfix(&self) -> &str {
        &self.postfix
    }

    fn shadow_name(&self, attribute: &str) -> String {
        format!("{}{}", attribute, self.postfix)
    }

    // --- Labels ---

    /// Declared label, or one derived from the name (`user_name` -> `UserName`).
    pub fn label(&self, attribute: &str) -> String {
        match self.labels.get(attribute) {
            Some(label) if !label.is_empty() => label.clone(),
            _ => derive_label(attribute),
        }
    }

    /// Declared labels only.
    pub fn labels(&self) -> &HashMap<String, String> {
        &self.labels
    }

    // --- Errors ---

    pub fn add_error(&mut self, attribute: impl Into<String>, message: impl Into<String>) {
        self.errors.add(attribute, message);
    }

    pub fn add_errors<I, K, V>(&mut self, errors: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (attribute, message) in errors {
            self.add_error(attribute, message);
        }
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &ErrorBag {
        &self.errors
    }

    /// All messages for `attribute`; empty when there are none.
    pub fn error(&self, attribute: &str) -> &[String] {
        self.errors.get(attribute)
    }

    /// First message for `attribute`, or the first message of the first
    /// failing attribute when `attribute` is `None`.
    pub fn first_error(&self, attribute: Option<&str>) -> Option<&str> {
        match attribute {
            Some(attribute) => self.error(attribute).first().map(String::as_str),
            None => self.errors.first(),
        }
    }

    /// [`first_error`](Self::first_error), falling back to `default`.
    pub fn one_error<'a>(&'a self, attribute: Option<&str>, default: &'a str) -> &'a str {
        self.first_error(attribute).unwrap_or(default)
    }

    // --- Validation ---

    /// Run every rule over every attribute it lists, in declaration order.
    ///
    /// Nothing short-circuits: each failing check adds its own messages.
    /// Returns whether the record has any error afterwards, including errors
    /// left over from earlier calls.
    pub fn validate(&mut self) -> bool {
        let rules = self.rules.clone();
        let registry = Rc::clone(&self.registry);
        debug!(rules = rules.len(), "validation started");

        for rule in &rules {
            for attribute in &rule.attributes {
                registry.dispatch(self, attribute, rule);
            }
        }

        let has_errors = self.has_errors();
        debug!(
            attributes = self.errors.len(),
            messages = self.errors.message_count(),
            has_errors,
            "validation finished"
        );
        has_errors
    }

    // --- Requests ---

    /// Query parameters for a list call: every visible value.
    pub fn list_request_params(&self) -> Result<Map<String, Value>> {
        self.get_values()
    }

    pub fn view_request(&self) -> ViewRequest {
        ViewRequest {
            id: self.id().cloned(),
        }
    }

    pub fn action_request_params(&self) -> Result<ActionRequest> {
        Ok(ActionRequest {
            get: self.view_request(),
            body: self.get_values()?,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Call the list endpoint with the list parameters.
    pub fn on_list<T: Transport + ?Sized>(&self, transport: &T) -> Result<Value> {
        let call = ApiCall {
            kind: CallKind::List,
            endpoint: self.endpoints.require(CallKind::List)?.to_string(),
            query: self.list_request_params()?,
            body: Map::new(),
        };
        send(transport, &call)
    }

    /// Call the view endpoint and load an object response into the record.
    ///
    /// A `null` response leaves the record unchanged. Anything other than an
    /// object or `null` is [`DataError::UnexpectedResponse`].
    pub fn on_view<T: Transport + ?Sized>(&mut self, transport: &T) -> Result<()> {
        let call = ApiCall {
            kind: CallKind::View,
            endpoint: self.endpoints.require(CallKind::View)?.to_string(),
            query: to_map(&self.view_request())?,
            body: Map::new(),
        };

        match send(transport, &call)? {
            Value::Object(values) => {
                self.set_values(values);
                Ok(())
            }
            Value::Null => Ok(()),
            other => Err(DataError::UnexpectedResponse(format!(
                "view response must be an object, got {}",
                other
            ))),
        }
    }

    /// Call the action endpoint with `{id}` as query and the values as body.
    pub fn on_action<T: Transport + ?Sized>(&self, transport: &T) -> Result<Value> {
        let request = self.action_request_params()?;
        let call = ApiCall {
            kind: CallKind::Action,
            endpoint: self.endpoints.require(CallKind::Action)?.to_string(),
            query: to_map(&request.get)?,
            body: request.body,
        };
        send(transport, &call)
    }
}

fn send<T: Transport + ?Sized>(transport: &T, call: &ApiCall) -> Result<Value> {
    debug!(kind = %call.kind, endpoint = %call.endpoint, "transport call");
    transport.call(call)
}

fn to_map<S: Serialize>(value: &S) -> Result<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(DataError::UnexpectedResponse(format!(
            "expected an object, got {}",
            other
        ))),
    }
}

/// `user_name` -> `UserName`. Empty segments stay empty.
fn derive_label(attribute: &str) -> String {
    attribute.split('_').map(capitalize).collect()
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
