//! # vdata Architecture
//!
//! vdata models **server-backed entities as declarative records**. An entity
//! declares its labels, formatting and validation rules once, in a
//! [`Schema`]; each [`Record`] built from that schema holds the values of one
//! instance.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Schema (schema.rs)                                         │
//! │  - Labels, format specs, rules, endpoints                   │
//! │  - Authored in code, via the Entity trait                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Record (record/)                                           │
//! │  - Tracked attributes and raw values                        │
//! │  - get_value: format spec, shadow, or raw                   │
//! │  - Error bag, validate(), request shaping                   │
//! └─────────────────────────────────────────────────────────────┘
//!            │                                   │
//!            ▼                                   ▼
//! ┌──────────────────────────┐     ┌──────────────────────────┐
//! │  Formatters (format/)    │     │  Validators (validator/) │
//! │  - Formatter trait       │     │  - Registry + dispatch   │
//! │  - NumberFormatter       │     │  - Eight built-ins       │
//! └──────────────────────────┘     └──────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Transport seam (transport.rs)                              │
//! │  - Transport trait, injected by the caller                  │
//! │  - MemoryTransport for tests                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Values
//!
//! Attribute values are [`serde_json::Value`]. "Never assigned" is `None`
//! and is distinct from an assigned `null`. The loose comparisons and
//! truthiness rules used by validators live in [`value`].
//!
//! ## Failures
//!
//! A failed validation is data: messages in the record's [`ErrorBag`], never
//! an `Err`. [`DataError`] is reserved for contract violations (a formatter
//! without `format`), configuration problems and transport failures.
//!
//! ## Threading
//!
//! Everything is single-threaded. Records, schemas and registries use `Rc`
//! and are not `Send`.
//!
//! ## Quick Example
//!
//! ```rust
//! use serde_json::json;
//! use vdata::{Record, Rule, Schema};
//!
//! let schema = Schema::new()
//!     .rule(Rule::new(["title"], "Required"))
//!     .rule(Rule::new(["age"], "Integer").param("min", 0));
//!
//! let mut record = Record::new(schema);
//! record.set_value("title", "");
//! record.set_value("age", -1);
//!
//! assert!(record.validate());
//! assert_eq!(record.one_error(None, ""), "Title must not be empty");
//! assert_eq!(record.error("age"), ["Age must not be less than 0"]);
//! assert_eq!(record.get_value("age").unwrap(), Some(json!(-1)));
//! ```
//!
//! ## Module Overview
//!
//! - [`record`]: The `Record` type and its `ErrorBag`
//! - [`schema`]: Per-entity configuration and the `Entity` trait
//! - [`format`]: Formatter trait, format specs and `NumberFormatter`
//! - [`validator`]: Rules, the validator registry and the built-in validators
//! - [`transport`]: Transport seam and the in-memory transport
//! - [`value`]: Loose-typing helpers over `serde_json::Value`
//! - [`config`]: Record-wide defaults
//! - [`error`]: Error types

pub mod config;
pub mod error;
pub mod format;
pub mod record;
pub mod schema;
pub mod transport;
pub mod validator;
pub mod value;

pub use config::RecordConfig;
pub use error::{DataError, Result};
pub use format::{FormatContext, FormatSpec, Formatter, NumberFormatter, Resolve};
pub use record::{ActionRequest, ErrorBag, Record, ViewRequest};
pub use schema::{Entity, Schema};
pub use transport::{ApiCall, CallKind, Endpoints, MemoryTransport, Transport};
pub use validator::{Rule, ValidationContext, Validator, ValidatorRef, ValidatorRegistry};
