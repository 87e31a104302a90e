//! # Transport Seam
//!
//! Records do not talk to a server themselves. They shape request data
//! (see [`Record::list_request_params`](crate::record::Record::list_request_params)
//! and friends) and hand an [`ApiCall`] to whatever [`Transport`] the caller
//! injects. The HTTP client, auth headers and permission checks live behind
//! that trait and are out of scope here.
//!
//! | Call | Endpoint | Query | Body |
//! |------|----------|-------|------|
//! | `on_list` | `Endpoints::list` | `get_values()` | empty |
//! | `on_view` | `Endpoints::view` | `{id}` | empty |
//! | `on_action` | `Endpoints::action` | `{id}` | `get_values()` |
//!
//! [`MemoryTransport`] records every call and answers from a queue, which is
//! all the tests need.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{DataError, Result};

/// Which of the three entity endpoints a call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    List,
    View,
    Action,
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallKind::List => "list",
            CallKind::View => "view",
            CallKind::Action => "action",
        };
        f.write_str(name)
    }
}

/// Endpoint names declared by an entity. Unset endpoints cannot be called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoints {
    pub list: Option<String>,
    pub view: Option<String>,
    pub action: Option<String>,
}

impl Endpoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(mut self, endpoint: impl Into<String>) -> Self {
        self.list = Some(endpoint.into());
        self
    }

    pub fn view(mut self, endpoint: impl Into<String>) -> Self {
        self.view = Some(endpoint.into());
        self
    }

    pub fn action(mut self, endpoint: impl Into<String>) -> Self {
        self.action = Some(endpoint.into());
        self
    }

    pub fn get(&self, kind: CallKind) -> Option<&str> {
        match kind {
            CallKind::List => self.list.as_deref(),
            CallKind::View => self.view.as_deref(),
            CallKind::Action => self.action.as_deref(),
        }
    }

    /// The endpoint for `kind`, or [`DataError::MissingEndpoint`].
    pub fn require(&self, kind: CallKind) -> Result<&str> {
        self.get(kind).ok_or(DataError::MissingEndpoint(kind))
    }
}

/// One outgoing request, fully shaped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiCall {
    pub kind: CallKind,
    pub endpoint: String,
    pub query: Map<String, Value>,
    pub body: Map<String, Value>,
}

/// Delivers calls to a backend and returns the decoded response.
///
/// Implementations take `&self`; a transport with state uses interior
/// mutability, the way [`MemoryTransport`] does.
pub trait Transport {
    fn call(&self, call: &ApiCall) -> Result<Value>;
}

/// In-memory transport for tests.
///
/// Uses `RefCell` since records are single-threaded. Responses are handed
/// out in FIFO order; when the queue is empty every call answers `null`.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    calls: RefCell<Vec<ApiCall>>,
    responses: RefCell<VecDeque<Result<Value>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn respond(&self, response: Value) {
        self.responses.borrow_mut().push_back(Ok(response));
    }

    /// Queue a transport failure.
    pub fn fail(&self, message: impl Into<String>) {
        self.responses
            .borrow_mut()
            .push_back(Err(DataError::Transport(message.into())));
    }

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.borrow().clone()
    }

    pub fn last_call(&self) -> Option<ApiCall> {
        self.calls.borrow().last().cloned()
    }
}

impl Transport for MemoryTransport {
    fn call(&self, call: &ApiCall) -> Result<Value> {
        self.calls.borrow_mut().push(call.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}
