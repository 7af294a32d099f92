//! Route attributes
//!
//! An attribute is a named placeholder of a route template (`{id}`) carrying
//! an optional default value and an optional validation regex. Both fall
//! back to the same-named attribute of the nearest ancestor route when they
//! are not set locally.
//!
//! ```
//! use route_tree::{Route, RouteSet};
//!
//! let mut group = Route::builder("/users/{id}")
//!     .requirement("id", r"\d+")
//!     .build()
//!     .unwrap();
//! group.add_route(Route::builder("/posts").default("id", 1).build().unwrap());
//!
//! let posts = group.routes().next().unwrap();
//! let id = posts.attribute("id").unwrap();
//! assert_eq!(id.regex(), Some(r"\d+"));
//! assert_eq!(id.default(), Some(&serde_json::json!(1)));
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::route::Scope;

/// A named placeholder with optional default and validation regex
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    regex: Option<String>,
    /// Parent scope of the declaring route, rebuilt by `Route::relink`
    #[serde(skip)]
    scope: Option<Arc<Scope>>,
}

impl Attribute {
    /// Creates an attribute without default nor regex
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            regex: None,
            scope: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.set_default(default);
        self
    }

    pub fn with_regex(mut self, regex: impl Into<String>) -> Self {
        self.set_regex(regex);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default value, local first then inherited
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref().or_else(|| {
            self.scope
                .as_deref()
                .and_then(|scope| scope.inherited_default(&self.name))
        })
    }

    /// Validation regex, local first then inherited
    pub fn regex(&self) -> Option<&str> {
        self.regex.as_deref().or_else(|| {
            self.scope
                .as_deref()
                .and_then(|scope| scope.inherited_regex(&self.name))
        })
    }

    pub fn has_default(&self) -> bool {
        self.default().is_some()
    }

    pub fn has_regex(&self) -> bool {
        self.regex().is_some()
    }

    /// Sets the local default; `null` clears it
    pub fn set_default(&mut self, default: impl Into<Value>) {
        self.default = match default.into() {
            Value::Null => None,
            value => Some(value),
        };
    }

    /// Sets the local regex, shadowing any inherited one
    pub fn set_regex(&mut self, regex: impl Into<String>) {
        self.regex = Some(regex.into());
    }

    pub fn clear_regex(&mut self) {
        self.regex = None;
    }

    pub(crate) fn local_default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub(crate) fn local_regex(&self) -> Option<&str> {
        self.regex.as_deref()
    }

    pub(crate) fn attach(&mut self, scope: Option<Arc<Scope>>) {
        self.scope = scope;
    }
}

/// Equality of the persisted triple; the scope link is not compared
impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.default == other.default && self.regex == other.regex
    }
}
