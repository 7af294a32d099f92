// File: src/config.rs
// Purpose: Declarative route tables (TOML / JSON) building a Router

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DefinitionError, Result, RoutingError};
use crate::route::{Route, DEFAULT_PRIORITY};
use crate::router::Router;

/// Route table
///
/// ```toml
/// [[routes]]
/// path = "/users"
/// methods = "GET"
///
///   [[routes.routes]]
///   path = "/{id::int}"
///   name = "user"
///   defaults = { id = 1 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouterDefinition {
    #[serde(default)]
    pub routes: Vec<RouteDefinition>,
}

/// One entry of a route table, with its children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDefinition {
    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub defaults: BTreeMap<String, Value>,

    #[serde(default)]
    pub requirements: BTreeMap<String, String>,

    /// A single method or a list
    #[serde(default)]
    pub methods: Option<OneOrMany>,

    /// A single host or a list
    #[serde(default)]
    pub hosts: Option<OneOrMany>,

    #[serde(default = "default_priority")]
    pub priority: i32,

    #[serde(default)]
    pub options: Map<String, Value>,

    /// Free-form payload, e.g. a handler name
    #[serde(default)]
    pub context: Value,

    #[serde(default)]
    pub routes: Vec<RouteDefinition>,
}

/// `"GET"` or `["GET", "POST"]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

impl RouterDefinition {
    pub fn from_toml_str(source: &str) -> Result<Self, DefinitionError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_json_str(source: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Builds every route of the table
    pub fn build(self) -> Result<Router> {
        let routes = self
            .routes
            .into_iter()
            .map(RouteDefinition::build)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(routes = routes.len(), "route table loaded");
        Ok(Router::new().with_routes(routes))
    }
}

impl RouteDefinition {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            defaults: BTreeMap::new(),
            requirements: BTreeMap::new(),
            methods: None,
            hosts: None,
            priority: DEFAULT_PRIORITY,
            options: Map::new(),
            context: Value::Null,
            routes: Vec::new(),
        }
    }

    /// Builds the route and its children
    ///
    /// # Errors
    ///
    /// [`DefinitionError::Route`] naming the path of the innermost invalid
    /// entry.
    pub fn build(self) -> Result<Route> {
        let path = self.path.clone();
        let children = self
            .routes
            .into_iter()
            .map(RouteDefinition::build)
            .collect::<Result<Vec<_>>>()?;

        let mut builder = Route::builder(self.path)
            .defaults(self.defaults)
            .requirements(self.requirements)
            .priority(self.priority)
            .options(self.options)
            .context(self.context)
            .routes(children);

        if let Some(name) = self.name {
            builder = builder.name(name);
        }
        if let Some(methods) = self.methods {
            builder = builder.methods(methods.into_vec());
        }
        if let Some(hosts) = self.hosts {
            builder = builder.hosts(hosts.into_vec());
        }

        builder.build().map_err(|error| match error {
            nested @ RoutingError::Definition(_) => nested,
            source => DefinitionError::Route {
                path,
                source: Box::new(source),
            }
            .into(),
        })
    }
}
