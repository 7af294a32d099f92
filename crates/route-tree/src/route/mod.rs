//! Routes and route groups
//!
//! A [`Route`] is a path template plus the metadata used to match requests
//! against it (methods, hosts, attribute constraints) and to generate paths
//! from it. A route with children is a group: it is never matched itself,
//! but its path prefix, attributes, methods and options are inherited by
//! every descendant.
//!
//! ## Example
//!
//! ```
//! use route_tree::{Route, RouteSet, ServerRequest};
//!
//! let admin = Route::builder("/admin")
//!     .method("GET")
//!     .route(Route::new("/users/{id::int}").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let user = admin.routes().next().unwrap();
//! assert_eq!(user.path(), "/admin/users/{id}");
//!
//! let attributes = user.test(&ServerRequest::get("/admin/users/42")).unwrap();
//! assert_eq!(attributes["id"], "42");
//! assert!(user.test(&ServerRequest::new("POST", "/admin/users/42")).is_none());
//! assert_eq!(user.generate(&[("id", 7)]).unwrap(), "/admin/users/7");
//! ```

mod builder;
mod compile;
mod generate;
mod scope;

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::attribute::Attribute;
use crate::error::Result;
use crate::params::RouteParameters;
use crate::request::{Attributes, Request};
use crate::set::RouteSet;

pub use builder::RouteBuilder;
pub use generate::GeneratedPath;

pub(crate) use compile::{validate_requirement, Pattern};
pub(crate) use scope::Scope;

/// Methods accepted by a route when neither it nor an ancestor sets any
pub const DEFAULT_METHODS: [&str; 8] = [
    "GET", "HEAD", "POST", "OPTIONS", "CONNECT", "TRACE", "PUT", "DELETE",
];

/// Default priority of a route
pub const DEFAULT_PRIORITY: i32 = -1;

/// A path template, or a group of child routes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RouteRecord")]
pub struct Route {
    path: String,
    name: Option<String>,
    methods: Option<Vec<String>>,
    hosts: Option<Vec<String>>,
    priority: i32,
    #[serde(serialize_with = "serialize_attributes")]
    attributes: BTreeMap<String, Attribute>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    options: Map<String, Value>,
    #[serde(skip_serializing_if = "Value::is_null")]
    context: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    routes: Vec<Route>,
    /// Inheritable state of the ancestors; `None` for roots
    #[serde(skip)]
    scope: Option<Arc<Scope>>,
    #[serde(skip)]
    pattern: OnceCell<Pattern>,
}

impl Route {
    /// Creates a route from a template with no extra settings
    ///
    /// # Errors
    ///
    /// Fails on unknown type aliases, duplicate placeholders, unbalanced
    /// optional segments and invalid inline regexes.
    pub fn new(path: &str) -> Result<Self> {
        Self::builder(path).build()
    }

    pub fn builder(path: impl Into<String>) -> RouteBuilder {
        RouteBuilder::new(path)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Template of this node only, inline constraints stripped
    pub fn local_path(&self) -> &str {
        &self.path
    }

    /// Full template: every ancestor's local path followed by this one
    pub fn path(&self) -> String {
        match &self.scope {
            Some(scope) => format!("{}{}", scope.path, self.path),
            None => self.path.clone(),
        }
    }

    /// Attribute declared by this route or, failing that, its nearest ancestor
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .get(name)
            .or_else(|| self.scope.as_deref().and_then(|scope| scope.attribute(name)))
    }

    /// Attributes declared locally, by name
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    /// Effective methods: local, else inherited, else [`DEFAULT_METHODS`]
    pub fn methods(&self) -> Vec<&str> {
        let inherited = self
            .methods
            .as_deref()
            .or_else(|| self.scope.as_deref().and_then(Scope::methods));

        match inherited {
            Some(methods) => methods.iter().map(String::as_str).collect(),
            None => DEFAULT_METHODS.to_vec(),
        }
    }

    pub fn accepts_method(&self, method: &str) -> bool {
        let method = method.to_uppercase();
        self.methods().contains(&method.as_str())
    }

    /// Hosts declared by this route; never inherited
    pub fn hosts(&self) -> Option<&[String]> {
        self.hosts.as_deref()
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Options declared locally
    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// Option declared locally or by the nearest ancestor
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options
            .get(name)
            .or_else(|| self.scope.as_deref().and_then(|scope| scope.option(name)))
    }

    pub fn context(&self) -> &Value {
        &self.context
    }

    pub fn set_context(&mut self, context: impl Into<Value>) {
        self.context = context.into();
    }

    pub fn with_context(mut self, context: impl Into<Value>) -> Self {
        self.set_context(context);
        self
    }

    /// A route with children never matches a request itself
    pub fn is_group(&self) -> bool {
        !self.routes.is_empty()
    }

    /// Sets the local default of an attribute, declaring it if needed
    ///
    /// A `null` default clears the local value.
    pub fn set_default(&mut self, name: &str, default: impl Into<Value>) {
        self.attribute_entry(name).set_default(default);
        self.invalidate();
    }

    /// Sets the local regex of an attribute, declaring it if needed
    pub fn set_requirement(&mut self, name: &str, regex: &str) -> Result<()> {
        validate_requirement(name, regex)?;
        self.attribute_entry(name).set_regex(regex);
        self.invalidate();
        Ok(())
    }

    pub fn set_option(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.options.insert(name.into(), value.into());
        self.relink();
    }

    /// Adds a child route, turning this route into a group
    pub fn with_route(mut self, route: Route) -> Self {
        self.add_route(route);
        self
    }

    pub fn with_routes<I>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = Route>,
    {
        self.add_routes(routes);
        self
    }

    /// Compiled matching pattern of the full path
    ///
    /// Compiled on first use, then memoized until the route or one of its
    /// ancestors changes.
    pub fn compile(&self) -> Result<&Regex> {
        self.pattern().map(Pattern::regex)
    }

    /// Tests a request against this route
    ///
    /// Returns the extracted attributes on success. Groups never match.
    pub fn test<R: Request + ?Sized>(&self, request: &R) -> Option<Attributes> {
        if self.is_group() {
            return None;
        }

        let pattern = match self.pattern() {
            Ok(pattern) => pattern,
            Err(error) => {
                tracing::warn!(path = %self.path(), %error, "skipping route with invalid pattern");
                return None;
            }
        };

        let attributes = pattern.captures(&request.path())?;

        if !self.accepts_method(request.method()) {
            return None;
        }

        if let Some(hosts) = &self.hosts {
            let host = request.host()?.to_lowercase();
            if !hosts.contains(&host) {
                return None;
            }
        }

        Some(attributes)
    }

    /// Generates a path from parameters
    ///
    /// Parameters that do not fill a placeholder are appended as a query
    /// string.
    ///
    /// # Errors
    ///
    /// [`RoutingError::MissingAttributes`](crate::RoutingError::MissingAttributes)
    /// when a required placeholder has neither a value nor a default.
    pub fn generate<P: RouteParameters + ?Sized>(&self, parameters: &P) -> Result<String> {
        self.generate_scored(parameters)
            .map(|generated| generated.path)
    }

    /// Same as [`Route::generate`], also reporting how many parameters were
    /// substituted into the path
    pub fn generate_scored<P: RouteParameters + ?Sized>(
        &self,
        parameters: &P,
    ) -> Result<GeneratedPath> {
        generate::generate(self, &parameters.route_parameters())
    }

    fn pattern(&self) -> Result<&Pattern> {
        self.pattern.get_or_try_init(|| compile::compile(self))
    }

    /// Resolved regex of a placeholder of the full path
    pub(crate) fn regex_of(&self, name: &str) -> Option<&str> {
        match self.attributes.get(name) {
            Some(attribute) => attribute.regex(),
            None => self
                .scope
                .as_deref()
                .and_then(|scope| scope.inherited_regex(name)),
        }
    }

    /// Resolved default of a placeholder of the full path
    pub(crate) fn default_of(&self, name: &str) -> Option<&Value> {
        match self.attributes.get(name) {
            Some(attribute) => attribute.default(),
            None => self
                .scope
                .as_deref()
                .and_then(|scope| scope.inherited_default(name)),
        }
    }

    fn attribute_entry(&mut self, name: &str) -> &mut Attribute {
        let scope = self.scope.clone();
        self.attributes.entry(name.to_string()).or_insert_with(|| {
            let mut attribute = Attribute::new(name);
            attribute.attach(scope);
            attribute
        })
    }

    /// Snapshot handed down to the children of this route
    fn child_scope(&self) -> Arc<Scope> {
        Arc::new(Scope {
            path: self.path(),
            attributes: self.attributes.clone(),
            methods: self.methods.clone(),
            options: self.options.clone(),
            parent: self.scope.clone(),
        })
    }

    /// Binds this route, and its subtree, below a new parent scope
    pub(crate) fn attach(&mut self, scope: Option<Arc<Scope>>) {
        for attribute in self.attributes.values_mut() {
            attribute.attach(scope.clone());
        }
        self.scope = scope;
        self.invalidate();
    }

    /// Drops the memoized pattern and rebuilds the children's scopes
    fn invalidate(&mut self) {
        self.pattern = OnceCell::new();
        self.relink();
    }

    /// Rebuilds the scope of every descendant from this route's state
    pub(crate) fn relink(&mut self) {
        if self.routes.is_empty() {
            return;
        }
        let scope = self.child_scope();
        for route in &mut self.routes {
            route.attach(Some(Arc::clone(&scope)));
        }
    }
}

impl RouteSet for Route {
    fn children(&self) -> &[Route] {
        &self.routes
    }

    fn children_mut(&mut self) -> &mut Vec<Route> {
        &mut self.routes
    }

    fn adopt(&mut self) {
        self.relink();
    }
}

/// Structural equality; memoized patterns and scope links are ignored
impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
            && self.name == other.name
            && self.methods == other.methods
            && self.hosts == other.hosts
            && self.priority == other.priority
            && self.attributes == other.attributes
            && self.options == other.options
            && self.context == other.context
            && self.routes == other.routes
    }
}

fn serialize_attributes<S>(
    attributes: &BTreeMap<String, Attribute>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(attributes.values())
}

/// Persisted form of a route; back-references are rebuilt on load
#[derive(Deserialize)]
struct RouteRecord {
    #[serde(default)]
    path: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    methods: Option<Vec<String>>,
    #[serde(default)]
    hosts: Option<Vec<String>>,
    #[serde(default = "default_priority")]
    priority: i32,
    #[serde(default)]
    attributes: Vec<Attribute>,
    #[serde(default)]
    options: Map<String, Value>,
    #[serde(default)]
    context: Value,
    #[serde(default)]
    routes: Vec<Route>,
}

fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

impl From<RouteRecord> for Route {
    fn from(record: RouteRecord) -> Self {
        let mut route = Route {
            path: record.path,
            name: record.name,
            methods: record.methods,
            hosts: record.hosts,
            priority: record.priority,
            attributes: record
                .attributes
                .into_iter()
                .map(|attribute| (attribute.name().to_string(), attribute))
                .collect(),
            options: record.options,
            context: record.context,
            routes: record.routes,
            scope: None,
            pattern: OnceCell::new(),
        };
        route.relink();
        route
    }
}
