use std::collections::BTreeMap;

use once_cell::sync::OnceCell;
use serde_json::{Map, Value};

use super::{validate_requirement, Route, DEFAULT_PRIORITY};
use crate::attribute::Attribute;
use crate::error::{Result, RoutingError};
use crate::set::RouteSet;
use crate::template::{self, Constraint};
use crate::types;

/// Step-by-step construction of a [`Route`]
///
/// Nothing is validated before [`RouteBuilder::build`].
///
/// # Examples
///
/// ```
/// use route_tree::Route;
///
/// let route = Route::builder("/blog/{slug::slug}[/{page}]")
///     .name("post")
///     .default("page", 1)
///     .requirement("page", r"\d+")
///     .methods(["GET", "HEAD"])
///     .host("www.example.com")
///     .priority(10)
///     .option("cache", true)
///     .context("blog::show")
///     .build()
///     .unwrap();
///
/// assert_eq!(route.local_path(), "/blog/{slug}[/{page}]");
/// assert_eq!(route.generate(&[("slug", "hello")]).unwrap(), "/blog/hello/1");
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct RouteBuilder {
    path: String,
    defaults: Vec<(String, Value)>,
    requirements: Vec<(String, String)>,
    name: Option<String>,
    methods: Option<Vec<String>>,
    hosts: Option<Vec<String>>,
    priority: i32,
    options: Map<String, Value>,
    context: Value,
    routes: Vec<Route>,
}

impl RouteBuilder {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            defaults: Vec::new(),
            requirements: Vec::new(),
            name: None,
            methods: None,
            hosts: None,
            priority: DEFAULT_PRIORITY,
            options: Map::new(),
            context: Value::Null,
            routes: Vec::new(),
        }
    }

    /// Default value of an attribute, declared in the template or inherited
    pub fn default(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.push((name.into(), value.into()));
        self
    }

    pub fn defaults<I, K, V>(mut self, defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.defaults
            .extend(defaults.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Validation regex of an attribute, overriding any inline constraint
    pub fn requirement(mut self, name: impl Into<String>, regex: impl Into<String>) -> Self {
        self.requirements.push((name.into(), regex.into()));
        self
    }

    pub fn requirements<I, K, V>(mut self, requirements: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.requirements
            .extend(requirements.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds an accepted method; the first call replaces the inherited set
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.methods
            .get_or_insert_with(Vec::new)
            .push(method.into().to_uppercase());
        self
    }

    pub fn methods<I, S>(self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        methods.into_iter().fold(self, RouteBuilder::method)
    }

    /// Adds an accepted host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.hosts
            .get_or_insert_with(Vec::new)
            .push(host.into().to_lowercase());
        self
    }

    pub fn hosts<I, S>(self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        hosts.into_iter().fold(self, RouteBuilder::host)
    }

    /// Higher priorities are tested first among siblings
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    pub fn options(mut self, options: Map<String, Value>) -> Self {
        self.options.extend(options);
        self
    }

    /// Opaque payload returned with the route, e.g. a handler identifier
    pub fn context(mut self, context: impl Into<Value>) -> Self {
        self.context = context.into();
        self
    }

    /// Child route; the built route becomes a group
    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn routes<I>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = Route>,
    {
        self.routes.extend(routes);
        self
    }

    /// Parses the template and assembles the route
    ///
    /// # Errors
    ///
    /// - [`RoutingError::UnbalancedSegment`] for a stray `[` or `]`
    /// - [`RoutingError::DuplicateAttribute`] when a placeholder repeats
    /// - [`RoutingError::UnknownType`] for an unregistered `::alias`
    /// - [`RoutingError::InvalidRequirement`] for an invalid regex
    pub fn build(self) -> Result<Route> {
        let tokens = template::parse(&self.path)?;
        let mut attributes = BTreeMap::new();

        for placeholder in template::placeholders(&tokens) {
            if attributes.contains_key(&placeholder.name) {
                return Err(RoutingError::DuplicateAttribute {
                    name: placeholder.name.clone(),
                    path: self.path.clone(),
                });
            }

            let mut attribute = Attribute::new(placeholder.name.as_str());
            match &placeholder.constraint {
                Some(Constraint::Regex(regex)) => {
                    validate_requirement(&placeholder.name, regex)?;
                    attribute.set_regex(regex.as_str());
                }
                Some(Constraint::Type(alias)) => attribute.set_regex(types::resolve(alias)?),
                None => {}
            }
            attributes.insert(placeholder.name.clone(), attribute);
        }

        for (name, regex) in self.requirements {
            validate_requirement(&name, &regex)?;
            attributes
                .entry(name.clone())
                .or_insert_with(|| Attribute::new(name))
                .set_regex(regex);
        }

        for (name, default) in self.defaults {
            attributes
                .entry(name.clone())
                .or_insert_with(|| Attribute::new(name))
                .set_default(default);
        }

        let mut route = Route {
            path: template::normalize(&tokens),
            name: self.name,
            methods: self.methods,
            hosts: self.hosts,
            priority: self.priority,
            attributes,
            options: self.options,
            context: self.context,
            routes: Vec::new(),
            scope: None,
            pattern: OnceCell::new(),
        };
        route.add_routes(self.routes);

        Ok(route)
    }
}
