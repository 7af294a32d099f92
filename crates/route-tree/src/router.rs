//! Router: request handling and named path generation
//!
//! ## Example
//!
//! ```
//! use route_tree::{Request, Route, Router, ServerRequest};
//! use serde_json::json;
//!
//! let router = Router::new()
//!     .with_route(Route::builder("/").name("home").build().unwrap())
//!     .with_route(
//!         Route::builder("/users")
//!             .route(Route::builder("/{id::int}").name("user").build().unwrap())
//!             .build()
//!             .unwrap(),
//!     );
//!
//! let handled = router.handle(ServerRequest::get("/users/42"));
//! assert_eq!(handled.route.and_then(|route| route.name()), Some("user"));
//! assert_eq!(handled.request.attribute("id"), Some("42"));
//!
//! assert_eq!(
//!     router.generate("user", &json!({ "id": 7, "tab": "posts" })).unwrap(),
//!     "/users/7?tab=posts"
//! );
//! assert!(router.is_valid_path("/"));
//! assert!(!router.is_valid_path("/users/abc"));
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::RouterDefinition;
use crate::error::{Result, RoutingError};
use crate::params::{self, RouteParameters};
use crate::request::{Request, ServerRequest};
use crate::route::Route;
use crate::set::RouteSet;

/// Top-level collection of routes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Router {
    #[serde(default)]
    routes: Vec<Route>,
}

/// Outcome of [`Router::handle`]
#[derive(Debug)]
pub struct Handled<'a, R> {
    /// The request, with the matched route's attributes attached
    pub request: R,
    /// Matched route, `None` when nothing matched
    pub route: Option<&'a Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route (builder pattern)
    pub fn with_route(mut self, route: Route) -> Self {
        self.add_route(route);
        self
    }

    /// Adds several routes (builder pattern)
    pub fn with_routes<I>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = Route>,
    {
        self.add_routes(routes);
        self
    }

    /// Builds a router from a TOML route table
    pub fn from_toml_str(source: &str) -> Result<Self> {
        RouterDefinition::from_toml_str(source)?.build()
    }

    /// Builds a router from a JSON route table
    pub fn from_json_str(source: &str) -> Result<Self> {
        RouterDefinition::from_json_str(source)?.build()
    }

    /// Builds a router from a TOML route table file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        RouterDefinition::from_toml_file(path)?.build()
    }

    /// Compiles every leaf pattern now instead of on first request
    ///
    /// # Errors
    ///
    /// The first route whose pattern does not compile.
    pub fn warm_up(&self) -> Result<()> {
        for route in self.routes() {
            route.compile()?;
        }
        tracing::debug!(routes = self.count(), "route patterns compiled");
        Ok(())
    }

    /// Finds the route matching a request
    ///
    /// On a match, the extracted attributes are attached to the returned
    /// request. Not finding a route is not an error.
    pub fn handle<R: Request>(&self, request: R) -> Handled<'_, R> {
        tracing::debug!(
            method = request.method(),
            path = %request.path(),
            "searching route"
        );

        match self.search_route(&request) {
            Some((route, attributes)) => {
                tracing::debug!(
                    name = ?route.name(),
                    route = %route.path(),
                    "route found"
                );
                let request = attributes
                    .into_iter()
                    .fold(request, |request, (name, value)| {
                        request.with_attribute(&name, value)
                    });
                Handled {
                    request,
                    route: Some(route),
                }
            }
            None => {
                tracing::debug!("no route found");
                Handled {
                    request,
                    route: None,
                }
            }
        }
    }

    /// Whether any route matches the request
    pub fn is_valid<R: Request + ?Sized>(&self, request: &R) -> bool {
        self.search_route(request).is_some()
    }

    /// Whether any route matches a `GET` request to `path`
    pub fn is_valid_path(&self, path: &str) -> bool {
        self.is_valid(&ServerRequest::get(path))
    }

    /// Generates the path of the route named `name`
    ///
    /// When several routes share the name, the one substituting the most
    /// parameters into its path wins.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::Ambiguous`] when the best candidates tie
    /// - the first candidate's error when none succeeds
    /// - [`RoutingError::NotFound`] when no route has this name
    pub fn generate<P: RouteParameters + ?Sized>(&self, name: &str, parameters: &P) -> Result<String> {
        let parameters = parameters.route_parameters();
        let mut generated: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        let mut failure = None;

        for route in self.routes().filter(|route| route.name() == Some(name)) {
            match route.generate_scored(&parameters) {
                Ok(path) => generated.entry(path.consumed).or_default().push(path.path),
                Err(error) => {
                    failure.get_or_insert(error);
                }
            }
        }

        match generated.pop_last() {
            Some((_, mut paths)) => match (paths.pop(), paths.is_empty()) {
                (Some(path), true) => Ok(path),
                _ => Err(RoutingError::Ambiguous {
                    name: name.to_string(),
                }),
            },
            None => Err(failure.unwrap_or_else(|| RoutingError::NotFound {
                name: name.to_string(),
            })),
        }
    }

    /// Generates a path from several parameter sources, later ones winning
    pub fn generate_merged(&self, name: &str, sources: &[&dyn RouteParameters]) -> Result<String> {
        self.generate(name, &params::merge(sources))
    }
}

impl RouteSet for Router {
    fn children(&self) -> &[Route] {
        &self.routes
    }

    fn children_mut(&mut self) -> &mut Vec<Route> {
        &mut self.routes
    }
}
