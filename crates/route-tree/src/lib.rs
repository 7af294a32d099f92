//! # Route Tree
//!
//! A hierarchical URL router: match requests to routes and generate paths
//! back from route names.
//!
//! - Placeholders: `{id}`, `{id:\d+}`, `{id::int}`
//! - Optional segments, nestable: `/posts[/{page}]`
//! - Route groups sharing a path prefix, attribute constraints, defaults,
//!   methods and options with their children
//! - Method and host restrictions
//! - Priority ordering among siblings, registration order on ties
//! - Named path generation with query strings for extra parameters, picking
//!   the most specific route when several share a name
//! - Route tables from TOML or JSON, and serde round-trips
//!
//! ## Path Templates
//!
//! | Syntax | Matches |
//! |--------|---------|
//! | `{name}` | one segment (`[^/]+`) |
//! | `{name:regex}` | `regex`, braces allowed (`{code:\d{3}}`) |
//! | `{name::type}` | a registered [type](types) (`int`, `slug`, `uuid4`, ...) |
//! | `[...]` | optional content |
//!
//! Matching is case-insensitive and anchored on both ends.
//!
//! ## Example
//!
//! ```
//! use route_tree::{Route, RouteSet, Router, ServerRequest};
//! use serde_json::json;
//!
//! let router = Router::new()
//!     .with_route(
//!         Route::builder("/blog")
//!             .method("GET")
//!             .route(Route::builder("[/{page::int}]").name("blog").default("page", 1).build().unwrap())
//!             .route(Route::builder("/{slug::slug}").name("post").build().unwrap())
//!             .build()
//!             .unwrap(),
//!     );
//!
//! let handled = router.handle(ServerRequest::get("/blog/hello-world"));
//! assert_eq!(handled.route.unwrap().name(), Some("post"));
//! assert_eq!(handled.request.attribute("slug"), Some("hello-world"));
//!
//! assert_eq!(router.generate("blog", &json!({ "page": 3 })).unwrap(), "/blog/3");
//! assert_eq!(router.generate("post", &[("slug", "hi"), ("ref", "rss")]).unwrap(), "/blog/hi?ref=rss");
//! assert_eq!(router.count(), 2);
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod attribute;
mod config;
pub mod error;
mod params;
mod request;
pub mod route;
mod router;
mod set;
mod template;
pub mod types;

// ============================================================================
// Public API
// ============================================================================

pub use attribute::Attribute;
pub use config::{OneOrMany, RouteDefinition, RouterDefinition};
pub use error::{DefinitionError, Result, RoutingError};
pub use params::{build_query, merge, scalar_to_string, Parameters, RouteParameters};
#[cfg(feature = "http")]
pub use request::RouteAttributes;
pub use request::{Attributes, Request, ServerRequest};
pub use route::{GeneratedPath, Route, RouteBuilder, DEFAULT_METHODS, DEFAULT_PRIORITY};
pub use router::{Handled, Router};
pub use set::{RouteSet, Routes};
