//! Tree traversal shared by route groups and the router
//!
//! Both a [`Route`] (through its children) and a [`Router`](crate::Router)
//! hold an ordered list of routes. [`RouteSet`] gives them the same
//! behavior: children stay sorted by descending priority, groups are
//! flattened into their leaves, and searches go through leaves in that
//! order.

use std::cmp::Reverse;
use std::slice;

use crate::request::{Attributes, Request};
use crate::route::Route;

/// Ordered collection of routes
///
/// # Examples
///
/// ```
/// use route_tree::{Route, RouteSet, Router, ServerRequest};
///
/// let mut router = Router::new();
/// router
///     .add_route(Route::builder("/{page}").name("page").build().unwrap())
///     .add_route(Route::builder("/about").name("about").priority(10).build().unwrap());
///
/// assert_eq!(router.count(), 2);
/// let (route, _) = router.search_route(&ServerRequest::get("/about")).unwrap();
/// assert_eq!(route.name(), Some("about"));
/// ```
pub trait RouteSet {
    /// Direct children, sorted by descending priority
    fn children(&self) -> &[Route];

    #[doc(hidden)]
    fn children_mut(&mut self) -> &mut Vec<Route>;

    /// Called after children changed, to bind them to their new parent
    #[doc(hidden)]
    fn adopt(&mut self) {}

    /// Number of leaf routes
    fn count(&self) -> usize {
        self.routes().count()
    }

    /// First leaf named `name`, depth-first
    fn route(&self, name: &str) -> Option<&Route> {
        self.routes().find(|route| route.name() == Some(name))
    }

    /// Lazy depth-first iterator over leaf routes; groups are not yielded
    fn routes(&self) -> Routes<'_> {
        Routes::new(self.children())
    }

    /// First leaf matching the request, with its extracted attributes
    fn search_route<R>(&self, request: &R) -> Option<(&Route, Attributes)>
    where
        R: Request + ?Sized,
    {
        self.routes()
            .find_map(|route| route.test(request).map(|attributes| (route, attributes)))
    }

    /// Appends a route, keeping children sorted by descending priority
    ///
    /// Equal priorities keep their registration order.
    fn add_route(&mut self, route: Route) -> &mut Self
    where
        Self: Sized,
    {
        self.add_routes(Some(route))
    }

    fn add_routes<I>(&mut self, routes: I) -> &mut Self
    where
        I: IntoIterator<Item = Route>,
        Self: Sized,
    {
        let children = self.children_mut();
        children.extend(routes);
        children.sort_by_key(|route| Reverse(route.priority()));
        self.adopt();
        self
    }
}

/// Depth-first iterator over the leaves of a route tree
#[derive(Debug, Clone)]
pub struct Routes<'a> {
    stack: Vec<slice::Iter<'a, Route>>,
}

impl<'a> Routes<'a> {
    fn new(routes: &'a [Route]) -> Self {
        Self {
            stack: vec![routes.iter()],
        }
    }
}

impl<'a> Iterator for Routes<'a> {
    type Item = &'a Route;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(level) = self.stack.last_mut() {
            match level.next() {
                Some(route) if route.is_group() => self.stack.push(route.children().iter()),
                Some(route) => return Some(route),
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}
