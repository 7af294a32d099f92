//! Requests as seen by the router
//!
//! The router only needs a method, an optional host and a path, plus
//! a way to hand extracted attributes back. [`ServerRequest`] is a plain
//! owned implementation; with the `http` feature, `http::Request<B>` works
//! directly and receives its attributes as a [`RouteAttributes`] extension.

use std::borrow::Cow;
use std::collections::HashMap;

use url::Url;

/// Attributes extracted from a matched path, by name
pub type Attributes = HashMap<String, String>;

/// A request that can be routed
pub trait Request {
    /// HTTP method, any case
    fn method(&self) -> &str;

    /// Host the request was sent to, if known
    fn host(&self) -> Option<&str>;

    /// Path as received, without query string
    ///
    /// Percent-escapes are kept: a `%2F` inside a segment is not a separator.
    fn path(&self) -> Cow<'_, str>;

    /// Attaches a route attribute, returning the updated request
    fn with_attribute(self, name: &str, value: String) -> Self
    where
        Self: Sized;
}

/// Owned request built from a method and a target URL or path
///
/// # Examples
///
/// ```
/// use route_tree::{Request, ServerRequest};
///
/// let request = ServerRequest::new("post", "https://Example.com/caf%C3%A9?page=2#top");
/// assert_eq!(request.method(), "POST");
/// assert_eq!(request.host(), Some("example.com"));
/// assert_eq!(request.path(), "/caf%C3%A9");
/// assert_eq!(request.query(), Some("page=2"));
///
/// let request = ServerRequest::get("/search?q=rust");
/// assert_eq!(request.path(), "/search");
/// assert_eq!(request.host(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerRequest {
    method: String,
    host: Option<String>,
    path: String,
    query: Option<String>,
    attributes: Attributes,
}

impl ServerRequest {
    /// Creates a request from an absolute URL or an origin-form target
    pub fn new(method: impl Into<String>, target: &str) -> Self {
        let method = method.into().to_uppercase();

        match Url::parse(target).ok().filter(Url::has_host) {
            Some(url) => Self {
                method,
                host: url.host_str().map(str::to_lowercase),
                path: url.path().to_string(),
                query: url.query().map(str::to_string),
                attributes: Attributes::new(),
            },
            None => {
                let target = target.split('#').next().unwrap_or_default();
                let (path, query) = match target.split_once('?') {
                    Some((path, query)) => (path, Some(query.to_string())),
                    None => (target, None),
                };
                Self {
                    method,
                    host: None,
                    path: path.to_string(),
                    query,
                    attributes: Attributes::new(),
                }
            }
        }
    }

    pub fn get(target: &str) -> Self {
        Self::new("GET", target)
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into().to_lowercase());
        self
    }

    /// Raw query string, without `?`
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

impl Request for ServerRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.path)
    }

    fn with_attribute(mut self, name: &str, value: String) -> Self {
        self.attributes.insert(name.to_string(), value);
        self
    }
}

#[cfg(feature = "http")]
pub use self::http_request::RouteAttributes;

#[cfg(feature = "http")]
mod http_request {
    use std::borrow::Cow;

    use super::{Attributes, Request};

    /// Route attributes stored in the extensions of an `http::Request`
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct RouteAttributes(pub Attributes);

    impl<B> Request for http::Request<B> {
        fn method(&self) -> &str {
            http::Request::method(self).as_str()
        }

        fn host(&self) -> Option<&str> {
            self.uri().host().or_else(|| {
                self.headers()
                    .get(http::header::HOST)
                    .and_then(|value| value.to_str().ok())
                    .map(strip_port)
            })
        }

        fn path(&self) -> Cow<'_, str> {
            Cow::Borrowed(self.uri().path())
        }

        fn with_attribute(mut self, name: &str, value: String) -> Self {
            let extensions = self.extensions_mut();
            match extensions.get_mut::<RouteAttributes>() {
                Some(attributes) => {
                    attributes.0.insert(name.to_string(), value);
                }
                None => {
                    let mut attributes = Attributes::new();
                    attributes.insert(name.to_string(), value);
                    extensions.insert(RouteAttributes(attributes));
                }
            }
            self
        }
    }

    /// `example.com:8080` → `example.com`, `[::1]:80` → `[::1]`
    fn strip_port(authority: &str) -> &str {
        if authority.starts_with('[') {
            return match authority.find(']') {
                Some(end) => &authority[..=end],
                None => authority,
            };
        }
        authority.split(':').next().unwrap_or(authority)
    }

}
