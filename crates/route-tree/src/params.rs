//! Generation parameters
//!
//! Anything implementing [`RouteParameters`] can feed
//! [`Route::generate`](crate::Route::generate) and
//! [`Router::generate`](crate::Router::generate): JSON objects, maps, slices
//! of pairs, or application types exporting their own attributes.
//!
//! ```
//! use route_tree::{Parameters, Route, RouteParameters};
//!
//! struct Article {
//!     id: u64,
//!     slug: String,
//! }
//!
//! impl RouteParameters for Article {
//!     fn route_parameters(&self) -> Parameters {
//!         let mut parameters = Parameters::new();
//!         parameters.insert("id".into(), self.id.into());
//!         parameters.insert("slug".into(), self.slug.clone().into());
//!         parameters
//!     }
//! }
//!
//! let route = Route::new("/articles/{id}-{slug}").unwrap();
//! let article = Article { id: 3, slug: "hello".into() };
//! assert_eq!(route.generate(&article).unwrap(), "/articles/3-hello");
//! ```

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde_json::{Map, Value};

/// Named parameter values, in insertion order
pub type Parameters = Map<String, Value>;

/// Types exporting a parameter map for path generation
pub trait RouteParameters {
    fn route_parameters(&self) -> Parameters;
}

impl<T: RouteParameters + ?Sized> RouteParameters for &T {
    fn route_parameters(&self) -> Parameters {
        (**self).route_parameters()
    }
}

impl RouteParameters for Parameters {
    fn route_parameters(&self) -> Parameters {
        self.clone()
    }
}

/// Objects export their entries; any other value exports nothing
impl RouteParameters for Value {
    fn route_parameters(&self) -> Parameters {
        match self {
            Value::Object(map) => map.clone(),
            _ => Parameters::new(),
        }
    }
}

impl RouteParameters for () {
    fn route_parameters(&self) -> Parameters {
        Parameters::new()
    }
}

impl<K, V, S> RouteParameters for HashMap<K, V, S>
where
    K: AsRef<str>,
    V: Clone + Into<Value>,
    S: BuildHasher,
{
    fn route_parameters(&self) -> Parameters {
        collect(self.iter())
    }
}

impl<K, V> RouteParameters for BTreeMap<K, V>
where
    K: AsRef<str>,
    V: Clone + Into<Value>,
{
    fn route_parameters(&self) -> Parameters {
        collect(self.iter())
    }
}

impl<K, V> RouteParameters for [(K, V)]
where
    K: AsRef<str>,
    V: Clone + Into<Value>,
{
    fn route_parameters(&self) -> Parameters {
        collect(self.iter().map(|(k, v)| (k, v)))
    }
}

impl<K, V, const N: usize> RouteParameters for [(K, V); N]
where
    K: AsRef<str>,
    V: Clone + Into<Value>,
{
    fn route_parameters(&self) -> Parameters {
        self.as_slice().route_parameters()
    }
}

impl<K, V> RouteParameters for Vec<(K, V)>
where
    K: AsRef<str>,
    V: Clone + Into<Value>,
{
    fn route_parameters(&self) -> Parameters {
        self.as_slice().route_parameters()
    }
}

fn collect<'a, K, V, I>(entries: I) -> Parameters
where
    K: AsRef<str> + 'a,
    V: Clone + Into<Value> + 'a,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    entries
        .map(|(k, v)| (k.as_ref().to_string(), v.clone().into()))
        .collect()
}

/// Merges several sources, later sources overriding earlier ones
pub fn merge(sources: &[&dyn RouteParameters]) -> Parameters {
    sources
        .iter()
        .fold(Parameters::new(), |mut merged, source| {
            merged.extend(source.route_parameters());
            merged
        })
}

/// String form of a scalar parameter
///
/// `true` becomes `1` and `false` the empty string; `null`, arrays and
/// objects have none.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        Value::Bool(value) => Some(if *value { "1" } else { "" }.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Serializes parameters as a URL-encoded query string
///
/// Nested arrays and objects use `key[index]` / `key[name]` pairs. `null`
/// entries are dropped at every depth, array indexes are kept as they are,
/// and empty containers produce nothing.
///
/// ```
/// use route_tree::build_query;
/// use serde_json::json;
///
/// let tags = json!(["a", null, "c"]);
/// let page = json!(2);
/// assert_eq!(
///     build_query([("tags", &tags), ("page", &page)]),
///     "tags%5B0%5D=a&tags%5B2%5D=c&page=2"
/// );
/// ```
pub fn build_query<'a, I>(parameters: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a Value)>,
{
    let mut pairs = Vec::new();
    for (name, value) in parameters {
        push_pairs(&mut pairs, name.to_string(), value);
    }
    pairs.join("&")
}

fn push_pairs(pairs: &mut Vec<String>, key: String, value: &Value) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                push_pairs(pairs, format!("{}[{}]", key, index), item);
            }
        }
        Value::Object(entries) => {
            for (name, item) in entries {
                push_pairs(pairs, format!("{}[{}]", key, name), item);
            }
        }
        scalar => {
            let value = scalar_to_string(scalar).unwrap_or_default();
            pairs.push(format!(
                "{}={}",
                urlencoding::encode(&key),
                urlencoding::encode(&value)
            ));
        }
    }
}
