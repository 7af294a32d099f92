//! Error taxonomy for route definition, generation and route tables
//!
//! Every failure is recoverable by the caller. "No route matches this
//! request" is not an error: matching APIs return `Option`/`bool` instead.

use thiserror::Error;

/// Convenience alias used across the crate
pub type Result<T, E = RoutingError> = std::result::Result<T, E>;

/// Errors raised while defining routes or generating paths
#[derive(Debug, Error)]
pub enum RoutingError {
    /// `{name::alias}` referenced a type alias that is not registered
    #[error("Unknown type \"{name}\"")]
    UnknownType { name: String },

    /// The same placeholder name appears twice in a single template
    #[error("Duplicate attribute \"{name}\" in path \"{path}\"")]
    DuplicateAttribute { name: String, path: String },

    /// A `[` without its `]` (or the reverse)
    #[error("Unbalanced optional segment in path \"{path}\"")]
    UnbalancedSegment { path: String },

    /// A requirement (inline or explicit) is not a valid regular expression
    #[error("Invalid requirement for attribute \"{name}\": {source}")]
    InvalidRequirement { name: String, source: regex::Error },

    /// The full path of a route could not be compiled into a matching pattern
    #[error("Invalid pattern for path \"{path}\": {source}")]
    InvalidPattern { path: String, source: regex::Error },

    /// Generation left placeholders without value nor default
    #[error("{}", missing_message(.names, .route.as_deref()))]
    MissingAttributes {
        names: Vec<String>,
        route: Option<String>,
    },

    /// No route with this name can produce a path
    #[error("Route \"{name}\" does not exist")]
    NotFound { name: String },

    /// Several same-named routes are equally specific for the given parameters
    #[error("Multiple possible routes named \"{name}\" with given parameters")]
    Ambiguous { name: String },

    /// A route table could not be read or built
    #[error(transparent)]
    Definition(#[from] DefinitionError),
}

/// Errors raised while loading declarative route tables
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A single entry of the table is invalid
    #[error("Invalid route \"{path}\": {source}")]
    Route {
        path: String,
        source: Box<RoutingError>,
    },
}

fn missing_message(names: &[String], route: Option<&str>) -> String {
    let plural = if names.len() > 1 { "s" } else { "" };
    let names = names
        .iter()
        .map(|name| format!("\"{}\"", name))
        .collect::<Vec<_>>()
        .join(", ");

    match route {
        Some(route) => format!(
            "Missing attribute{} {} to generate route \"{}\"",
            plural, names, route
        ),
        None => format!("Missing attribute{} {} to generate route", plural, names),
    }
}
