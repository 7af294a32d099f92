//! Named type aliases usable in templates as `{name::alias}`
//!
//! Each alias expands to a regex fragment used as the attribute requirement.
//!
//! # Examples
//!
//! ```
//! use route_tree::types;
//!
//! assert_eq!(types::pattern("int"), Some(r"\d+"));
//! assert_eq!(types::pattern("uuid"), types::pattern("uuid4"));
//! assert_eq!(types::pattern("unknown"), None);
//! ```

use crate::error::{Result, RoutingError};

pub const INT: &str = r"\d+";
pub const FLOAT: &str = r"\d+(\.\d+)";
pub const UUID4: &str =
    r"[0-9A-Fa-f]{8}\-[0-9A-Fa-f]{4}\-[0-9A-Fa-f]{4}\-[0-9A-Fa-f]{4}\-[0-9A-Fa-f]{12}";
pub const SLUG: &str = r"[a-z0-9]+(?:-[a-z0-9]+)*";
pub const MD5: &str = r"[0-9a-fA-F]{32}";
pub const SHA1: &str = r"[0-9a-fA-F]{40}";
pub const DOMAIN: &str = r"([a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{2,6}";

const TYPES: &[(&str, &str)] = &[
    ("int", INT),
    ("float", FLOAT),
    ("uuid", UUID4),
    ("uuid4", UUID4),
    ("slug", SLUG),
    ("md5", MD5),
    ("sha1", SHA1),
    ("domain", DOMAIN),
];

/// Deprecated alias → replacement
const DEPRECATED: &[(&str, &str)] = &[("uuid", "uuid4")];

/// Returns the regex fragment of an alias, without any deprecation signal
pub fn pattern(alias: &str) -> Option<&'static str> {
    TYPES
        .iter()
        .find(|(name, _)| *name == alias)
        .map(|(_, pattern)| *pattern)
}

/// Returns the replacement of a deprecated alias
pub fn replacement(alias: &str) -> Option<&'static str> {
    DEPRECATED
        .iter()
        .find(|(name, _)| *name == alias)
        .map(|(_, replacement)| *replacement)
}

/// Resolves an alias while building a route
///
/// Deprecated aliases still resolve but emit a `tracing` warning.
pub(crate) fn resolve(alias: &str) -> Result<&'static str> {
    if let Some(replacement) = replacement(alias) {
        tracing::warn!(
            alias,
            replacement,
            "route type \"{}\" is deprecated, use \"{}\" instead",
            alias,
            replacement
        );
    }

    pattern(alias).ok_or_else(|| RoutingError::UnknownType {
        name: alias.to_string(),
    })
}
