use regex::{Regex, RegexBuilder};

use super::Route;
use crate::error::{Result, RoutingError};
use crate::request::Attributes;
use crate::template::{self, Token};

/// Pattern used for placeholders without requirement
const DEFAULT_VALUE: &str = "[^/]+";

/// Prefix of the capture groups generated for placeholders
const GROUP_PREFIX: &str = "__rt";

/// Compiled matching pattern of a route
///
/// Placeholders are captured under generated group names (`__rt0`, `__rt1`,
/// ...) so that any attribute name, digits first included, and any name
/// repeated along the ancestry stays a valid regex.
#[derive(Debug, Clone)]
pub(crate) struct Pattern {
    regex: Regex,
    /// Attribute name of each generated group, by index
    attributes: Vec<String>,
}

impl Pattern {
    pub(crate) fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Matches a full path, returning every named capture that participated
    pub(crate) fn captures(&self, path: &str) -> Option<Attributes> {
        let captures = self.regex.captures(path)?;
        let mut attributes = Attributes::new();

        for group in self.regex.capture_names().flatten() {
            let Some(value) = captures.name(group) else {
                continue;
            };
            let name = group
                .strip_prefix(GROUP_PREFIX)
                .and_then(|index| index.parse::<usize>().ok())
                .and_then(|index| self.attributes.get(index))
                .map_or(group, String::as_str);

            attributes
                .entry(name.to_string())
                .or_insert_with(|| value.as_str().to_string());
        }

        Some(attributes)
    }
}

/// Compiles the full path of a route
pub(crate) fn compile(route: &Route) -> Result<Pattern> {
    let path = route.path();
    let tokens = template::parse(&path)?;

    let mut source = String::from("^");
    let mut attributes = Vec::new();
    write_tokens(route, &tokens, &mut source, &mut attributes);
    source.push('$');

    let regex = RegexBuilder::new(&source)
        .case_insensitive(true)
        .build()
        .map_err(|source| RoutingError::InvalidPattern {
            path: path.clone(),
            source,
        })?;

    tracing::trace!(path = %path, pattern = %regex, "compiled route pattern");

    Ok(Pattern { regex, attributes })
}

fn write_tokens(route: &Route, tokens: &[Token], source: &mut String, attributes: &mut Vec<String>) {
    for token in tokens {
        match token {
            Token::Literal(text) => source.push_str(&regex::escape(text)),
            Token::Placeholder(placeholder) => {
                let value = route.regex_of(&placeholder.name).unwrap_or(DEFAULT_VALUE);
                source.push_str(&format!(
                    "(?P<{}{}>{})",
                    GROUP_PREFIX,
                    attributes.len(),
                    value
                ));
                attributes.push(placeholder.name.clone());
            }
            Token::Optional(inner) => {
                source.push_str("(?:");
                write_tokens(route, inner, source, attributes);
                source.push_str(")?");
            }
        }
    }
}

/// Checks that a requirement compiles on its own
pub(crate) fn validate_requirement(name: &str, regex: &str) -> Result<()> {
    Regex::new(regex)
        .map(drop)
        .map_err(|source| RoutingError::InvalidRequirement {
            name: name.to_string(),
            source,
        })
}
