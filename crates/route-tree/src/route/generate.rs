use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::Route;
use crate::error::{Result, RoutingError};
use crate::params::{self, Parameters};
use crate::template::{self, Token};

/// A generated path and the number of parameters substituted into it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedPath {
    pub path: String,
    /// Supplied parameters consumed by placeholders; defaults do not count
    pub consumed: usize,
}

pub(crate) fn generate(route: &Route, parameters: &Parameters) -> Result<GeneratedPath> {
    let full_path = route.path();
    let tokens = template::parse(&full_path)?;

    let mut render = Render {
        route,
        parameters,
        used: HashSet::new(),
        values: HashMap::new(),
    };
    let (mut path, missing) = render.tokens(&tokens);

    if !missing.is_empty() {
        let mut names: Vec<String> = Vec::with_capacity(missing.len());
        for name in missing {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        return Err(RoutingError::MissingAttributes {
            names,
            route: route.name().map(str::to_string),
        });
    }

    let query = params::build_query(
        parameters
            .iter()
            .filter(|(name, _)| !render.used.contains(name.as_str()))
            .map(|(name, value)| (name.as_str(), value)),
    );
    if !query.is_empty() {
        path.push('?');
        path.push_str(&query);
    }

    Ok(GeneratedPath {
        path,
        consumed: render.used.len(),
    })
}

struct Render<'a> {
    route: &'a Route,
    parameters: &'a Parameters,
    /// Parameters substituted into the path
    used: HashSet<&'a str>,
    /// Resolved placeholder values, reused on repeated names
    values: HashMap<&'a str, String>,
}

impl<'a> Render<'a> {
    /// Renders tokens, returning the text and the unresolved placeholders
    ///
    /// An optional group with an unresolved placeholder of its own renders
    /// as nothing and does not report it. Values supplied inside a dropped
    /// group still count as consumed.
    fn tokens(&mut self, tokens: &'a [Token]) -> (String, Vec<String>) {
        let mut text = String::new();
        let mut missing = Vec::new();

        for token in tokens {
            match token {
                Token::Literal(literal) => text.push_str(literal),
                Token::Placeholder(placeholder) => match self.value(&placeholder.name) {
                    Some(value) => text.push_str(&value),
                    None => missing.push(placeholder.name.clone()),
                },
                Token::Optional(inner) => {
                    let (inner_text, inner_missing) = self.tokens(inner);
                    if inner_missing.is_empty() {
                        text.push_str(&inner_text);
                    }
                }
            }
        }

        (text, missing)
    }

    fn value(&mut self, name: &'a str) -> Option<String> {
        if let Some(value) = self.values.get(name) {
            return Some(value.clone());
        }

        let supplied = self
            .parameters
            .get(name)
            .and_then(params::scalar_to_string);

        let value = match supplied {
            Some(value) => {
                self.used.insert(name);
                value
            }
            None => params::scalar_to_string(self.route.default_of(name)?)?,
        };

        self.values.insert(name, value.clone());
        Some(value)
    }
}
