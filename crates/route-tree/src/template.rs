//! Path template tokenizer
//!
//! Turns a template such as `/users/{id::int}[/{tab}]` into a token tree.
//! The tree is shared by route construction (attribute discovery), pattern
//! compilation and path generation, so the three always agree on what a
//! placeholder or an optional segment is.
//!
//! # Grammar
//!
//! - `{name}`, `{name:regex}`, `{name::type}` with `name` in `[A-Za-z0-9_]+`
//! - `[...]` optional segment, nesting allowed
//! - a `{` that does not open a valid placeholder is plain text

use crate::error::{Result, RoutingError};

/// One element of a parsed template
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    /// Plain text
    Literal(String),
    /// `{name}` with its optional inline constraint
    Placeholder(Placeholder),
    /// `[...]` segment and its content
    Optional(Vec<Token>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Placeholder {
    pub name: String,
    pub constraint: Option<Constraint>,
}

/// Inline constraint attached to a placeholder
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Constraint {
    /// `{name:regex}`
    Regex(String),
    /// `{name::alias}`
    Type(String),
}

/// Parses a template into its token tree
pub(crate) fn parse(template: &str) -> Result<Vec<Token>> {
    let mut parser = Parser::default();
    let mut rest = template;

    while let Some(c) = rest.chars().next() {
        match c {
            '{' => {
                if let Some((placeholder, len)) = scan_placeholder(rest) {
                    parser.push(Token::Placeholder(placeholder));
                    rest = &rest[len..];
                    continue;
                }
                parser.literal.push(c);
            }
            '[' => parser.open(),
            ']' => {
                if !parser.close() {
                    return Err(unbalanced(template));
                }
            }
            _ => parser.literal.push(c),
        }
        rest = &rest[c.len_utf8()..];
    }

    parser.finish().ok_or_else(|| unbalanced(template))
}

/// Renders tokens back to a template, dropping inline constraints
///
/// `/users/{id::int}[/{tab}]` becomes `/users/{id}[/{tab}]`.
pub(crate) fn normalize(tokens: &[Token]) -> String {
    let mut out = String::new();
    write_normalized(tokens, &mut out);
    out
}

fn write_normalized(tokens: &[Token], out: &mut String) {
    for token in tokens {
        match token {
            Token::Literal(text) => out.push_str(text),
            Token::Placeholder(placeholder) => {
                out.push('{');
                out.push_str(&placeholder.name);
                out.push('}');
            }
            Token::Optional(inner) => {
                out.push('[');
                write_normalized(inner, out);
                out.push(']');
            }
        }
    }
}

/// Every placeholder of the tree, in template order
pub(crate) fn placeholders(tokens: &[Token]) -> Vec<&Placeholder> {
    let mut found = Vec::new();
    collect_placeholders(tokens, &mut found);
    found
}

fn collect_placeholders<'a>(tokens: &'a [Token], found: &mut Vec<&'a Placeholder>) {
    for token in tokens {
        match token {
            Token::Placeholder(placeholder) => found.push(placeholder),
            Token::Optional(inner) => collect_placeholders(inner, found),
            Token::Literal(_) => {}
        }
    }
}

fn unbalanced(template: &str) -> RoutingError {
    RoutingError::UnbalancedSegment {
        path: template.to_string(),
    }
}

/// Stack of open groups; the bottom entry is the template itself
struct Parser {
    groups: Vec<Vec<Token>>,
    literal: String,
}

impl Default for Parser {
    fn default() -> Self {
        Self {
            groups: vec![Vec::new()],
            literal: String::new(),
        }
    }
}

impl Parser {
    fn flush(&mut self) {
        if self.literal.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.literal);
        if let Some(group) = self.groups.last_mut() {
            group.push(Token::Literal(text));
        }
    }

    fn push(&mut self, token: Token) {
        self.flush();
        if let Some(group) = self.groups.last_mut() {
            group.push(token);
        }
    }

    fn open(&mut self) {
        self.flush();
        self.groups.push(Vec::new());
    }

    /// Closes the innermost group; false when no group is open
    fn close(&mut self) -> bool {
        if self.groups.len() < 2 {
            return false;
        }
        self.flush();
        match self.groups.pop() {
            Some(inner) => {
                self.push(Token::Optional(inner));
                true
            }
            None => false,
        }
    }

    fn finish(mut self) -> Option<Vec<Token>> {
        self.flush();
        if self.groups.len() != 1 {
            return None;
        }
        self.groups.pop()
    }
}

/// Scans a placeholder at the start of `input` (which starts with `{`)
///
/// Returns the placeholder and the number of bytes it spans, or `None` when
/// the brace does not open a valid placeholder.
fn scan_placeholder(input: &str) -> Option<(Placeholder, usize)> {
    let body = &input[1..];
    let name_len = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(body.len());
    if name_len == 0 {
        return None;
    }
    let name = body[..name_len].to_string();
    let after = &body[name_len..];

    if after.starts_with('}') {
        return Some((
            Placeholder {
                name,
                constraint: None,
            },
            1 + name_len + 1,
        ));
    }

    if let Some(alias) = after.strip_prefix("::") {
        let alias_len = alias
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(alias.len());
        if alias_len == 0 || !alias[alias_len..].starts_with('}') {
            return None;
        }
        return Some((
            Placeholder {
                name,
                constraint: Some(Constraint::Type(alias[..alias_len].to_string())),
            },
            1 + name_len + 2 + alias_len + 1,
        ));
    }

    let fragment = after.strip_prefix(':')?;
    let fragment_len = scan_fragment(fragment)?;
    if fragment_len == 0 {
        return None;
    }
    Some((
        Placeholder {
            name,
            constraint: Some(Constraint::Regex(fragment[..fragment_len].to_string())),
        },
        1 + name_len + 1 + fragment_len + 1,
    ))
}

/// Length of a regex fragment up to its closing `}`
///
/// Balanced braces (`\d{3}`) and escaped characters stay inside the fragment.
fn scan_fragment(fragment: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut escaped = false;

    for (index, c) in fragment.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' if depth == 0 => return Some(index),
            '}' => depth -= 1,
            _ => {}
        }
    }

    None
}
