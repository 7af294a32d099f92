use std::collections::BTreeMap;
use std::iter;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::attribute::Attribute;

/// Snapshot of the inheritable state of an ancestor route
///
/// A route holds the scope of its parent, which holds the scope of the
/// grandparent, and so on up to the root. Scopes are immutable: whenever an
/// ancestor changes, the chain below it is rebuilt by `Route::relink`.
#[derive(Debug)]
pub(crate) struct Scope {
    /// Full path of the ancestor
    pub(crate) path: String,
    pub(crate) attributes: BTreeMap<String, Attribute>,
    pub(crate) methods: Option<Vec<String>>,
    pub(crate) options: Map<String, Value>,
    pub(crate) parent: Option<Arc<Scope>>,
}

impl Scope {
    /// This scope followed by every ancestor scope, nearest first
    fn chain(&self) -> impl Iterator<Item = &Scope> {
        iter::successors(Some(self), |scope| scope.parent.as_deref())
    }

    /// Nearest ancestor attribute declared under `name`
    pub(crate) fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.chain().find_map(|scope| scope.attributes.get(name))
    }

    pub(crate) fn inherited_default(&self, name: &str) -> Option<&Value> {
        self.chain()
            .filter_map(|scope| scope.attributes.get(name))
            .find_map(Attribute::local_default)
    }

    pub(crate) fn inherited_regex(&self, name: &str) -> Option<&str> {
        self.chain()
            .filter_map(|scope| scope.attributes.get(name))
            .find_map(Attribute::local_regex)
    }

    pub(crate) fn methods(&self) -> Option<&[String]> {
        self.chain().find_map(|scope| scope.methods.as_deref())
    }

    pub(crate) fn option(&self, name: &str) -> Option<&Value> {
        self.chain().find_map(|scope| scope.options.get(name))
    }
}
