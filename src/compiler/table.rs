use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use http::Method;
use serde_json::Value;

use crate::dispatcher::Handler;
use crate::middleware::Middleware;
use crate::tree::ParamRule;

/// An endpoint after compilation: absolute path, accumulated middleware and
/// the effective, de-duplicated param-rule set from root to leaf.
pub struct ResolvedEndpoint {
    /// Route Access Identifier, interned once and shared across the
    /// matcher, the cache and the execution layer.
    pub rai: Arc<str>,
    /// HTTP method.
    pub method: Method,
    /// Absolute path: the concatenation of every ancestor prefix
    /// (root to leaf) followed by the endpoint's own path template.
    pub path: String,
    /// Roles admitted to this endpoint.
    pub roles: Vec<String>,
    /// Ordered handler chain.
    pub handlers: Vec<Handler>,
    /// Middleware accumulated from every ancestor group, in declaration
    /// order.
    pub middleware: Vec<Arc<dyn Middleware>>,
    /// Effective param rules, de-duplicated by name with last-write-wins.
    pub params: Vec<ParamRule>,
    /// Optional display name.
    pub name: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Optional free-form metadata.
    pub meta: Option<Value>,
}

impl ResolvedEndpoint {
    /// Find the effective rule for a parameter name.
    #[must_use]
    pub fn param_rule(&self, name: &str) -> Option<&ParamRule> {
        self.params.iter().find(|r| r.name() == name)
    }
}

impl fmt::Debug for ResolvedEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedEndpoint")
            .field("rai", &self.rai)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("roles", &self.roles)
            .field("handlers", &self.handlers.len())
            .field("middleware", &self.middleware.len())
            .field("params", &self.params)
            .finish()
    }
}

/// The flattened route table: an ordered mapping RAI → [`ResolvedEndpoint`].
///
/// Order is the pre-order declaration order of the source tree. Built once
/// by [`super::compile`], immutable afterwards; any change to the route
/// declarations requires a full recompile.
pub struct RouteTable {
    entries: Vec<Arc<ResolvedEndpoint>>,
    index: HashMap<Arc<str>, usize>,
}

impl RouteTable {
    /// Build the table from compiler output. The compiler has already
    /// rejected duplicate RAIs, so insertion order is authoritative.
    pub(crate) fn new(entries: Vec<Arc<ResolvedEndpoint>>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, ep)| (Arc::clone(&ep.rai), i))
            .collect();
        Self { entries, index }
    }

    /// Look up a single endpoint by RAI.
    #[must_use]
    pub fn get(&self, rai: &str) -> Option<&Arc<ResolvedEndpoint>> {
        self.index.get(rai).map(|&i| &self.entries[i])
    }

    /// Iterate endpoints in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ResolvedEndpoint>> {
        self.entries.iter()
    }

    /// Iterate RAIs in declaration order.
    pub fn rais(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|ep| ep.rai.as_ref())
    }

    /// Number of compiled endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("entries", &self.entries)
            .finish()
    }
}
