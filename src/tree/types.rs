use std::fmt;
use std::sync::Arc;

use http::Method;
use serde_json::Value;

use super::param::ParamRule;
use crate::dispatcher::{Handler, HandlerOutcome, HandlerRequest};
use crate::middleware::Middleware;

/// Leaf descriptor of the route tree: one method + path template + handler
/// chain, identified by a process-wide unique RAI.
///
/// Endpoints are plain data; all validation (non-empty RAI, roles and
/// handlers, supported method, absolute path) happens when the tree is
/// compiled, so a malformed declaration can never reach a servable state.
///
/// # Example
///
/// ```rust
/// use rairouter::dispatcher::{HandlerOutcome, HandlerResponse};
/// use rairouter::tree::Endpoint;
/// use http::Method;
/// use serde_json::json;
///
/// let list_posts = Endpoint::new(Method::GET, "/", "posts:list")
///     .role("editor")
///     .handler(|_req| HandlerOutcome::Respond(HandlerResponse::json(200, json!([]))));
/// ```
#[derive(Clone)]
pub struct Endpoint {
    /// HTTP method (GET, POST, PUT, DELETE).
    pub method: Method,
    /// Path template relative to the enclosing group, using `:name` for
    /// named parameters and `*` for a trailing wildcard segment.
    pub path: String,
    /// Route Access Identifier, e.g. `"posts:list"`. Unique per process.
    pub rai: String,
    /// Roles admitted to this endpoint. Opaque strings; authorization is
    /// pure set intersection.
    pub roles: Vec<String>,
    /// Ordered handler chain. Every handler before the responder may act as
    /// a per-route guard by short-circuiting with a response.
    pub handlers: Vec<Handler>,
    /// Optional display name.
    pub name: Option<String>,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Optional free-form metadata, surfaced through introspection.
    pub meta: Option<Value>,
}

impl Endpoint {
    /// Create an endpoint declaration with no roles or handlers yet.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>, rai: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            rai: rai.into(),
            roles: Vec::new(),
            handlers: Vec::new(),
            name: None,
            description: None,
            meta: None,
        }
    }

    /// Admit a role.
    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Admit several roles at once.
    #[must_use]
    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    /// Append a handler to the chain.
    #[must_use]
    pub fn handler<F>(mut self, f: F) -> Self
    where
        F: Fn(&HandlerRequest) -> HandlerOutcome + Send + Sync + 'static,
    {
        self.handlers.push(Arc::new(f));
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach free-form metadata.
    #[must_use]
    pub fn meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("rai", &self.rai)
            .field("roles", &self.roles)
            .field("handlers", &self.handlers.len())
            .field("name", &self.name)
            .finish()
    }
}

/// Tree node bundling a path prefix, inherited middleware and param rules
/// over child endpoints and groups.
///
/// Ownership is exclusive top-down: a group owns its children and nothing
/// points back up. `merge_params` governs param-rule inheritance for this
/// group's subtree: `true` unions ancestor rules with this group's own
/// (last write wins by name), `false` makes this group's own rules fully
/// replace the inherited set.
#[derive(Clone)]
pub struct Group {
    /// Path prefix prepended to every descendant path.
    pub prefix: String,
    /// Child endpoints and groups, in declaration order.
    pub children: Vec<RouteNode>,
    /// Param rules declared on this group.
    pub param_rules: Vec<ParamRule>,
    /// Middleware inherited by every descendant endpoint.
    pub middleware: Vec<Arc<dyn Middleware>>,
    /// Whether this group's param rules merge with inherited ones.
    pub merge_params: bool,
    /// Optional free-form metadata.
    pub meta: Option<Value>,
}

impl Group {
    /// Create a group with the given prefix. Param rules merge by default.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            children: Vec::new(),
            param_rules: Vec::new(),
            middleware: Vec::new(),
            merge_params: true,
            meta: None,
        }
    }

    /// Set the param-rule inheritance flag for this group's subtree.
    #[must_use]
    pub fn merge_params(mut self, merge: bool) -> Self {
        self.merge_params = merge;
        self
    }

    /// Declare a param rule on this group.
    #[must_use]
    pub fn param(mut self, rule: ParamRule) -> Self {
        self.param_rules.push(rule);
        self
    }

    /// Attach middleware inherited by every descendant endpoint.
    #[must_use]
    pub fn middleware(mut self, mw: Arc<dyn Middleware>) -> Self {
        self.middleware.push(mw);
        self
    }

    /// Append a child endpoint.
    #[must_use]
    pub fn route(mut self, endpoint: Endpoint) -> Self {
        self.children.push(RouteNode::Endpoint(endpoint));
        self
    }

    /// Append a nested child group.
    #[must_use]
    pub fn group(mut self, group: Group) -> Self {
        self.children.push(RouteNode::Group(group));
        self
    }

    /// Attach free-form metadata.
    #[must_use]
    pub fn meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("prefix", &self.prefix)
            .field("children", &self.children)
            .field("param_rules", &self.param_rules)
            .field("middleware", &self.middleware.len())
            .field("merge_params", &self.merge_params)
            .finish()
    }
}

/// Explicitly discriminated tree node: an endpoint leaf or a nested group.
#[derive(Clone, Debug)]
pub enum RouteNode {
    Endpoint(Endpoint),
    Group(Group),
}
