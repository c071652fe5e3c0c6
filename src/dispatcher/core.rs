//! Dispatcher core - the runtime façade and its request/response types.

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use super::execution::ExecutionLayer;
use crate::compiler::{compile, ResolvedEndpoint, RouteTable};
use crate::errors::{ConfigError, RequestError};
use crate::ids::DispatchId;
use crate::matcher::{CacheStats, Matcher};
use crate::runtime_config::RuntimeConfig;
use crate::tree::Group;

/// Maximum number of path parameters before heap allocation.
/// Most REST APIs have ≤4 path params (e.g., `/users/:id/posts/:post_id`).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the dispatch hot path.
///
/// Param names use `Arc<str>` instead of `String`: names come from the
/// static route table (known at startup), so cloning is an O(1) atomic
/// increment. Values remain `String` as they are per-request data from the
/// URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Maximum inline response headers before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 8;

/// Stack-allocated header storage for responses.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// What a handler in the chain decided.
pub enum HandlerOutcome {
    /// Fall through to the next handler in the chain.
    Next,
    /// Short-circuit the chain with this response.
    Respond(HandlerResponse),
}

/// One link of an endpoint's ordered handler chain.
pub type Handler = Arc<dyn Fn(&HandlerRequest) -> HandlerOutcome + Send + Sync>;

/// Request data passed to the handler chain after resolution and
/// authorization have both succeeded.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// Unique dispatch id for log correlation.
    pub dispatch_id: DispatchId,
    /// HTTP method.
    pub method: Method,
    /// Originally requested path.
    pub path: String,
    /// RAI of the resolved endpoint.
    pub rai: Arc<str>,
    /// Path parameters extracted from the URL (stack-allocated for ≤8).
    pub path_params: ParamVec,
    /// The caller's effective role set (guest singleton when
    /// unauthenticated).
    pub roles: Vec<String>,
    /// Request body, if the host layer supplied one.
    pub body: Option<Value>,
}

impl HandlerRequest {
    /// Get a path parameter by name.
    ///
    /// Uses "last write wins" semantics: with duplicate parameter names at
    /// different path depths (e.g. `/org/:id/user/:id`), returns the last
    /// occurrence.
    #[inline]
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert path params to a `HashMap`. This allocates - prefer
    /// [`Self::path_param`] in hot paths.
    #[must_use]
    pub fn path_params_map(&self) -> HashMap<String, String> {
        self.path_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// Response produced by a handler chain.
#[derive(Debug, Clone, Serialize)]
pub struct HandlerResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers (stack-allocated for ≤8).
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    /// Response body as JSON.
    pub body: Value,
}

impl HandlerResponse {
    /// Create a response with the given status, headers and body.
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a JSON response with a `content-type` header.
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create an error response with a `{ "error": message }` body.
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    /// Get a header by name (case-insensitive).
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header.
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}

/// One request as seen by the dispatcher, assembled by the host HTTP layer.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    /// HTTP method.
    pub method: Method,
    /// Requested path.
    pub path: String,
    /// Roles of the authenticated principal; `None` means no credential was
    /// presented and the caller is the configured guest.
    pub roles: Option<Vec<String>>,
    /// Request body, passed through to the handler chain untouched.
    pub body: Option<Value>,
}

impl RouteRequest {
    /// An unauthenticated request.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            roles: None,
            body: None,
        }
    }

    /// Attach the authenticated principal's role set.
    #[must_use]
    pub fn authenticated<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    /// Attach a request body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// One-shot builder for [`Dispatcher`].
///
/// `build(self)` consumes the builder, so reconfiguring after build is a
/// type-level impossibility - there is no `_built` flag to check at
/// runtime.
#[derive(Default)]
pub struct DispatcherBuilder {
    root: Option<Group>,
    role_universe: Option<Vec<String>>,
    guest_role: Option<String>,
    dev_mode: Option<bool>,
    cache_capacity: Option<usize>,
}

impl DispatcherBuilder {
    /// Declare the role universe. When set, every endpoint role and the
    /// guest role are validated against it at build time; when absent,
    /// role strings are unconstrained.
    #[must_use]
    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.role_universe = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    /// Set the guest role - the fallback identity for unauthenticated
    /// callers. Defaults to `"guest"`.
    #[must_use]
    pub fn guest_role(mut self, role: impl Into<String>) -> Self {
        self.guest_role = Some(role.into());
        self
    }

    /// Set the root group of the route tree. Required.
    #[must_use]
    pub fn root(mut self, root: Group) -> Self {
        self.root = Some(root);
        self
    }

    /// Force development mode on or off, overriding `RAIR_DEV_MODE`.
    #[must_use]
    pub fn dev_mode(mut self, enabled: bool) -> Self {
        self.dev_mode = Some(enabled);
        self
    }

    /// Override the resolution-cache capacity, overriding
    /// `RAIR_CACHE_CAPACITY`.
    #[must_use]
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    /// Compile the tree, build the matcher and install the handler chains.
    ///
    /// Consumes the builder; the returned [`Dispatcher`] is immutable.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from compilation or role-universe validation.
    /// Configuration errors indicate a mistake in the route declarations
    /// and must prevent the application from serving.
    pub fn build(self) -> Result<Dispatcher, ConfigError> {
        let root = self.root.ok_or(ConfigError::MissingRoot)?;
        let table = compile(&root)?;

        let guest_role = self.guest_role.unwrap_or_else(|| "guest".to_string());
        if let Some(universe) = &self.role_universe {
            if !universe.contains(&guest_role) {
                return Err(ConfigError::UnknownGuestRole { guest: guest_role });
            }
            for endpoint in table.iter() {
                for role in &endpoint.roles {
                    if !universe.contains(role) {
                        return Err(ConfigError::UnknownRole {
                            rai: endpoint.rai.to_string(),
                            role: role.clone(),
                        });
                    }
                }
            }
        }

        let runtime = RuntimeConfig::from_env();
        let dev_mode = self.dev_mode.unwrap_or(runtime.dev_mode);
        let cache_capacity = self.cache_capacity.unwrap_or(runtime.cache_capacity);

        let matcher = Matcher::from_table(&table, cache_capacity);
        let execution = ExecutionLayer::install(&table);

        info!(
            routes_count = table.len(),
            guest_role = %guest_role,
            dev_mode,
            cache_capacity,
            "Dispatcher built"
        );

        Ok(Dispatcher {
            table,
            matcher,
            execution,
            guest_role,
            dev_mode,
        })
    }
}

/// The runtime façade: resolves, authorizes, then dispatches each request.
///
/// Built exactly once from a consumed [`DispatcherBuilder`]; safe to share
/// across workers behind an `Arc`. Per request the pipeline is a two-phase
/// gate:
///
/// 1. **Intelligence layer** - [`Matcher::resolve`] maps the request to a
///    RAI, or fails `NotFound`.
/// 2. **Authorization** - set intersection between the caller's roles and
///    the endpoint's; an empty intersection fails `Unauthenticated` for the
///    guest singleton and `Forbidden` otherwise.
/// 3. **Execution layer** - parameter extraction and validation, then the
///    middleware hooks and the ordered handler chain.
pub struct Dispatcher {
    table: RouteTable,
    matcher: Matcher,
    execution: ExecutionLayer,
    guest_role: String,
    dev_mode: bool,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("guest_role", &self.guest_role)
            .field("dev_mode", &self.dev_mode)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Start configuring a dispatcher.
    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Run one request through the resolve → authorize → execute pipeline.
    ///
    /// # Errors
    ///
    /// [`RequestError::NotFound`] when no endpoint matches;
    /// [`RequestError::Unauthenticated`] / [`RequestError::Forbidden`] when
    /// the role intersection is empty; [`RequestError::InvalidParam`] when
    /// a path parameter fails its rule. None of these are retried - each is
    /// a deterministic function of the request and the compiled table.
    pub fn handle(&self, request: RouteRequest) -> Result<HandlerResponse, RequestError> {
        let dispatch_id = DispatchId::new();
        let RouteRequest {
            method,
            path,
            roles,
            body,
        } = request;

        debug!(
            dispatch_id = %dispatch_id,
            method = %method,
            path = %path,
            authenticated = roles.is_some(),
            "Request received"
        );

        let rai = self.matcher.resolve(&method, &path)?;
        let endpoint = match self.table.get(&rai) {
            Some(endpoint) => Arc::clone(endpoint),
            None => {
                warn!(
                    dispatch_id = %dispatch_id,
                    rai = %rai,
                    "Resolved RAI missing from route table"
                );
                return Err(RequestError::NotFound {
                    method: method.clone(),
                    path,
                    known_paths: self.matcher.known_paths(&method).to_vec(),
                });
            }
        };

        let caller_roles = roles.unwrap_or_else(|| vec![self.guest_role.clone()]);
        let authorized = endpoint.roles.iter().any(|r| caller_roles.contains(r));
        if !authorized {
            let guest_only = caller_roles.len() == 1 && caller_roles[0] == self.guest_role;
            warn!(
                dispatch_id = %dispatch_id,
                rai = %rai,
                required_roles = ?endpoint.roles,
                actual_roles = ?caller_roles,
                guest_only,
                "Authorization denied"
            );
            let err = if guest_only {
                RequestError::Unauthenticated {
                    required: endpoint.roles.clone(),
                    actual: caller_roles,
                }
            } else {
                RequestError::Forbidden {
                    required: endpoint.roles.clone(),
                    actual: caller_roles,
                }
            };
            return Err(err);
        }

        debug!(dispatch_id = %dispatch_id, rai = %rai, "Authorization passed");

        self.execution
            .invoke(dispatch_id, &endpoint, method, path, caller_roles, body)
    }

    /// Render a request error as the JSON payload for the host's error
    /// boundary, honoring this dispatcher's development mode.
    #[must_use]
    pub fn error_body(&self, err: &RequestError) -> Value {
        err.to_json(self.dev_mode)
    }

    /// The full ordered RAI → endpoint table, for diagnostics and tooling.
    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Single-RAI lookup into the compiled table.
    #[must_use]
    pub fn endpoint(&self, rai: &str) -> Option<&Arc<ResolvedEndpoint>> {
        self.table.get(rai)
    }

    /// Paths in the order handler chains were installed into the execution
    /// layer (registration-order comparator, not matcher specificity).
    #[must_use]
    pub fn registration_order(&self) -> Vec<&str> {
        self.execution.registration_order()
    }

    /// Statistics of the matcher's resolution cache.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.matcher.cache_stats()
    }

    /// The configured guest role.
    #[must_use]
    pub fn guest_role(&self) -> &str {
        &self.guest_role
    }

    /// Whether development-mode diagnostics are enabled.
    #[must_use]
    pub fn dev_mode(&self) -> bool {
        self.dev_mode
    }

    /// Print all installed routes to stdout. Useful for verifying that the
    /// tree compiled the way it was declared.
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.table.len());
        for path in self.execution.registration_order() {
            println!("[route] {path}");
        }
    }
}
