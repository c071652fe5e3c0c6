//! # Error Types
//!
//! Two disjoint error families, mirroring the split between build time and
//! request time:
//!
//! - [`ConfigError`] - raised while the route tree is compiled and the
//!   dispatcher is built. These indicate a programming mistake in the route
//!   declarations and are returned to the caller instead of aborting the
//!   process; the application entry point decides whether to bail.
//! - [`RequestError`] - raised per request. Each variant carries a
//!   machine-readable code, a transport-level status hint, and enough
//!   context to render a diagnostic payload.
//!
//! ## Status Mapping
//!
//! | Variant | `code()` | `status()` |
//! |---|---|---|
//! | `NotFound` | `not_found` | 404 |
//! | `Unauthenticated` | `unauthenticated` | 401 |
//! | `Forbidden` | `forbidden` | 403 |
//! | `InvalidParam` | `invalid_param` | 400 |
//!
//! Request errors are deterministic functions of the request and the
//! compiled table; none of them is ever retried.

use http::Method;
use serde_json::{json, Value};
use thiserror::Error;

/// Configuration error detected while compiling the route tree or building
/// the dispatcher.
///
/// These are non-recoverable: the application must not reach a servable
/// state while any of them is outstanding.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Two endpoints in the tree declare the same RAI. The first occurrence
    /// stays in the table; the duplicate is reported here.
    #[error("duplicate RAI `{rai}`: declared by `{first_path}`, redeclared by `{second_path}`")]
    DuplicateRai {
        rai: String,
        first_path: String,
        second_path: String,
    },

    /// An endpoint was declared without a RAI.
    #[error("endpoint {method} {path} declares an empty RAI")]
    EmptyRai { method: Method, path: String },

    /// An endpoint path must be absolute.
    #[error("endpoint `{rai}`: path `{path}` must start with `/`")]
    InvalidPath { rai: String, path: String },

    /// Only GET, POST, PUT and DELETE are routable.
    #[error("endpoint `{rai}`: method {method} is not routable (supported: GET, POST, PUT, DELETE)")]
    UnsupportedMethod { rai: String, method: Method },

    /// An endpoint with an empty role set can never be authorized.
    #[error("endpoint `{rai}` declares no roles and would be unreachable")]
    EmptyRoles { rai: String },

    /// An endpoint must carry at least one handler.
    #[error("endpoint `{rai}` declares no handlers")]
    EmptyHandlers { rai: String },

    /// A param rule was given a pattern that does not compile.
    #[error("param rule `{param}`: invalid pattern")]
    InvalidParamPattern {
        param: String,
        #[source]
        source: regex::Error,
    },

    /// An endpoint references a role outside the declared role universe.
    #[error("endpoint `{rai}`: role `{role}` is not in the declared role universe")]
    UnknownRole { rai: String, role: String },

    /// The configured guest role must be part of the declared role universe.
    #[error("guest role `{guest}` is not in the declared role universe")]
    UnknownGuestRole { guest: String },

    /// The dispatcher builder was finalized without a root group.
    #[error("dispatcher builder requires a root group")]
    MissingRoot,
}

/// Per-request error produced by the resolve/authorize/execute pipeline.
///
/// Recoverable in the sense that the request fails but the process keeps
/// serving. The host layer maps [`RequestError::status`] onto its transport.
#[derive(Debug, Clone, Error)]
pub enum RequestError {
    /// No endpoint matched the requested method and path.
    ///
    /// `known_paths` lists every path registered for the method, for
    /// diagnostics; it reaches the JSON payload only in development mode.
    #[error("no route registered for {method} {path}")]
    NotFound {
        method: Method,
        path: String,
        known_paths: Vec<String>,
    },

    /// The caller presented no credential (guest identity) and the endpoint
    /// does not admit the guest role.
    #[error("authentication required")]
    Unauthenticated {
        required: Vec<String>,
        actual: Vec<String>,
    },

    /// The caller is authenticated but holds none of the endpoint's roles.
    #[error("insufficient privileges")]
    Forbidden {
        required: Vec<String>,
        actual: Vec<String>,
    },

    /// A path parameter failed its param rule before handler invocation.
    #[error("invalid value `{value}` for path parameter `{name}`")]
    InvalidParam { name: String, value: String },
}

impl RequestError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            RequestError::NotFound { .. } => "not_found",
            RequestError::Unauthenticated { .. } => "unauthenticated",
            RequestError::Forbidden { .. } => "forbidden",
            RequestError::InvalidParam { .. } => "invalid_param",
        }
    }

    /// Transport-level status hint. `InvalidParam` is pinned to 400 so
    /// every code carries an explicit status.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            RequestError::NotFound { .. } => 404,
            RequestError::Unauthenticated { .. } => 401,
            RequestError::Forbidden { .. } => 403,
            RequestError::InvalidParam { .. } => 400,
        }
    }

    /// Render the error as a JSON payload for the generic error-response
    /// boundary.
    ///
    /// Diagnostic lists (known paths, required-vs-actual roles) are included
    /// only when `dev_mode` is set; production payloads stay terse.
    #[must_use]
    pub fn to_json(&self, dev_mode: bool) -> Value {
        let mut body = json!({
            "code": self.code(),
            "error": self.to_string(),
        });
        match self {
            RequestError::NotFound {
                method,
                path,
                known_paths,
            } => {
                body["method"] = json!(method.as_str());
                body["path"] = json!(path);
                if dev_mode {
                    body["known_paths"] = json!(known_paths);
                }
            }
            RequestError::Unauthenticated { required, actual }
            | RequestError::Forbidden { required, actual } => {
                if dev_mode {
                    body["required_roles"] = json!(required);
                    body["actual_roles"] = json!(actual);
                }
            }
            RequestError::InvalidParam { name, value } => {
                body["param"] = json!(name);
                if dev_mode {
                    body["value"] = json!(value);
                }
            }
        }
        body
    }
}
