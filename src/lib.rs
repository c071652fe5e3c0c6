//! # rairouter
//!
//! **rairouter** is a declarative, RAI-driven request router for Rust: a
//! hierarchical tree of endpoint declarations is compiled into a flat,
//! globally-unique table keyed by Route Access Identifier (RAI), and every
//! request is resolved, authorized and dispatched against that table.
//!
//! ## Overview
//!
//! The crate is the routing/authorization engine a host HTTP layer invokes
//! per request; it deliberately contains no server, no config-file loading
//! and no persistence. User code declares a [`tree::Group`] tree of
//! [`tree::Endpoint`] leaves at bootstrap, hands the root to
//! [`dispatcher::DispatcherBuilder`], and calls
//! [`dispatcher::Dispatcher::handle`] for each incoming request.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - **[`tree`]** - declarative route-tree types: endpoints, groups, param
//!   rules, and the tagged [`tree::RouteNode`] union
//! - **[`compiler`]** - flattens the tree into the ordered RAI →
//!   [`compiler::ResolvedEndpoint`] table, enforcing RAI uniqueness and
//!   the endpoint field contract
//! - **[`matcher`]** - exact-match index for static paths,
//!   specificity-ranked pattern lists for dynamic ones, and a bounded FIFO
//!   resolution cache
//! - **[`dispatcher`]** - the runtime façade: per-request resolve →
//!   authorize → execute pipeline and the handler-chain execution layer
//! - **[`middleware`]** - pluggable before/after hooks inherited through
//!   groups (tracing, metrics)
//! - **[`errors`]** - the two disjoint error families: build-time
//!   [`errors::ConfigError`] and per-request [`errors::RequestError`]
//! - **[`runtime_config`]** - environment-variable runtime knobs
//!
//! ## Request Handling Flow
//!
//! ```text
//! Group tree ──compile──▶ RouteTable ──build──▶ Matcher + ExecutionLayer
//!                                                  │
//!   per request: resolve(path, method) → RAI ──────┤
//!                authorize(roles ∩ endpoint.roles) │
//!                invoke(handler chain) ◀───────────┘
//! ```
//!
//! Resolution and authorization are pure, synchronous computations over
//! immutable structures; the only shared mutable state on the request path
//! is the matcher's resolution cache, which is internally synchronized.
//! A built [`dispatcher::Dispatcher`] can therefore be shared across
//! workers behind an `Arc`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rairouter::dispatcher::{Dispatcher, HandlerOutcome, HandlerResponse, RouteRequest};
//! use rairouter::tree::{Endpoint, Group, ParamRule};
//! use http::Method;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let posts = Group::new("/posts")
//!     .param(ParamRule::new("id").pattern("^[0-9]+$")?)
//!     .route(
//!         Endpoint::new(Method::GET, "/", "posts:list")
//!             .roles(["reader", "editor"])
//!             .handler(|_req| HandlerOutcome::Respond(HandlerResponse::json(200, json!([])))),
//!     )
//!     .route(
//!         Endpoint::new(Method::GET, "/:id", "posts:read")
//!             .role("reader")
//!             .handler(|req| {
//!                 let id = req.path_param("id").unwrap_or("?");
//!                 HandlerOutcome::Respond(HandlerResponse::json(200, json!({ "id": id })))
//!             }),
//!     );
//!
//! let dispatcher = Dispatcher::builder()
//!     .roles(["guest", "reader", "editor"])
//!     .guest_role("guest")
//!     .root(Group::new("/api").group(posts))
//!     .build()?;
//!
//! let request = RouteRequest::new(Method::GET, "/api/posts/42").authenticated(["reader"]);
//! match dispatcher.handle(request) {
//!     Ok(response) => println!("{} {}", response.status, response.body),
//!     Err(err) => println!("{} {}", err.status(), dispatcher.error_body(&err)),
//! }
//! # Ok(())
//! # }
//! ```

pub mod compiler;
pub mod dispatcher;
pub mod errors;
pub mod ids;
pub mod matcher;
pub mod middleware;
pub mod runtime_config;
pub mod tree;

pub use compiler::{compile, ResolvedEndpoint, RouteTable};
pub use dispatcher::{
    Dispatcher, DispatcherBuilder, HandlerOutcome, HandlerRequest, HandlerResponse, RouteRequest,
};
pub use errors::{ConfigError, RequestError};
pub use matcher::{CacheStats, Matcher};
pub use tree::{Endpoint, Group, ParamRule, RouteNode};
