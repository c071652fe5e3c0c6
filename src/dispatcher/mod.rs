//! # Dispatcher Module
//!
//! The runtime façade of the crate: owns the compiled table, the matcher,
//! the role configuration and the execution layer, and runs every request
//! through the two-phase gate.
//!
//! ## Request Flow
//!
//! 1. Host HTTP layer assembles a [`RouteRequest`] and calls
//!    [`Dispatcher::handle`]
//! 2. The matcher resolves `(path, method)` to a RAI, or the request fails
//!    `NotFound`
//! 3. The caller's role set (or the guest singleton) is intersected with
//!    the endpoint's roles; an empty intersection fails `Unauthenticated`
//!    for the guest singleton and `Forbidden` otherwise
//! 4. The execution layer extracts and validates path parameters, runs the
//!    middleware hooks and the ordered handler chain
//!
//! Per request the state machine is `Unresolved → Resolved → Authorized →
//! Dispatched`, with `NotFound` / `Unauthenticated` / `Forbidden` as
//! terminal failures. No retries; each request is independent.
//!
//! ## Handler Registration
//!
//! Handler chains are declared on the endpoints themselves and installed
//! at build time, pre-sorted with [`registration_cmp`] so literal routes
//! land ahead of overlapping parameterized ones - an ordering deliberately
//! distinct from the matcher's specificity index.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rairouter::dispatcher::{Dispatcher, HandlerOutcome, HandlerResponse, RouteRequest};
//! use rairouter::tree::{Endpoint, Group};
//! use http::Method;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let root = Group::new("/api").route(
//!     Endpoint::new(Method::GET, "/health", "system:health")
//!         .role("guest")
//!         .handler(|_req| HandlerOutcome::Respond(HandlerResponse::json(200, json!({"ok": true})))),
//! );
//!
//! let dispatcher = Dispatcher::builder().root(root).build()?;
//!
//! let response = dispatcher.handle(RouteRequest::new(Method::GET, "/api/health"))?;
//! assert_eq!(response.status, 200);
//! # Ok(())
//! # }
//! ```

mod core;
mod execution;

pub use self::core::{
    Dispatcher, DispatcherBuilder, Handler, HandlerOutcome, HandlerRequest, HandlerResponse,
    HeaderVec, ParamVec, RouteRequest, MAX_INLINE_HEADERS, MAX_INLINE_PARAMS,
};
pub use self::execution::registration_cmp;
