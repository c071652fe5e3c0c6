//! # Tree Module
//!
//! Declarative route-tree types consumed by the compiler. User code builds
//! a [`Group`] tree of [`Endpoint`] leaves during bootstrap, then hands the
//! root to [`crate::dispatcher::DispatcherBuilder`]; the tree is consumed
//! exactly once and never mutated afterwards.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rairouter::dispatcher::{HandlerOutcome, HandlerResponse};
//! use rairouter::tree::{Endpoint, Group, ParamRule};
//! use http::Method;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), rairouter::errors::ConfigError> {
//! let posts = Group::new("/posts")
//!     .param(ParamRule::new("id").pattern("^[0-9]+$")?)
//!     .route(
//!         Endpoint::new(Method::GET, "/:id", "posts:read")
//!             .role("reader")
//!             .handler(|req| {
//!                 let id = req.path_param("id").unwrap_or("?");
//!                 HandlerOutcome::Respond(HandlerResponse::json(200, json!({ "id": id })))
//!             }),
//!     );
//!
//! let root = Group::new("/api").group(posts);
//! # let _ = root;
//! # Ok(())
//! # }
//! ```

mod param;
mod types;

pub use param::ParamRule;
pub use types::{Endpoint, Group, RouteNode};
