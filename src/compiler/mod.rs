//! # Compiler Module
//!
//! Flattens the declarative [`crate::tree::Group`] tree into the ordered
//! RAI → [`ResolvedEndpoint`] table the matcher and the execution layer are
//! built from.
//!
//! ## Overview
//!
//! The compiler is responsible for:
//! - Depth-first pre-order traversal of the group tree
//! - Rewriting each endpoint path to the concatenation of its ancestor
//!   prefixes (root to leaf)
//! - Accumulating middleware and param rules along the way, honoring each
//!   group's `merge_params` flag and de-duplicating rules by name with
//!   last-write-wins
//! - Enforcing the RAI uniqueness invariant and the endpoint field
//!   contract (non-empty RAI/roles/handlers, absolute path, supported
//!   method)
//!
//! The resulting [`RouteTable`] is immutable; it doubles as the read-only
//! introspection surface for diagnostics and tooling.

mod core;
mod table;

pub use self::core::{compile, SUPPORTED_METHODS};
pub use self::table::{ResolvedEndpoint, RouteTable};
