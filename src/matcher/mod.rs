//! # Matcher Module
//!
//! Path matching and RAI resolution over the compiled route table.
//!
//! ## Overview
//!
//! The matcher is responsible for:
//! - Building an exact-match index for fully literal paths (both
//!   trailing-slash variants)
//! - Compiling every path template into an anchored regex with a
//!   specificity score
//! - Resolving `(path, method)` to a RAI, memoizing dynamic resolutions in
//!   a bounded FIFO cache
//!
//! ## Specificity
//!
//! The exact index resolves the dominant real-world collision - a fully
//! literal path (a "create new" route) overlapping a parameterized sibling
//! (a "read by id" route) - in O(1), without relying on scoring. The score
//! only decides the rarer case where two *parameterized* templates both
//! satisfy the same concrete path: more and earlier literal segments win,
//! and exact ties fall back to declaration order via the stable sort.

mod cache;
mod core;
mod pattern;

pub use self::cache::CacheStats;
pub use self::core::Matcher;
pub use self::pattern::CompiledPattern;

pub(crate) use self::pattern::{compile_template, is_dynamic_segment, toggle_slash};
