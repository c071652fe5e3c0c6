//! # Runtime Configuration Module
//!
//! Environment variable-based configuration for runtime behavior. Builder
//! settings on [`crate::dispatcher::DispatcherBuilder`] take precedence over
//! the environment.
//!
//! ## Environment Variables
//!
//! ### `RAIR_DEV_MODE`
//!
//! Enables development mode (`1`, `true`, `yes`, `on`; anything else is
//! off). In development mode, request-error payloads are enriched with
//! diagnostics: `NotFound` carries the method's registered paths,
//! `Unauthenticated`/`Forbidden` carry the required-vs-actual role lists.
//!
//! Default: off.
//!
//! ### `RAIR_CACHE_CAPACITY`
//!
//! Bound of the dynamic-resolution cache. Accepts values in:
//! - Decimal: `1000`
//! - Hexadecimal: `0x400` (1024)
//!
//! Default: `1000`. Entries beyond the bound are evicted FIFO, oldest first.
//!
//! ## Usage
//!
//! ```rust
//! use rairouter::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("cache capacity: {}", config.cache_capacity);
//! ```

use std::env;

/// Default bound of the dynamic-resolution cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Runtime configuration loaded from environment variables.
///
/// Load this at startup using [`RuntimeConfig::from_env()`]; the dispatcher
/// builder reads it for any knob the caller did not set explicitly.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Development mode: enrich request-error payloads with diagnostics.
    pub dev_mode: bool,
    /// Resolution cache bound (default: 1000).
    pub cache_capacity: usize,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let dev_mode = match env::var("RAIR_DEV_MODE") {
            Ok(val) => matches!(
                val.to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            ),
            Err(_) => false,
        };

        let cache_capacity = match env::var("RAIR_CACHE_CAPACITY") {
            Ok(val) => {
                if let Some(hex) = val.strip_prefix("0x") {
                    usize::from_str_radix(hex, 16).unwrap_or(DEFAULT_CACHE_CAPACITY)
                } else {
                    val.parse().unwrap_or(DEFAULT_CACHE_CAPACITY)
                }
            }
            Err(_) => DEFAULT_CACHE_CAPACITY,
        };

        RuntimeConfig {
            dev_mode,
            cache_capacity,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            dev_mode: false,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}
