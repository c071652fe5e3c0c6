//! Matcher core - hot path for RAI resolution.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use http::Method;
use tracing::{debug, info, warn};

use super::cache::{CacheStats, ResolutionCache};
use super::pattern::{self, CompiledPattern};
use crate::compiler::RouteTable;
use crate::errors::RequestError;

/// Resolves `(method, path)` to a RAI against the compiled route table.
///
/// Three layers, consulted in order:
///
/// 1. **Exact index** - O(1) lookup for fully literal paths, registered
///    under both trailing-slash variants. A static path is never shadowed
///    by a structurally-overlapping parameterized sibling, regardless of
///    pattern order.
/// 2. **Resolution cache** - bounded FIFO memo of prior dynamic
///    resolutions.
/// 3. **Pattern lists** - per-method, sorted descending by specificity
///    score with a stable sort, so equal-score templates keep their
///    declaration order.
///
/// Built once from the table; immutable afterwards apart from the cache.
pub struct Matcher {
    exact: HashMap<Method, HashMap<String, Arc<str>>>,
    patterns: HashMap<Method, Vec<CompiledPattern>>,
    known_paths: HashMap<Method, Vec<String>>,
    cache: ResolutionCache,
}

impl Matcher {
    /// Build the matcher from a compiled route table.
    #[must_use]
    pub fn from_table(table: &RouteTable, cache_capacity: usize) -> Self {
        let mut exact: HashMap<Method, HashMap<String, Arc<str>>> = HashMap::new();
        let mut patterns: HashMap<Method, Vec<CompiledPattern>> = HashMap::new();
        let mut known_paths: HashMap<Method, Vec<String>> = HashMap::new();

        for endpoint in table.iter() {
            known_paths
                .entry(endpoint.method.clone())
                .or_default()
                .push(endpoint.path.clone());

            if !pattern::is_dynamic(&endpoint.path) {
                let index = exact.entry(endpoint.method.clone()).or_default();
                index.insert(endpoint.path.clone(), Arc::clone(&endpoint.rai));
                if let Some(alternate) = pattern::toggle_slash(&endpoint.path) {
                    index.insert(alternate, Arc::clone(&endpoint.rai));
                }
            }

            let (regex, param_names) = pattern::compile_template(&endpoint.path);
            patterns
                .entry(endpoint.method.clone())
                .or_default()
                .push(CompiledPattern {
                    rai: Arc::clone(&endpoint.rai),
                    path: endpoint.path.clone(),
                    regex,
                    param_names,
                    score_tenths: pattern::score_tenths(&endpoint.path),
                });
        }

        // Stable sort: equal scores keep declaration order, so ties resolve
        // in favor of the endpoint declared earlier in the source tree.
        for list in patterns.values_mut() {
            list.sort_by(|a, b| b.score_tenths.cmp(&a.score_tenths));
        }

        info!(
            exact_entries = exact.values().map(HashMap::len).sum::<usize>(),
            pattern_entries = patterns.values().map(Vec::len).sum::<usize>(),
            cache_capacity,
            "Matcher built"
        );

        Self {
            exact,
            patterns,
            known_paths,
            cache: ResolutionCache::with_capacity(cache_capacity),
        }
    }

    /// Resolve a request to the RAI of its endpoint.
    ///
    /// # Errors
    ///
    /// [`RequestError::NotFound`] when nothing matches; the error carries
    /// the method and the list of paths registered for it.
    pub fn resolve(&self, method: &Method, path: &str) -> Result<Arc<str>, RequestError> {
        debug!(method = %method, path = %path, "Route match attempt");
        let match_start = Instant::now();

        // Static paths carry no ambiguity; the exact index always wins.
        if let Some(rai) = self.exact.get(method).and_then(|index| index.get(path)) {
            info!(
                method = %method,
                path = %path,
                rai = %rai,
                duration_us = match_start.elapsed().as_micros() as u64,
                layer = "exact",
                "Route matched"
            );
            return Ok(Arc::clone(rai));
        }

        if let Some(rai) = self.cache.get(method, path) {
            debug!(
                method = %method,
                path = %path,
                rai = %rai,
                layer = "cache",
                "Route matched"
            );
            return Ok(rai);
        }

        let alternate = pattern::toggle_slash(path);
        if let Some(list) = self.patterns.get(method) {
            for compiled in list {
                let matched = compiled.regex.is_match(path)
                    || alternate
                        .as_deref()
                        .is_some_and(|alt| compiled.regex.is_match(alt));
                if matched {
                    self.cache
                        .insert(method.clone(), path.to_string(), Arc::clone(&compiled.rai));

                    let duration = match_start.elapsed();
                    if duration.as_millis() > 1 {
                        warn!(
                            method = %method,
                            path = %path,
                            rai = %compiled.rai,
                            route_pattern = %compiled.path,
                            duration_us = duration.as_micros() as u64,
                            "Slow route matching detected"
                        );
                    } else {
                        info!(
                            method = %method,
                            path = %path,
                            rai = %compiled.rai,
                            route_pattern = %compiled.path,
                            duration_us = duration.as_micros() as u64,
                            layer = "pattern",
                            "Route matched"
                        );
                    }
                    return Ok(Arc::clone(&compiled.rai));
                }
            }
        }

        warn!(
            method = %method,
            path = %path,
            duration_us = match_start.elapsed().as_micros() as u64,
            "No route matched"
        );
        Err(RequestError::NotFound {
            method: method.clone(),
            path: path.to_string(),
            known_paths: self.known_paths.get(method).cloned().unwrap_or_default(),
        })
    }

    /// Paths registered for a method, in declaration order.
    #[must_use]
    pub fn known_paths(&self, method: &Method) -> &[String] {
        self.known_paths
            .get(method)
            .map_or(&[], Vec::as_slice)
    }

    /// Statistics of the dynamic-resolution cache.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
