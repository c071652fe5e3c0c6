//! Execution layer: handler-chain installation and invocation.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use http::Method;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::core::{HandlerOutcome, HandlerRequest, HandlerResponse, ParamVec};
use crate::compiler::{ResolvedEndpoint, RouteTable};
use crate::errors::RequestError;
use crate::ids::DispatchId;
use crate::matcher::{compile_template, is_dynamic_segment, toggle_slash};

/// Order in which handler chains are installed into the execution layer.
///
/// Distinct from the matcher's specificity score: this comparator only
/// decides installation order, never how RAIs resolve. Segment by segment,
/// a path that has run out of segments sorts *after* the longer one; at a
/// shared index a literal segment sorts before a parameterized one; the
/// final tie-break is descending raw path length. The net effect is that
/// literal routes are registered ahead of overlapping parameterized routes.
#[must_use]
pub fn registration_cmp(a: &str, b: &str) -> Ordering {
    let left: Vec<&str> = a.split('/').filter(|s| !s.is_empty()).collect();
    let right: Vec<&str> = b.split('/').filter(|s| !s.is_empty()).collect();

    for i in 0..left.len().max(right.len()) {
        match (left.get(i), right.get(i)) {
            (None, Some(_)) => return Ordering::Greater,
            (Some(_), None) => return Ordering::Less,
            (Some(x), Some(y)) => {
                match (is_dynamic_segment(x), is_dynamic_segment(y)) {
                    (false, true) => return Ordering::Less,
                    (true, false) => return Ordering::Greater,
                    _ => {}
                }
            }
            (None, None) => break,
        }
    }

    b.len().cmp(&a.len())
}

struct InstalledRoute {
    endpoint: Arc<ResolvedEndpoint>,
    regex: Regex,
    param_names: Vec<Arc<str>>,
}

/// Holds the installed handler chains, keyed by RAI, in registration order.
pub(crate) struct ExecutionLayer {
    routes: Vec<InstalledRoute>,
    by_rai: HashMap<Arc<str>, usize>,
}

impl ExecutionLayer {
    /// Install one chain per resolved endpoint, pre-sorted with
    /// [`registration_cmp`].
    pub(crate) fn install(table: &RouteTable) -> Self {
        let mut routes: Vec<InstalledRoute> = table
            .iter()
            .map(|endpoint| {
                let (regex, param_names) = compile_template(&endpoint.path);
                InstalledRoute {
                    endpoint: Arc::clone(endpoint),
                    regex,
                    param_names,
                }
            })
            .collect();

        routes.sort_by(|a, b| registration_cmp(&a.endpoint.path, &b.endpoint.path));

        for route in &routes {
            debug!(
                method = %route.endpoint.method,
                path = %route.endpoint.path,
                rai = %route.endpoint.rai,
                handlers = route.endpoint.handlers.len(),
                middleware = route.endpoint.middleware.len(),
                "Handler chain installed"
            );
        }

        let by_rai = routes
            .iter()
            .enumerate()
            .map(|(i, route)| (Arc::clone(&route.endpoint.rai), i))
            .collect();

        Self { routes, by_rai }
    }

    /// Installed paths, in registration order.
    pub(crate) fn registration_order(&self) -> Vec<&str> {
        self.routes
            .iter()
            .map(|route| route.endpoint.path.as_str())
            .collect()
    }

    /// Invoke the chain for an already resolved, already authorized
    /// endpoint: extract path parameters, validate each against its
    /// effective rule, run middleware `before` hooks, the handler chain,
    /// then middleware `after` hooks.
    pub(crate) fn invoke(
        &self,
        dispatch_id: DispatchId,
        endpoint: &Arc<ResolvedEndpoint>,
        method: Method,
        path: String,
        roles: Vec<String>,
        body: Option<Value>,
    ) -> Result<HandlerResponse, RequestError> {
        let installed = match self.by_rai.get(&endpoint.rai).map(|&i| &self.routes[i]) {
            Some(route) => route,
            None => {
                error!(
                    dispatch_id = %dispatch_id,
                    rai = %endpoint.rai,
                    "No handler chain installed for RAI"
                );
                return Err(RequestError::NotFound {
                    method,
                    path,
                    known_paths: Vec::new(),
                });
            }
        };

        // The matcher accepted either the path or its trailing-slash
        // alternate; extraction has to try both.
        let path_params = extract_params(installed, &path)
            .or_else(|| {
                toggle_slash(&path).and_then(|alternate| extract_params(installed, &alternate))
            })
            .unwrap_or_default();

        for (name, value) in &path_params {
            if let Some(rule) = endpoint.param_rule(name) {
                if !rule.validate(value) {
                    warn!(
                        dispatch_id = %dispatch_id,
                        rai = %endpoint.rai,
                        param = %name,
                        "Path parameter failed validation"
                    );
                    return Err(RequestError::InvalidParam {
                        name: name.to_string(),
                        value: value.clone(),
                    });
                }
            }
        }

        let request = HandlerRequest {
            dispatch_id,
            method,
            path,
            rai: Arc::clone(&endpoint.rai),
            path_params,
            roles,
            body,
        };

        let start = Instant::now();

        let mut early: Option<HandlerResponse> = None;
        for mw in &endpoint.middleware {
            if early.is_none() {
                early = mw.before(&request);
                if early.is_some() {
                    debug!(
                        dispatch_id = %dispatch_id,
                        rai = %request.rai,
                        "Middleware returned early response"
                    );
                }
            }
        }

        let mut response = match early {
            Some(response) => response,
            None => {
                let mut chain_response = None;
                for handler in &endpoint.handlers {
                    match (handler.as_ref())(&request) {
                        HandlerOutcome::Next => continue,
                        HandlerOutcome::Respond(response) => {
                            chain_response = Some(response);
                            break;
                        }
                    }
                }
                match chain_response {
                    Some(response) => response,
                    None => {
                        error!(
                            dispatch_id = %dispatch_id,
                            rai = %request.rai,
                            handlers = endpoint.handlers.len(),
                            "Handler chain produced no response"
                        );
                        HandlerResponse::error(500, "handler chain produced no response")
                    }
                }
            }
        };

        let latency = start.elapsed();
        for mw in &endpoint.middleware {
            mw.after(&request, &mut response, latency);
        }

        info!(
            dispatch_id = %dispatch_id,
            rai = %request.rai,
            status = response.status,
            latency_ms = latency.as_millis() as u64,
            "Dispatch complete"
        );

        Ok(response)
    }
}

fn extract_params(route: &InstalledRoute, path: &str) -> Option<ParamVec> {
    let captures = route.regex.captures(path)?;
    let mut params = ParamVec::new();
    for (i, name) in route.param_names.iter().enumerate() {
        if let Some(value) = captures.get(i + 1) {
            params.push((Arc::clone(name), value.as_str().to_string()));
        }
    }
    Some(params)
}

#[cfg(test)]
mod tests {
    use super::registration_cmp;
    use std::cmp::Ordering;

    #[test]
    fn literal_sorts_before_param_at_shared_index() {
        assert_eq!(registration_cmp("/items/new", "/items/:id"), Ordering::Less);
        assert_eq!(registration_cmp("/items/:id", "/items/new"), Ordering::Greater);
    }

    #[test]
    fn shorter_path_sorts_later() {
        assert_eq!(registration_cmp("/items", "/items/:id"), Ordering::Greater);
        assert_eq!(registration_cmp("/items/:id", "/items"), Ordering::Less);
    }

    #[test]
    fn tie_breaks_on_descending_length() {
        assert_eq!(registration_cmp("/posts", "/p"), Ordering::Less);
        assert_eq!(registration_cmp("/p", "/posts"), Ordering::Greater);
    }
}
