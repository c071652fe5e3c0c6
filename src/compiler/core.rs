use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use super::table::{ResolvedEndpoint, RouteTable};
use crate::errors::ConfigError;
use crate::middleware::Middleware;
use crate::tree::{Endpoint, Group, ParamRule, RouteNode};

/// Methods accepted in endpoint declarations.
pub const SUPPORTED_METHODS: [Method; 4] =
    [Method::GET, Method::POST, Method::PUT, Method::DELETE];

/// Valid `:name` parameter identifiers in a path template.
static PARAM_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Failed to compile param name regex")
});

/// Flatten a [`Group`] tree into the ordered RAI → [`ResolvedEndpoint`]
/// table.
///
/// Traversal is depth-first, pre-order: a group's own param rules and
/// middleware are accumulated before recursing into its children, so the
/// accumulation order is deterministic and matches declaration order. Path
/// composition is pure prefix concatenation; trailing slashes are left for
/// the matcher.
///
/// # Errors
///
/// Fails with [`ConfigError::DuplicateRai`] when two endpoints share a RAI
/// (the first occurrence stays in the table; the duplicate is reported),
/// or with the relevant [`ConfigError`] variant for a malformed endpoint.
pub fn compile(root: &Group) -> Result<RouteTable, ConfigError> {
    let mut entries: Vec<Arc<ResolvedEndpoint>> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    walk(root, "", &[], &[], &mut entries, &mut seen)?;

    let routes_summary: Vec<String> = entries
        .iter()
        .take(10)
        .map(|ep| format!("{} {} -> {}", ep.method, ep.path, ep.rai))
        .collect();
    info!(
        routes_count = entries.len(),
        routes_summary = ?routes_summary,
        "Route table compiled"
    );

    Ok(RouteTable::new(entries))
}

fn walk(
    group: &Group,
    inherited_prefix: &str,
    inherited_params: &[ParamRule],
    inherited_middleware: &[Arc<dyn Middleware>],
    entries: &mut Vec<Arc<ResolvedEndpoint>>,
    seen: &mut HashMap<String, usize>,
) -> Result<(), ConfigError> {
    let prefix = format!("{}{}", inherited_prefix, group.prefix);

    // Own rules/middleware accumulate before any child is visited.
    let mut params: Vec<ParamRule> = if group.merge_params {
        inherited_params.to_vec()
    } else {
        Vec::new()
    };
    for rule in &group.param_rules {
        merge_rule(&mut params, rule.clone());
    }

    let mut middleware: Vec<Arc<dyn Middleware>> = inherited_middleware.to_vec();
    middleware.extend(group.middleware.iter().map(Arc::clone));

    for node in &group.children {
        match node {
            RouteNode::Endpoint(endpoint) => {
                validate_endpoint(endpoint)?;
                let path = format!("{}{}", prefix, endpoint.path);

                if let Some(&first) = seen.get(&endpoint.rai) {
                    return Err(ConfigError::DuplicateRai {
                        rai: endpoint.rai.clone(),
                        first_path: entries[first].path.clone(),
                        second_path: path,
                    });
                }

                seen.insert(endpoint.rai.clone(), entries.len());
                entries.push(Arc::new(ResolvedEndpoint {
                    rai: Arc::from(endpoint.rai.as_str()),
                    method: endpoint.method.clone(),
                    path,
                    roles: endpoint.roles.clone(),
                    handlers: endpoint.handlers.clone(),
                    middleware: middleware.clone(),
                    params: params.clone(),
                    name: endpoint.name.clone(),
                    description: endpoint.description.clone(),
                    meta: endpoint.meta.clone(),
                }));
            }
            RouteNode::Group(child) => {
                walk(child, &prefix, &params, &middleware, entries, seen)?;
            }
        }
    }

    Ok(())
}

/// Last write wins: a later rule for the same name replaces the earlier one.
fn merge_rule(rules: &mut Vec<ParamRule>, rule: ParamRule) {
    rules.retain(|r| r.name() != rule.name());
    rules.push(rule);
}

fn validate_endpoint(endpoint: &Endpoint) -> Result<(), ConfigError> {
    if endpoint.rai.trim().is_empty() {
        return Err(ConfigError::EmptyRai {
            method: endpoint.method.clone(),
            path: endpoint.path.clone(),
        });
    }
    if !endpoint.path.starts_with('/') {
        return Err(ConfigError::InvalidPath {
            rai: endpoint.rai.clone(),
            path: endpoint.path.clone(),
        });
    }
    if !SUPPORTED_METHODS.contains(&endpoint.method) {
        return Err(ConfigError::UnsupportedMethod {
            rai: endpoint.rai.clone(),
            method: endpoint.method.clone(),
        });
    }
    if endpoint.roles.is_empty() {
        return Err(ConfigError::EmptyRoles {
            rai: endpoint.rai.clone(),
        });
    }
    if endpoint.handlers.is_empty() {
        return Err(ConfigError::EmptyHandlers {
            rai: endpoint.rai.clone(),
        });
    }
    for segment in endpoint.path.split('/') {
        if let Some(name) = segment.strip_prefix(':') {
            if !PARAM_NAME.is_match(name) {
                return Err(ConfigError::InvalidPath {
                    rai: endpoint.rai.clone(),
                    path: endpoint.path.clone(),
                });
            }
        }
    }
    Ok(())
}
