use std::time::Duration;

use tracing::{debug, info};

use super::Middleware;
use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// Middleware that logs the entry and exit of every request reaching the
/// execution layer, keyed by the request's dispatch id.
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn before(&self, req: &HandlerRequest) -> Option<HandlerResponse> {
        debug!(
            dispatch_id = %req.dispatch_id,
            method = %req.method,
            path = %req.path,
            rai = %req.rai,
            "Request entered handler chain"
        );
        None
    }

    fn after(&self, req: &HandlerRequest, res: &mut HandlerResponse, latency: Duration) {
        info!(
            dispatch_id = %req.dispatch_id,
            rai = %req.rai,
            status = res.status,
            latency_ms = latency.as_millis() as u64,
            "Request completed"
        );
    }
}
