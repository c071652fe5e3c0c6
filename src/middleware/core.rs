use std::time::Duration;

use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// Cross-cutting hook attached to a [`crate::tree::Group`] and inherited by
/// every descendant endpoint.
///
/// `before` runs ahead of the handler chain and may short-circuit it by
/// returning a response; `after` observes the final response and the
/// measured handler latency.
pub trait Middleware: Send + Sync {
    fn before(&self, _req: &HandlerRequest) -> Option<HandlerResponse> {
        None
    }
    fn after(&self, _req: &HandlerRequest, _res: &mut HandlerResponse, _latency: Duration) {}
}
