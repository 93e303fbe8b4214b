//! Eligibility middleware.
//! Annotates each request with the middleware that should run for it.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::matching::SharedRegistry;

/// Names of the middleware eligible for this request, in run order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EligibleMiddleware(pub Vec<String>);

pub async fn annotate_eligible(
    State(registry): State<Arc<SharedRegistry>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let snapshot = registry.load();
    let names: Vec<String> = snapshot
        .eligible(&req)
        .into_iter()
        .map(str::to_string)
        .collect();

    tracing::debug!(
        method = %req.method(),
        path = %req.uri().path(),
        middleware = ?names,
        "Eligible middleware resolved"
    );

    req.extensions_mut().insert(EligibleMiddleware(names));
    next.run(req).await
}
