//! Middleware enforcing the admin area [`Guard`].
//!
//! [`Guard`]: service::Guard

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse as _, Redirect, Response},
};

use crate::Context;

/// Redirects the request away if the admin area [`Guard`] says so, or passes
/// it through otherwise.
///
/// [`Guard`]: service::Guard
pub async fn guard(ctx: Context, req: Request, next: Next) -> Response {
    let requested = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path(), |pq| pq.as_str())
        .to_owned();

    let decision = ctx.route(&requested);
    match ctx.service().guard().location(&decision) {
        Some(location) => {
            tracing::debug!(
                requested = %requested,
                location = %location,
                "redirecting by the admin area guard"
            );
            Redirect::temporary(&location).into_response()
        }
        None => next.run(req).await,
    }
}
