//! HTTP API definitions.

pub mod admin;
pub mod auth;
pub mod session;

/// Liveness probe.
#[expect(clippy::unused_async, reason = "`async` is required by `axum`")]
pub async fn health() -> &'static str {
    "OK"
}
