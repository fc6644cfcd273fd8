//! Application provides HTTP API and pages of the guarded admin area.

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod api;
pub mod args;
pub mod config;
mod context;
pub mod cookie;
pub mod error;
pub mod guard;

use axum::{
    middleware,
    routing::{get, post},
    Extension, Router,
};
// Used in binary.
use axum_client_ip as _;
use tokio as _;
use tower_http as _;
use tracing_subscriber as _;
// Used in integration tests.
#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use tower as _;

pub use self::{
    args::Args,
    config::Config,
    context::Context,
    error::{AsError, Error},
};

/// [`Service`] with filled infrastructure dependencies.
///
/// [`Service`]: service::Service
pub type Service = service::Service<service::infra::Memory>;

/// Builds the [`Router`] serving the admin area and its API.
///
/// Every route passes through the [`guard()`] middleware, so the routes of
/// the admin area are reachable by the signed in users only.
///
/// [`guard()`]: guard::guard
#[must_use]
pub fn router(service: Service, cookie: cookie::Settings) -> Router {
    let policy = service.guard().clone();
    let namespace = policy.namespace.trim_end_matches('/');

    Router::new()
        .route("/healthz", get(api::health))
        .route(
            if namespace.is_empty() { "/" } else { namespace },
            get(api::admin::landing),
        )
        .route(&format!("{namespace}/*rest"), get(api::admin::landing))
        .route(&policy.login_path, get(api::admin::login_page))
        .route("/api/auth/login", post(api::auth::login))
        .route("/api/auth/logout", post(api::auth::logout))
        .route("/api/auth/session", get(api::auth::session))
        .layer(middleware::from_fn(guard::guard))
        .layer(Extension(cookie))
        .layer(Extension(service))
}
