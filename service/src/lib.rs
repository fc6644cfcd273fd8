//! Service contains the session and authorization logic of the admin area.
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

pub mod command;
pub mod domain;
pub mod guard;
pub mod infra;

use std::time::Duration;

use derive_more::Debug;
use smart_default::SmartDefault;

#[cfg(doc)]
use self::domain::Session;
#[cfg(doc)]
use infra::Directory;

pub use self::{command::Command, guard::Guard};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [JWT] encoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_encoding_key: jsonwebtoken::EncodingKey,

    /// [JWT] decoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_decoding_key: jsonwebtoken::DecodingKey,

    /// [`Session`] lifetime settings.
    pub session: SessionConfig,

    /// [`Guard`] protecting the admin area.
    pub guard: Guard,
}

impl Config {
    /// Creates a new [`Config`] signing [`Session`]s with the provided
    /// symmetric `secret`.
    #[must_use]
    pub fn with_secret(secret: &[u8]) -> Self {
        Self {
            jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(secret),
            jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(secret),
            session: SessionConfig::default(),
            guard: Guard::default(),
        }
    }
}

/// [`Session`] lifetime settings.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct SessionConfig {
    /// Time a [`Session`] stays valid after being issued.
    #[default(Duration::from_secs(24 * 60 * 60))]
    pub ttl: Duration,
}

impl SessionConfig {
    /// Maximum allowed [`SessionConfig::ttl`].
    ///
    /// Keeps [`Session`] expiration well inside the representable date range.
    pub const MAX_TTL: Duration = Duration::from_secs(366 * 24 * 60 * 60);
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Dir> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Directory`] of the known users.
    directory: Dir,
}

impl<Dir> Service<Dir> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub fn new(config: Config, directory: Dir) -> Self {
        Self { config, directory }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Guard`] of this [`Service`].
    #[must_use]
    pub fn guard(&self) -> &Guard {
        &self.config.guard
    }

    /// Returns [`Directory`] of this [`Service`].
    #[must_use]
    pub fn directory(&self) -> &Dir {
        &self.directory
    }
}
