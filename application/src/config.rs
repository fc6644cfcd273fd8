//! [`Config`]-related definitions.

use std::time;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use derive_more::{Display, Error};
use secrecy::{ExposeSecret as _, SecretBox, SecretString};
use serde::Deserialize;
use service::domain::user;
use smart_default::SmartDefault;

use crate::cookie;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: Server,

    /// Service configuration.
    pub service: Service,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8080)]
    pub port: u16,

    /// Indicator whether the session cookie is sent over HTTPS only.
    ///
    /// Must be enabled in production.
    pub secure_cookies: bool,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// List of allowed origins.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Service configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Service {
    /// [JWT] secret signing the session tokens.
    ///
    /// [JWT]: https://wikipedia.org/wiki/JSON_Web_Token
    #[default(SecretString::from("secret"))]
    pub jwt_secret: SecretString,

    /// Session configuration.
    pub session: Session,

    /// Admin area configuration.
    pub admin: Admin,

    /// Users allowed to sign into the admin area.
    pub users: Vec<User>,
}

impl Service {
    /// Splits this [`Service`] configuration into the [`service::Config`] and
    /// the [`service::infra::Memory`] directory of its [`User`]s.
    ///
    /// # Errors
    ///
    /// Errors if the [`Session::ttl`] exceeds [`SessionConfig::MAX_TTL`], or
    /// any of the configured [`User`]s is invalid.
    ///
    /// [`SessionConfig::MAX_TTL`]: service::SessionConfig::MAX_TTL
    pub fn into_parts(
        self,
    ) -> Result<(service::Config, service::infra::Memory), InvalidServiceError>
    {
        let Self {
            jwt_secret,
            session: Session { ttl },
            admin:
                Admin {
                    namespace,
                    login_path,
                    landing_path,
                    callback_param,
                    cookie_name: _,
                },
            users,
        } = self;

        if ttl > service::SessionConfig::MAX_TTL {
            return Err(InvalidServiceError::SessionTtl);
        }

        let users = users
            .into_iter()
            .enumerate()
            .map(|(n, u)| {
                u.try_into().map_err(|field| InvalidUserError { n, field })
            })
            .collect::<Result<Vec<service::domain::User>, _>>()
            .map_err(InvalidServiceError::User)?;

        let mut config =
            service::Config::with_secret(jwt_secret.expose_secret().as_bytes());
        config.session.ttl = ttl;
        config.guard = service::Guard {
            namespace,
            login_path,
            landing_path,
            callback_param,
        };

        Ok((config, service::infra::Memory::new(users)))
    }
}

/// Session configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Session {
    /// Time a session stays valid after the login.
    #[default(time::Duration::from_secs(24 * 60 * 60))]
    #[serde(with = "humantime_serde")]
    pub ttl: time::Duration,
}

/// Admin area configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Admin {
    /// Path prefix of the admin area.
    #[default("/admin".to_owned())]
    pub namespace: String,

    /// Path of the login page.
    #[default("/admin/login".to_owned())]
    pub login_path: String,

    /// Path users are sent to after the login.
    #[default("/admin".to_owned())]
    pub landing_path: String,

    /// Query parameter carrying the originally requested path to the login
    /// page.
    #[default("callbackUrl".to_owned())]
    pub callback_param: String,

    /// Name of the cookie carrying the session token.
    #[default("admin-token".to_owned())]
    pub cookie_name: String,
}

impl Config {
    /// Returns [`cookie::Settings`] described by this [`Config`].
    #[must_use]
    pub fn cookie(&self) -> cookie::Settings {
        cookie::Settings {
            name: self.service.admin.cookie_name.clone(),
            secure: self.server.secure_cookies,
            max_age: self.service.session.ttl,
        }
    }
}

/// User allowed to sign into the admin area.
#[derive(Clone, Debug, Deserialize)]
pub struct User {
    /// Unique ID of the user.
    pub id: String,

    /// Email address of the user.
    pub email: String,

    /// Name displayed in the admin area.
    pub name: String,

    /// Plain password of the user.
    pub password: SecretString,

    /// Role of the user (`admin` or `user`).
    pub role: String,
}

impl TryFrom<User> for service::domain::User {
    type Error = &'static str;

    fn try_from(value: User) -> Result<Self, Self::Error> {
        let User {
            id,
            email,
            name,
            password,
            role,
        } = value;

        Ok(Self {
            id: user::Id::new(id).ok_or("id")?,
            email: user::Email::new(email).ok_or("email")?,
            name: user::Name::new(name).ok_or("name")?,
            role: role.parse().map_err(|_| "role")?,
            password: SecretBox::new(Box::new(
                user::Password::new(password.expose_secret()).ok_or("password")?,
            )),
        })
    }
}

/// Error of the [`Service`] configuration being invalid.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum InvalidServiceError {
    /// [`Session::ttl`] is too long.
    #[display("`service.session.ttl` must not exceed 366 days")]
    SessionTtl,

    /// One of the configured [`User`]s is invalid.
    #[display("{_0}")]
    User(InvalidUserError),
}

/// Error of a configured [`User`] being invalid.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`service.users[{n}]` has invalid `{field}`")]
pub struct InvalidUserError {
    /// Index of the invalid [`User`].
    #[error(not(source))]
    pub n: usize,

    /// Name of the invalid field.
    #[error(not(source))]
    pub field: &'static str,
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use secrecy::SecretString;

    use super::{Config, User};

    fn user(email: &str, role: &str) -> User {
        User {
            id: "1".into(),
            email: email.into(),
            name: "Admin".into(),
            password: SecretString::from("admin123"),
            role: role.into(),
        }
    }

    #[test]
    fn splits_service_config() {
        let mut config = Config::default();
        config.service.users = vec![user("admin@institute.test", "admin")];

        let cookie = config.cookie();
        let (svc, dir) = config.service.into_parts().unwrap();

        assert_eq!(dir.len(), 1);
        assert_eq!(svc.session.ttl.as_secs(), 24 * 60 * 60);
        assert_eq!(svc.guard.login_path, "/admin/login");
        assert_eq!(cookie.name, "admin-token");
        assert!(!cookie.secure);
    }

    #[test]
    fn rejects_invalid_users() {
        let mut config = Config::default();
        config.service.users = vec![
            user("admin@institute.test", "ADMIN"),
            user("admin@institute.test", "root"),
        ];

        let err = config.service.into_parts().unwrap_err();

        assert_eq!(err.to_string(), "`service.users[1]` has invalid `role`");

        let mut config = Config::default();
        config.service.users = vec![user("nope", "USER")];

        let err = config.service.into_parts().unwrap_err();

        assert_eq!(err.to_string(), "`service.users[0]` has invalid `email`");
    }

    #[test]
    fn rejects_too_long_session_ttl() {
        let mut config = Config::default();
        config.service.session.ttl =
            Duration::from_secs(400_000 * 366 * 24 * 60 * 60);

        let err = config.service.into_parts().unwrap_err();

        assert_eq!(
            err.to_string(),
            "`service.session.ttl` must not exceed 366 days",
        );

        let mut config = Config::default();
        config.service.session.ttl = Duration::from_secs(366 * 24 * 60 * 60);

        assert!(config.service.into_parts().is_ok());
    }
}
