//! [`Context`]-related definitions.

use axum::{async_trait, extract::FromRequestParts};
use axum_extra::extract::CookieJar;
use service::{
    command::{self, Command as _},
    domain::Session,
    guard::Decision,
};

use crate::{cookie, define_error, Error, Service};

/// Request context.
///
/// Resolves the current [`Session`] of a request once, and exposes the
/// admin area [`Guard`] decision for it.
///
/// [`Guard`]: service::Guard
#[derive(Clone, Debug)]
pub struct Context {
    /// [`Service`] instance.
    service: Service,

    /// [`cookie::Settings`] of the session cookie.
    cookie: cookie::Settings,

    /// Current [`Session`], if any.
    session: Option<Session>,
}

impl Context {
    /// Returns [`Service`] instance of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns [`cookie::Settings`] of this [`Context`].
    #[must_use]
    pub fn cookie(&self) -> &cookie::Settings {
        &self.cookie
    }

    /// Returns the current [`Session`] of this [`Context`], if any.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Returns the current [`Session`] for this [`Context`].
    ///
    /// # Errors
    ///
    /// Errors if the current HTTP request carries no valid [`Session`].
    pub fn current_session(&self) -> Result<&Session, Error> {
        self.session
            .as_ref()
            .ok_or_else(|| AuthError::AuthorizationRequired.into())
    }

    /// Evaluates the admin area [`Guard`] for the `requested` path (and
    /// query) in this [`Context`].
    ///
    /// [`Guard`]: service::Guard
    #[must_use]
    pub fn route(&self, requested: &str) -> Decision {
        self.service
            .guard()
            .decide(self.session.is_some(), requested)
    }

    /// Resolves the [`Session`] carried by the provided request `parts`.
    async fn authenticate(
        service: &Service,
        cookie: &cookie::Settings,
        parts: &http::request::Parts,
    ) -> Option<Session> {
        let token = cookie.token(&CookieJar::from_headers(&parts.headers));
        service
            .execute(command::AuthorizeUserSession { token })
            .await
            .unwrap_or_else(|e| match e {})
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<Self>() {
            return Ok(ctx.clone());
        }

        let service = parts
            .extensions
            .get::<Service>()
            .cloned()
            .ok_or_else(|| Error::internal(&"missing `Service` extension"))?;
        let cookie = parts
            .extensions
            .get::<cookie::Settings>()
            .cloned()
            .ok_or_else(|| {
                Error::internal(&"missing `cookie::Settings` extension")
            })?;

        let session = Self::authenticate(&service, &cookie, parts).await;

        let ctx = Self {
            service,
            cookie,
            session,
        };
        drop(parts.extensions.insert(ctx.clone()));
        Ok(ctx)
    }
}

define_error! {
    enum AuthError {
        #[code = "AUTHORIZATION_REQUIRED"]
        #[status = UNAUTHORIZED]
        #[message = "Authorization required"]
        AuthorizationRequired,
    }
}
