//! Authentication endpoints of the admin area.

use std::collections::HashMap;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query,
    },
    Json,
};
use axum_extra::extract::CookieJar;
use secrecy::{ExposeSecret as _, SecretBox, SecretString};
use serde::{Deserialize, Serialize};
use service::{
    command::{self, create_user_session},
    domain::user,
    Command as _,
};

use crate::{api, define_error, AsError, Context, Error};

/// Credentials submitted to the [`login`] endpoint.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    /// ID or email address of the user.
    pub identity: String,

    /// Password of the user.
    pub password: SecretString,
}

/// Result of a successful [`login`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    /// Signed in user.
    pub user: api::session::User,

    /// [RFC 3339] date and time when the created session expires.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub expires_at: String,

    /// Path the client should navigate to next.
    pub redirect_to: String,
}

/// Signs a user in with the provided [`Credentials`], and sets the session
/// cookie.
///
/// # Errors
///
/// Possible error codes:
/// - `BAD_REQUEST` - malformed request;
/// - `INVALID_CREDENTIALS` - provided credentials don't match any user.
#[tracing::instrument(skip_all, fields(http.handler = "login"))]
pub async fn login(
    ctx: Context,
    jar: CookieJar,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
    credentials: Result<Json<Credentials>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginResult>), Error> {
    let Query(query) = query.map_err(AsError::into_error)?;
    let Json(Credentials { identity, password }) =
        credentials.map_err(AsError::into_error)?;

    let (Some(identity), Some(password)) = (
        user::Identity::new(&identity),
        user::Password::new(password.expose_secret()),
    ) else {
        tracing::info!("login rejected: blank credentials");
        return Err(LoginError::InvalidCredentials.into());
    };

    let output = ctx
        .service()
        .execute(command::CreateUserSession {
            identity: identity.clone(),
            password: SecretBox::new(Box::new(password)),
        })
        .await
        .inspect_err(|e| {
            tracing::info!(identity = %identity, "login rejected: {e}");
        })
        .map_err(AsError::into_error)?;

    tracing::info!(user.id = %output.session.user_id, "signed in");

    let guard = ctx.service().guard();
    let redirect_to = guard
        .after_login(
            query.get(&guard.callback_param).map(String::as_str),
        )
        .to_owned();

    let session = api::session::Session::from(&output.session);
    Ok((
        jar.add(ctx.cookie().issue(&output.token)),
        Json(LoginResult {
            user: session.user,
            expires_at: session.expires_at,
            redirect_to,
        }),
    ))
}

/// Signs the current user out by removing the session cookie.
///
/// There is no server-side state to invalidate, so this always succeeds.
#[expect(clippy::unused_async, reason = "`async` is required by `axum`")]
pub async fn logout(
    ctx: Context,
    jar: CookieJar,
) -> (CookieJar, http::StatusCode) {
    if let Some(session) = ctx.session() {
        tracing::info!(user.id = %session.user_id, "signed out");
    }
    (jar.remove(ctx.cookie().removal()), http::StatusCode::NO_CONTENT)
}

/// Returns the current session.
///
/// # Errors
///
/// Possible error codes:
/// - `AUTHORIZATION_REQUIRED` - the request carries no valid session.
#[expect(clippy::unused_async, reason = "`async` is required by `axum`")]
pub async fn session(ctx: Context) -> Result<Json<api::session::Session>, Error> {
    ctx.current_session()
        .map(|s| Json(api::session::Session::from(s)))
}

define_error! {
    enum LoginError {
        #[code = "INVALID_CREDENTIALS"]
        #[status = UNAUTHORIZED]
        #[message = "Invalid credentials"]
        InvalidCredentials,
    }
}

impl AsError for create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::JsonWebTokenEncodeError(_) => None,
            Self::WrongCredentials => Some(LoginError::InvalidCredentials.into()),
        }
    }
}
