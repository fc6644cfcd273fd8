//! [`Session`]-related definitions.

use serde::Serialize;
use service::domain;

/// Signed in user as exposed by the API.
#[derive(Clone, Debug, Serialize)]
pub struct User {
    /// ID of the user.
    pub id: String,

    /// Email address of the user.
    pub email: String,

    /// Display name of the user.
    pub name: String,

    /// Role of the user.
    pub role: domain::user::Role,
}

/// Current session as exposed by the API.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Signed in [`User`].
    pub user: User,

    /// [RFC 3339] date and time when this [`Session`] expires.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub expires_at: String,
}

impl From<&domain::Session> for Session {
    fn from(session: &domain::Session) -> Self {
        Self {
            user: User {
                id: session.user_id.to_string(),
                email: session.email.to_string(),
                name: session.name.to_string(),
                role: session.role,
            },
            expires_at: session.expires_at.to_rfc3339(),
        }
    }
}
