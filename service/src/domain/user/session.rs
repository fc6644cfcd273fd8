//! [`Session`] definitions.

use std::time::Duration;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display};
use serde::{Deserialize, Serialize};

use crate::domain::{user, User};

/// Verified identity of a [`User`] with an absolute expiry.
///
/// A [`Session`] carries everything the admin area needs to know about the
/// signed in [`User`], except its [`user::Password`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// ID of the [`User`] this [`Session`] belongs to.
    #[serde(rename = "id")]
    pub user_id: user::Id,

    /// [`user::Email`] of the [`User`] this [`Session`] belongs to.
    pub email: user::Email,

    /// Display [`user::Name`] of the [`User`] this [`Session`] belongs to.
    pub name: user::Name,

    /// [`user::Role`] of the [`User`] this [`Session`] belongs to.
    pub role: user::Role,

    /// [`DateTime`] when this [`Session`] expires.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub expires_at: ExpirationDateTime,
}

impl Session {
    /// Creates a new [`Session`] of the provided [`User`] expiring at the
    /// provided [`DateTime`].
    #[must_use]
    pub fn new(user: &User, expires_at: ExpirationDateTime) -> Self {
        Self {
            user_id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            expires_at,
        }
    }

    /// Checks whether this [`Session`] is expired at the provided
    /// [`DateTime`].
    #[must_use]
    pub fn is_expired_at<Of: ?Sized>(&self, at: DateTimeOf<Of>) -> bool {
        self.expires_at <= at.coerce()
    }
}

/// Claims signed into a [`Token`].
///
/// `exp` duplicates [`Session::expires_at`], so that the signature
/// verification rejects expired [`Token`]s on its own.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Claims {
    /// [`Session`] payload.
    #[serde(flatten)]
    pub session: Session,

    /// [`DateTime`] when the [`Token`] was issued.
    #[serde(with = "common::datetime::serde::unix_timestamp")]
    pub iat: IssuanceDateTime,

    /// [`DateTime`] when the [`Token`] expires.
    #[serde(with = "common::datetime::serde::unix_timestamp")]
    pub exp: ExpirationDateTime,
}

impl Claims {
    /// Issues new [`Claims`] for the provided [`User`] at the provided
    /// [`DateTime`], valid during the provided `ttl`.
    ///
    /// Both timestamps are truncated to whole seconds, so that the payload
    /// expiry is never later than the `exp` claim.
    #[must_use]
    pub fn issue(
        user: &User,
        issued_at: IssuanceDateTime,
        ttl: Duration,
    ) -> Self {
        let iat = issued_at.truncate_to_seconds();
        let exp = (iat + ttl).coerce();
        Self {
            session: Session::new(user, exp),
            iat,
            exp,
        }
    }
}

/// Signed [`Claims`] in a [JWT] compact serialization.
///
/// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct Token(String);

impl Token {
    /// Creates a new [`Token`] without checking its contents.
    ///
    /// # Safety
    ///
    /// The provided `token` must be a valid [`Token`] representation.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(token: String) -> Self {
        Self(token)
    }
}

/// [`DateTime`] of a [`Session`] issuance.
pub type IssuanceDateTime = DateTimeOf<(Session, unit::Issuance)>;

/// [`DateTime`] of a [`Session`] expiration.
pub type ExpirationDateTime = DateTimeOf<(Session, unit::Expiration)>;
