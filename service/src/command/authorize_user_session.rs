//! [`Command`] for authorizing a [`Session`].

use std::convert::Infallible;

use common::DateTime;
use derive_more::{Display, Error, From};
use jsonwebtoken::{Algorithm, Validation};

use crate::{
    domain::user::{session, Session},
    Service,
};

use super::Command;

/// [`Command`] for authorizing a [`Session`] by its [`session::Token`].
///
/// Resolves into [`None`] whenever there is no valid [`Session`]: the
/// [`session::Token`] is absent, malformed, signed with another key or
/// expired. The exact reason is only logged.
#[derive(Clone, Debug, From)]
pub struct AuthorizeUserSession {
    /// [`Session`] token to authorize, if any.
    pub token: Option<session::Token>,
}

impl<Dir> Command<AuthorizeUserSession> for Service<Dir> {
    type Ok = Option<Session>;
    type Err = Infallible;

    async fn execute(
        &self,
        cmd: AuthorizeUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        let AuthorizeUserSession { token } = cmd;

        let Some(token) = token else {
            return Ok(None);
        };

        Ok(self
            .verify(&token, DateTime::now())
            .inspect_err(|e| tracing::debug!("`Session` rejected: {e}"))
            .ok())
    }
}

impl<Dir> Service<Dir> {
    /// Verifies the provided [`session::Token`] at the provided [`DateTime`].
    ///
    /// # Errors
    ///
    /// Errors if the [`session::Token`] doesn't carry a valid [`Session`].
    fn verify(
        &self,
        token: &session::Token,
        now: DateTime,
    ) -> Result<Session, Rejection> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let session = jsonwebtoken::decode::<session::Claims>(
            token.as_ref(),
            &self.config().jwt_decoding_key,
            &validation,
        )?
        .claims
        .session;

        // The payload carries its own expiry, which is checked separately
        // from the `exp` claim.
        if session.is_expired_at(now) {
            return Err(Rejection::Expired);
        }

        Ok(session)
    }
}

/// Reason of a [`session::Token`] being rejected.
#[derive(Debug, Display, Error, From)]
enum Rejection {
    /// [`jsonwebtoken`] decoding error: malformed [`session::Token`], invalid
    /// signature or expired `exp` claim.
    #[display("Failed to decode a JSON Web Token: {_0}")]
    Decode(jsonwebtoken::errors::Error),

    /// [`Session`] payload is expired.
    #[display("`Session` is expired")]
    Expired,
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{DateTime, Handler as _};
    use jsonwebtoken::{Algorithm, EncodingKey, Header};
    use secrecy::SecretBox;

    use crate::{
        command::CreateUserSession,
        domain::{
            user::{self, session},
            User,
        },
        infra::Memory,
        Config, Service,
    };

    use super::AuthorizeUserSession;

    const SECRET: &[u8] = b"test-secret";

    fn user() -> User {
        User {
            id: user::Id::new("7").unwrap(),
            email: user::Email::new("editor@institute.test").unwrap(),
            name: user::Name::new("Editor").unwrap(),
            role: user::Role::User,
            password: SecretBox::new(Box::new(
                user::Password::new("editor").unwrap(),
            )),
        }
    }

    fn service() -> Service<Memory> {
        Service::new(Config::with_secret(SECRET), Memory::new([user()]))
    }

    fn sign(claims: &session::Claims, secret: &[u8]) -> session::Token {
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap();
        #[expect(unsafe_code, reason = "test token")]
        let token = unsafe { session::Token::new_unchecked(token) };
        token
    }

    async fn authorize(
        svc: &Service<Memory>,
        token: Option<session::Token>,
    ) -> Option<user::Session> {
        svc.execute(AuthorizeUserSession { token }).await.unwrap()
    }

    #[tokio::test]
    async fn recovers_issued_session() {
        let svc = service();
        let out = svc
            .execute(CreateUserSession {
                identity: user::Identity::new("7").unwrap(),
                password: SecretBox::new(Box::new(
                    user::Password::new("editor").unwrap(),
                )),
            })
            .await
            .unwrap();

        let session = authorize(&svc, Some(out.token)).await.unwrap();

        assert_eq!(session, out.session);
        assert_eq!(session.user_id.as_ref(), "7");
        assert_eq!(session.email.as_ref(), "editor@institute.test");
        assert_eq!(session.name.as_ref(), "Editor");
        assert_eq!(session.role, user::Role::User);
    }

    #[tokio::test]
    async fn rejects_absent_token() {
        assert!(authorize(&service(), None).await.is_none());
    }

    #[tokio::test]
    async fn rejects_malformed_token() {
        #[expect(unsafe_code, reason = "test token")]
        let token = unsafe { session::Token::new_unchecked("garbage".into()) };

        assert!(authorize(&service(), Some(token)).await.is_none());
    }

    #[tokio::test]
    async fn rejects_token_after_expiry() {
        let issued_at = DateTime::now() - Duration::from_secs(25 * 60 * 60);
        let claims = session::Claims::issue(
            &user(),
            issued_at.coerce(),
            Duration::from_secs(24 * 60 * 60),
        );

        let token = sign(&claims, SECRET);

        assert!(authorize(&service(), Some(token)).await.is_none());
    }

    #[tokio::test]
    async fn rejects_expired_payload_with_valid_exp_claim() {
        let mut claims = session::Claims::issue(
            &user(),
            DateTime::now().coerce(),
            Duration::from_secs(60 * 60),
        );
        claims.session.expires_at =
            (DateTime::now() - Duration::from_secs(1)).coerce();

        let token = sign(&claims, SECRET);

        assert!(authorize(&service(), Some(token)).await.is_none());
    }

    #[tokio::test]
    async fn rejects_token_signed_with_another_key() {
        let claims = session::Claims::issue(
            &user(),
            DateTime::now().coerce(),
            Duration::from_secs(60 * 60),
        );

        let token = sign(&claims, b"another-secret");

        assert!(authorize(&service(), Some(token)).await.is_none());
    }

    #[tokio::test]
    async fn rejects_token_with_flipped_signature_byte() {
        let claims = session::Claims::issue(
            &user(),
            DateTime::now().coerce(),
            Duration::from_secs(60 * 60),
        );
        let token = sign(&claims, SECRET);

        let mut bytes = token.as_ref().as_bytes().to_vec();
        let last = bytes.len() - 2;
        bytes[last] = if bytes[last] == b'A' { b'B' } else { b'A' };
        #[expect(unsafe_code, reason = "test token")]
        let forged = unsafe {
            session::Token::new_unchecked(String::from_utf8(bytes).unwrap())
        };

        assert!(authorize(&service(), Some(token)).await.is_some());
        assert!(authorize(&service(), Some(forged)).await.is_none());
    }

    #[test]
    fn signs_redundant_expiry_claims() {
        let issued_at = DateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let claims = session::Claims::issue(
            &user(),
            issued_at.coerce(),
            Duration::from_secs(24 * 60 * 60),
        );

        assert_eq!(
            serde_json::to_value(&claims).unwrap(),
            serde_json::json!({
                "id": "7",
                "email": "editor@institute.test",
                "name": "Editor",
                "role": "USER",
                "expiresAt": "2023-11-15T22:13:20Z",
                "iat": 1_700_000_000,
                "exp": 1_700_086_400,
            }),
        );
    }
}
