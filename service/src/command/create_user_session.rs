//! [`Command`] for creating a [`Session`].

use std::convert::Infallible;

use common::{
    operations::{By, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use jsonwebtoken::{Algorithm, Header};
use secrecy::{ExposeSecret as _, SecretBox};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::{session::Token, Identity, Password};
use crate::{
    domain::{
        user::{self, session, Session},
        User,
    },
    infra::Directory,
    Service,
};

use super::Command;

/// [`Command`] for creating a [`Session`] by [`User`] credentials.
#[derive(Debug)]
pub struct CreateUserSession {
    /// [`Identity`] of a [`User`].
    pub identity: user::Identity,

    /// [`Password`] of a [`User`].
    pub password: SecretBox<user::Password>,
}

/// Output of [`CreateUserSession`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Token`] of the created [`Session`].
    pub token: session::Token,

    /// Created [`Session`].
    pub session: Session,
}

impl<Dir> Command<CreateUserSession> for Service<Dir>
where
    Dir: for<'l> Directory<
        Select<By<Option<User>, &'l user::Identity>>,
        Ok = Option<User>,
        Err = Infallible,
    >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUserSession { identity, password } = cmd;

        let user = self
            .directory()
            .execute(Select(By::new(&identity)))
            .await
            .unwrap_or_else(|e| match e {})
            .ok_or(E::WrongCredentials)
            .map_err(tracerr::wrap!())?;

        // Unknown `Identity` and wrong `Password` are indistinguishable for
        // the caller.
        if !user.has_password(password.expose_secret()) {
            return Err(tracerr::new!(E::WrongCredentials));
        }

        let claims = session::Claims::issue(
            &user,
            DateTime::now().coerce(),
            self.config().session.ttl,
        );
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.config().jwt_encoding_key,
        )
        .map_err(tracerr::from_and_wrap!(=> E))?;

        // SAFETY: `jsonwebtoken::encode` always returns a valid
        //         `session::Token`.
        #[expect(unsafe_code, reason = "invariants are preserved")]
        let token = unsafe { session::Token::new_unchecked(token) };

        tracing::debug!(
            user.id = %claims.session.user_id,
            expires_at = %claims.session.expires_at.to_rfc3339(),
            "`Session` created"
        );

        Ok(Output {
            token,
            session: claims.session,
        })
    }
}

/// Error of [`CreateUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`jsonwebtoken`] encoding error.
    #[display("Failed to encode a JSON Web Token: {_0}")]
    JsonWebTokenEncodeError(jsonwebtoken::errors::Error),

    /// [`CreateUserSession`] contains wrong credentials.
    #[display("Wrong `User` credentials")]
    WrongCredentials,
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{DateTime, Handler as _};
    use secrecy::SecretBox;

    use crate::{
        domain::{user, User},
        infra::Memory,
        Config, Service,
    };

    use super::{CreateUserSession, ExecutionError};

    fn service() -> Service<Memory> {
        Service::new(
            Config::with_secret(b"test-secret"),
            Memory::new([User {
                id: user::Id::new("1").unwrap(),
                email: user::Email::new("admin@institute.test").unwrap(),
                name: user::Name::new("Admin").unwrap(),
                role: user::Role::Admin,
                password: SecretBox::new(Box::new(
                    user::Password::new("admin123").unwrap(),
                )),
            }]),
        )
    }

    fn cmd(identity: &str, password: &str) -> CreateUserSession {
        CreateUserSession {
            identity: user::Identity::new(identity).unwrap(),
            password: SecretBox::new(Box::new(
                user::Password::new(password).unwrap(),
            )),
        }
    }

    #[tokio::test]
    async fn issues_session_for_valid_credentials() {
        let before = DateTime::now();

        let out = service().execute(cmd("1", "admin123")).await.unwrap();

        assert_eq!(out.session.user_id.as_ref(), "1");
        assert_eq!(out.session.email.as_ref(), "admin@institute.test");
        assert_eq!(out.session.name.as_ref(), "Admin");
        assert_eq!(out.session.role, user::Role::Admin);
        assert_eq!(out.token.as_ref().split('.').count(), 3);

        let ttl = Duration::from_secs(24 * 60 * 60);
        let expires_at = out.session.expires_at.coerce::<()>();
        assert!(expires_at > before + ttl - Duration::from_secs(1));
        assert!(expires_at <= DateTime::now() + ttl);
    }

    #[tokio::test]
    async fn accepts_email_as_identity() {
        let out = service()
            .execute(cmd("admin@institute.test", "admin123"))
            .await
            .unwrap();

        assert_eq!(out.session.user_id.as_ref(), "1");
    }

    #[tokio::test]
    async fn does_not_tell_unknown_identity_from_wrong_password() {
        let unknown = service()
            .execute(cmd("nobody", "admin123"))
            .await
            .unwrap_err();
        let wrong = service().execute(cmd("1", "admin")).await.unwrap_err();

        assert!(matches!(unknown.as_ref(), ExecutionError::WrongCredentials));
        assert!(matches!(wrong.as_ref(), ExecutionError::WrongCredentials));
        assert_eq!(unknown.as_ref().to_string(), wrong.as_ref().to_string());
    }
}
