//! Session cookie definitions.

use std::time::Duration;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use service::domain::user::session;

/// Settings of the cookie carrying a [`session::Token`].
#[derive(Clone, Debug)]
pub struct Settings {
    /// Name of the cookie.
    pub name: String,

    /// Indicator whether the cookie is sent over HTTPS only.
    pub secure: bool,

    /// Lifetime of the cookie in a browser.
    pub max_age: Duration,
}

impl Settings {
    /// Creates a new cookie carrying the provided [`session::Token`].
    #[must_use]
    pub fn issue(&self, token: &session::Token) -> Cookie<'static> {
        Cookie::build((self.name.clone(), token.to_string()))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(
                time::Duration::try_from(self.max_age)
                    .unwrap_or(time::Duration::MAX),
            )
            .build()
    }

    /// Creates a cookie removing the one issued by [`Settings::issue()`].
    #[must_use]
    pub fn removal(&self) -> Cookie<'static> {
        Cookie::build(self.name.clone()).path("/").build()
    }

    /// Extracts a [`session::Token`] from the provided [`CookieJar`], if any.
    #[must_use]
    pub fn token(&self, jar: &CookieJar) -> Option<session::Token> {
        let value = jar.get(&self.name)?.value();
        if value.is_empty() {
            return None;
        }

        // SAFETY: The `session::Token` is verified before being trusted.
        #[expect(unsafe_code, reason = "verified by `AuthorizeUserSession`")]
        let token = unsafe { session::Token::new_unchecked(value.to_owned()) };
        Some(token)
    }
}
