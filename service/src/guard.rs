//! [`Guard`] of the admin area.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use smart_default::SmartDefault;

#[cfg(doc)]
use crate::domain::Session;

/// Policy gating access to the admin namespace.
///
/// The single place deciding whether a request proceeds or gets redirected.
/// Both the HTTP middleware and the in-process request context evaluate it
/// via [`Guard::decide()`].
#[derive(Clone, Debug, SmartDefault)]
pub struct Guard {
    /// Path prefix of the admin namespace.
    #[default("/admin".to_owned())]
    pub namespace: String,

    /// Path of the login page, located inside the [`Guard::namespace`].
    #[default("/admin/login".to_owned())]
    pub login_path: String,

    /// Path of the admin landing page.
    #[default("/admin".to_owned())]
    pub landing_path: String,

    /// Name of the query parameter carrying the originally requested path
    /// to the login page.
    #[default("callbackUrl".to_owned())]
    pub callback_param: String,
}

/// Outcome of a [`Guard`] evaluation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Decision {
    /// Let the request through unmodified.
    Proceed,

    /// Redirect to the login page, remembering the requested path.
    RedirectToLogin {
        /// Originally requested path (with its query, if any).
        callback: String,
    },

    /// Redirect to the admin landing page.
    RedirectToLanding,
}

impl Guard {
    /// Decides what to do with a request of the `requested` path (optionally
    /// followed by a query) depending on whether it carries a valid
    /// [`Session`].
    #[must_use]
    pub fn decide(&self, authenticated: bool, requested: &str) -> Decision {
        let path = requested.split_once('?').map_or(requested, |(p, _)| p);
        let is_login = path == self.login_path;

        if authenticated {
            if is_login {
                Decision::RedirectToLanding
            } else {
                Decision::Proceed
            }
        } else if self.is_protected(path) && !is_login {
            Decision::RedirectToLogin {
                callback: requested.to_owned(),
            }
        } else {
            Decision::Proceed
        }
    }

    /// Returns the location to redirect to for the provided [`Decision`], if
    /// any.
    #[must_use]
    pub fn location(&self, decision: &Decision) -> Option<String> {
        match decision {
            Decision::Proceed => None,
            Decision::RedirectToLanding => Some(self.landing_path.clone()),
            Decision::RedirectToLogin { callback } => Some(format!(
                "{}?{}={}",
                self.login_path,
                encode_component(&self.callback_param),
                encode_component(callback),
            )),
        }
    }

    /// Returns the path to send a freshly signed in user to: the provided
    /// `callback` if it points inside this site, or the landing page
    /// otherwise.
    #[must_use]
    pub fn after_login<'a>(&'a self, callback: Option<&'a str>) -> &'a str {
        callback
            .filter(|c| is_local_path(c))
            .filter(|c| {
                let path = c.split_once('?').map_or(*c, |(p, _)| p);
                path != self.login_path
            })
            .unwrap_or(&self.landing_path)
    }

    /// Checks whether the provided `path` belongs to the admin namespace.
    ///
    /// The namespace is matched on segment boundaries, so `/admin` covers
    /// `/admin/news` but not `/administrator`.
    #[must_use]
    pub fn is_protected(&self, path: &str) -> bool {
        let namespace = self.namespace.trim_end_matches('/');
        path.strip_prefix(namespace)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }
}

/// Checks whether the provided `target` is a path on this site, rather than
/// an absolute or a protocol-relative URL.
fn is_local_path(target: &str) -> bool {
    target.starts_with('/')
        && !target.starts_with("//")
        && !target.starts_with("/\\")
}

/// Characters percent-encoded in a URL query component: everything except
/// the unreserved characters of [RFC 3986].
///
/// [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986#section-2.3
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encodes the provided `value` for usage in a URL query.
fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

#[cfg(test)]
mod spec {
    use super::{encode_component, Decision, Guard};

    #[test]
    fn redirects_anonymous_admin_requests_to_login() {
        let guard = Guard::default();

        assert_eq!(
            guard.decide(false, "/admin/courses"),
            Decision::RedirectToLogin {
                callback: "/admin/courses".into(),
            },
        );
        assert_eq!(
            guard.decide(false, "/admin"),
            Decision::RedirectToLogin {
                callback: "/admin".into(),
            },
        );
    }

    #[test]
    fn keeps_query_in_callback() {
        let guard = Guard::default();
        let decision = guard.decide(false, "/admin/news?page=2&q=a b");

        assert_eq!(
            decision,
            Decision::RedirectToLogin {
                callback: "/admin/news?page=2&q=a b".into(),
            },
        );
        assert_eq!(
            guard.location(&decision).unwrap(),
            "/admin/login?callbackUrl=%2Fadmin%2Fnews%3Fpage%3D2%26q%3Da%20b",
        );
    }

    #[test]
    fn lets_anonymous_users_reach_login_and_public_pages() {
        let guard = Guard::default();

        assert_eq!(guard.decide(false, "/admin/login"), Decision::Proceed);
        assert_eq!(
            guard.decide(false, "/admin/login?callbackUrl=%2Fadmin"),
            Decision::Proceed,
        );
        assert_eq!(guard.decide(false, "/"), Decision::Proceed);
        assert_eq!(guard.decide(false, "/courses/welding"), Decision::Proceed);
        assert_eq!(guard.decide(false, "/administrator"), Decision::Proceed);
    }

    #[test]
    fn sends_authenticated_users_away_from_login() {
        let guard = Guard::default();

        assert_eq!(
            guard.decide(true, "/admin/login"),
            Decision::RedirectToLanding,
        );
        assert_eq!(
            guard.location(&Decision::RedirectToLanding).unwrap(),
            "/admin",
        );
    }

    #[test]
    fn lets_authenticated_users_through() {
        let guard = Guard::default();

        assert_eq!(guard.decide(true, "/admin"), Decision::Proceed);
        assert_eq!(guard.decide(true, "/admin/gallery"), Decision::Proceed);
        assert_eq!(guard.decide(true, "/news"), Decision::Proceed);
        assert_eq!(guard.location(&Decision::Proceed), None);
    }

    #[test]
    fn respects_custom_namespace() {
        let guard = Guard {
            namespace: "/dashboard/".into(),
            login_path: "/dashboard/sign-in".into(),
            landing_path: "/dashboard/home".into(),
            callback_param: "next".into(),
        };

        assert_eq!(guard.decide(false, "/admin"), Decision::Proceed);
        assert_eq!(
            guard
                .location(&guard.decide(false, "/dashboard/users"))
                .unwrap(),
            "/dashboard/sign-in?next=%2Fdashboard%2Fusers",
        );
        assert_eq!(
            guard.decide(true, "/dashboard/sign-in"),
            Decision::RedirectToLanding,
        );
    }

    #[test]
    fn only_follows_local_callbacks_after_login() {
        let guard = Guard::default();

        assert_eq!(guard.after_login(Some("/admin/news")), "/admin/news");
        assert_eq!(guard.after_login(Some("/admin?tab=2")), "/admin?tab=2");
        assert_eq!(guard.after_login(None), "/admin");
        assert_eq!(guard.after_login(Some("https://evil.test")), "/admin");
        assert_eq!(guard.after_login(Some("//evil.test")), "/admin");
        assert_eq!(guard.after_login(Some("/\\evil.test")), "/admin");
        assert_eq!(guard.after_login(Some("/admin/login")), "/admin");
    }

    #[test]
    fn encodes_reserved_characters() {
        assert_eq!(encode_component("AZaz09-._~"), "AZaz09-._~");
        assert_eq!(encode_component("/a?b=c&d#e"), "%2Fa%3Fb%3Dc%26d%23e");
        assert_eq!(encode_component("é"), "%C3%A9");
    }
}
