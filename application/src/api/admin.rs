//! Pages of the admin area.

use axum::{response::Html, Json};
use serde::Serialize;

use crate::{api, Context, Error};

/// Admin landing page.
#[derive(Debug, Serialize)]
pub struct Landing {
    /// Greeting of the signed in user.
    pub greeting: String,

    /// Current session.
    pub session: api::session::Session,
}

/// Renders the admin landing page for the signed in user.
///
/// # Errors
///
/// Possible error codes:
/// - `AUTHORIZATION_REQUIRED` - the request carries no valid session.
#[expect(clippy::unused_async, reason = "`async` is required by `axum`")]
pub async fn landing(ctx: Context) -> Result<Json<Landing>, Error> {
    let session = ctx.current_session()?;
    Ok(Json(Landing {
        greeting: format!("Welcome, {}", session.name),
        session: session.into(),
    }))
}

/// Renders the login page of the admin area.
#[expect(clippy::unused_async, reason = "`async` is required by `axum`")]
pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

/// Login form submitting credentials to the login endpoint and following
/// the returned redirect.
const LOGIN_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Admin login</title></head>
<body>
<form id="login">
  <input name="identity" placeholder="ID or email" required>
  <input name="password" type="password" placeholder="Password" required>
  <button type="submit">Sign in</button>
  <p id="error" hidden>Invalid credentials</p>
</form>
<script>
document.getElementById("login").addEventListener("submit", async (e) => {
  e.preventDefault();
  const form = new FormData(e.target);
  const res = await fetch("/api/auth/login" + location.search, {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify(Object.fromEntries(form)),
  });
  if (res.ok) {
    location.assign((await res.json()).redirectTo);
  } else {
    document.getElementById("error").hidden = false;
  }
});
</script>
</body>
</html>
"#;
