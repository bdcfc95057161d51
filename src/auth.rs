use std::time::Duration;

use actix_web::{
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    error::{ErrorUnauthorized, InternalError},
    http::header,
    middleware::Next,
    rt::time::timeout,
    web, Error, HttpMessage, HttpRequest, HttpResponse,
};
use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web_httpauth::extractors::basic::BasicAuth;
use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;
use uuid::Uuid;

use crate::{models::UserRow, state::AppState};

pub const AUTH_REALM: &str = "Refine Studio";
const LOGOUT_COOKIE: &str = "refine_logged_out";

// Upper bound on the credential lookup; expiry surfaces as the session
// trouble page.
const SESSION_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub display_name: String,
}

pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed_hash = PasswordHash::new(password_hash);
    match parsed_hash {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

#[derive(Clone, Copy, Debug)]
pub enum SessionCheckError {
    Query,
    Timeout,
}

/// Verifies credentials against the `users` table.
///
/// `Ok(None)` means the credentials were rejected; `Err` means the check
/// itself could not complete (query failure or timeout).
pub async fn authenticate_credentials(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<Option<AuthUser>, SessionCheckError> {
    let lookup = sqlx::query_as::<_, UserRow>(
        r#"SELECT id, email, display_name, password_hash, active, created_at
           FROM users
           WHERE email = ? AND active = 1
           LIMIT 1"#,
    )
    .bind(email)
    .fetch_optional(&state.db);

    let user = match timeout(SESSION_CHECK_TIMEOUT, lookup).await {
        Ok(Ok(user)) => user,
        Ok(Err(err)) => {
            log::error!("Session check failed for {email}: {err}");
            return Err(SessionCheckError::Query);
        }
        Err(_) => {
            log::error!("Session check timed out for {email}");
            return Err(SessionCheckError::Timeout);
        }
    };

    let user = match user {
        Some(user) => user,
        None => return Ok(None),
    };

    if !verify_password(password, &user.password_hash) {
        return Ok(None);
    }

    Ok(Some(AuthUser {
        id: user.id,
        email: user.email,
        display_name: user.display_name,
    }))
}

pub async fn admin_validator(
    req: ServiceRequest,
    credentials: BasicAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let state = match req.app_data::<web::Data<AppState>>() {
        Some(state) => state.clone(),
        None => return Err((ErrorUnauthorized("Unauthorized"), req)),
    };

    let email = credentials.user_id();
    let password = credentials.password().unwrap_or_default();

    match authenticate_credentials(&state, email, password).await {
        Ok(Some(user)) => {
            req.extensions_mut().insert(user);
            Ok(req)
        }
        Ok(None) => Err((ErrorUnauthorized("Unauthorized"), req)),
        Err(_) => {
            let error =
                InternalError::from_response("session check failed", session_error_response());
            Err((error.into(), req))
        }
    }
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn logout_cookie(req: &HttpRequest) -> Cookie<'static> {
    let mut builder = Cookie::build(LOGOUT_COOKIE, "1")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::days(365));
    if req.connection_info().scheme() == "https" {
        builder = builder.secure(true);
    }
    builder.finish()
}

pub fn clear_logout_cookie(req: &HttpRequest) -> Cookie<'static> {
    let mut builder = Cookie::build(LOGOUT_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(0));
    if req.connection_info().scheme() == "https" {
        builder = builder.secure(true);
    }
    builder.finish()
}

pub fn is_logged_out(req: &HttpRequest) -> bool {
    req.cookie(LOGOUT_COOKIE).is_some()
}

pub async fn logout_guard<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<BoxBody>, Error>
where
    B: actix_web::body::MessageBody + 'static,
{
    if is_logged_out(req.request()) {
        let body = format!(
            "{}{}{}",
            PANEL_HEAD.replace("__TITLE__", "Logged out"),
            r#"      <h1>You're logged out</h1>
      <p>Your session has been closed.</p>
      <p><a href="/login?next=/admin/dashboard">Log in again</a> or <a href="/">return to the website</a>.</p>"#,
            PANEL_FOOT,
        );
        let response = HttpResponse::Unauthorized()
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .content_type("text/html; charset=utf-8")
            .body(body);
        return Ok(req.into_response(response));
    }

    let res = next.call(req).await?;
    Ok(res.map_into_boxed_body())
}

// The one place failure detail reaches the user: shown when the session
// check itself breaks, with a manual retry link.
pub fn session_error_response() -> HttpResponse {
    let body = format!(
        "{}{}{}",
        PANEL_HEAD.replace("__TITLE__", "Session problem"),
        r#"      <h1>We couldn't verify your session</h1>
      <p>The admin panel couldn't reach its data store to check your login.
         This is usually temporary.</p>
      <ul>
        <li>Wait a moment, then <a href="/admin/dashboard">try again</a>.</li>
        <li>If the problem persists, contact your administrator.</li>
      </ul>
      <p><a href="/">Return to the website</a></p>"#,
        PANEL_FOOT,
    );
    HttpResponse::InternalServerError()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .content_type("text/html; charset=utf-8")
        .body(body)
}

// Auth panels are self-contained documents, not askama templates.
const PANEL_HEAD: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>__TITLE__</title>
    <style>
      body {
        font-family: system-ui, -apple-system, sans-serif;
        background: #f5f5f4;
        color: #1c1917;
        padding: 48px 20px;
      }
      .card {
        max-width: 520px;
        margin: 0 auto;
        background: #ffffff;
        border-radius: 12px;
        padding: 32px;
        box-shadow: 0 12px 32px rgba(28, 25, 23, 0.12);
      }
      a {
        color: #1c1917;
        text-decoration: underline;
        font-weight: 600;
      }
    </style>
  </head>
  <body>
    <div class="card">
"#;

const PANEL_FOOT: &str = r#"
    </div>
  </body>
</html>"#;
