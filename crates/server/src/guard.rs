//! Server-side access guard for the dashboard areas.
//!
//! The guard extracts the bearer credential (Authorization header, cookie
//! fallback), verifies it, and checks the actor's role against the area's
//! allowed set. Unauthenticated requests are redirected to the login entry
//! point carrying the originally requested path; authenticated requests with
//! the wrong role are silently redirected to that role's own landing page.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::{debug, warn};

use service::auth::domain::AuthUser;
use service::guard::RoleSet;

use crate::routes::auth::ServerState;

/// The verified actor, injected into request extensions for handlers.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

/// Authorization header first, `auth_token` cookie as fallback for browser
/// navigation where no script attaches the header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        return Some(token.to_string());
    }
    let cookie_header = headers
        .get(axum::http::header::COOKIE)
        .and_then(|v| v.to_str().ok())?;
    for part in cookie_header.split(';') {
        if let Some(rest) = part.trim().strip_prefix("auth_token=") {
            if !rest.is_empty() {
                return Some(rest.to_string());
            }
        }
    }
    None
}

pub fn login_redirect(requested_path: &str) -> String {
    format!("/login?next={}", urlencoding::encode(requested_path))
}

/// Route layer gating a dashboard area behind an allowed-role set. Navigation
/// is the only effect; the guard mutates nothing.
pub async fn require_role(
    State((state, allowed)): State<(ServerState, RoleSet)>,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    let Some(token) = bearer_token(req.headers()) else {
        debug!(%path, "no credential, redirecting to login");
        return Redirect::temporary(&login_redirect(&path)).into_response();
    };
    match state.auth.verify_token(&token) {
        Ok(user) if allowed.contains(user.role) => {
            req.extensions_mut().insert(CurrentUser(user));
            next.run(req).await
        }
        Ok(user) => {
            debug!(%path, role = %user.role, "role not allowed here, redirecting home");
            Redirect::temporary(user.role.home_path()).into_response()
        }
        Err(e) => {
            warn!(%path, error = %e, "token verification failed");
            Redirect::temporary(&login_redirect(&path)).into_response()
        }
    }
}
