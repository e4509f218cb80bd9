use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sea_orm::DatabaseConnection;
use tracing::debug;

use service::auth::domain::{AuthResponse, AuthUser, LoginInput, PasswordResetInput, PasswordUpdateInput, RegisterInput};
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::AuthService;

use crate::errors::auth_error_response;
use crate::guard::bearer_token;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
    /// Cookie lifetime for logins that asked to be remembered.
    pub remember_days: i64,
}

fn session_cookie(state: &ServerState, token: String, remember: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    if remember {
        cookie.set_max_age(time::Duration::days(state.remember_days));
    }
    cookie
}

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 200, description = "Registered and logged in", body = crate::openapi::AuthResponseDoc), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<RegisterInput>,
) -> Result<(CookieJar, Json<AuthResponse>), (StatusCode, String)> {
    let password = input.password.clone();
    let user = state.auth.register(input).await.map_err(auth_error_response)?;

    // Fresh accounts go straight into a session
    let session = state
        .auth
        .login(LoginInput { email: user.email.clone(), password, remember: false })
        .await
        .map_err(auth_error_response)?;
    let token = session
        .token
        .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "token generation failed".into()))?;

    let jar = jar.add(session_cookie(&state, token.clone(), false));
    Ok((jar, Json(AuthResponse { access_token: token, user: session.user })))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In", body = crate::openapi::AuthResponseDoc), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<AuthResponse>), (StatusCode, String)> {
    let remember = input.remember;
    let session = state.auth.login(input).await.map_err(auth_error_response)?;
    let token = session
        .token
        .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "token generation failed".into()))?;

    let jar = jar.add(session_cookie(&state, token.clone(), remember));
    Ok((jar, Json(AuthResponse { access_token: token, user: session.user })))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 204, description = "Logged Out")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::from(AUTH_COOKIE));
    (jar, StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/auth/me", tag = "auth", responses((status = 200, description = "Current actor"), (status = 401, description = "Unauthorized")))]
pub async fn me(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> Result<Json<AuthUser>, (StatusCode, String)> {
    let token = bearer_token(&headers).ok_or((StatusCode::UNAUTHORIZED, "no auth".to_string()))?;
    let user = state.auth.verify_token(&token).map_err(auth_error_response)?;
    Ok(Json(user))
}

#[utoipa::path(post, path = "/auth/password-reset", tag = "auth", request_body = crate::openapi::PasswordResetRequest, responses((status = 204, description = "Accepted")))]
pub async fn password_reset_request(
    State(state): State<ServerState>,
    Json(input): Json<PasswordResetInput>,
) -> Result<StatusCode, (StatusCode, String)> {
    // Same response whether or not the address is registered
    if let Some(token) = state
        .auth
        .request_password_reset(input)
        .await
        .map_err(auth_error_response)?
    {
        // Handed to the mail pipeline; never echoed in the response
        debug!(token_len = token.len(), "reset token issued");
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/auth/password", tag = "auth", request_body = crate::openapi::PasswordUpdateRequest, responses((status = 204, description = "Password changed"), (status = 401, description = "Unauthorized")))]
pub async fn password_update(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(input): Json<PasswordUpdateInput>,
) -> Result<StatusCode, (StatusCode, String)> {
    let token = bearer_token(&headers).ok_or((StatusCode::UNAUTHORIZED, "no auth".to_string()))?;
    let user = state.auth.verify_token(&token).map_err(auth_error_response)?;
    state
        .auth
        .update_password(user.id, input)
        .await
        .map_err(auth_error_response)?;
    Ok(StatusCode::NO_CONTENT)
}
