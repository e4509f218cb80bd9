use axum::http::StatusCode;
use service::auth::errors::AuthError;
use thiserror::Error;

/// Map an auth workflow error onto the HTTP status its endpoint returns.
pub fn auth_error_response(e: AuthError) -> (StatusCode, String) {
    let status = match &e {
        AuthError::Validation(_) | AuthError::RoleNotAllowed(_) => StatusCode::BAD_REQUEST,
        AuthError::Conflict => StatusCode::CONFLICT,
        AuthError::NotFound => StatusCode::NOT_FOUND,
        AuthError::Unauthorized | AuthError::TokenError(_) => StatusCode::UNAUTHORIZED,
        AuthError::HashError(_) | AuthError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_map_to_expected_statuses() {
        assert_eq!(auth_error_response(AuthError::Conflict).0, StatusCode::CONFLICT);
        assert_eq!(auth_error_response(AuthError::Unauthorized).0, StatusCode::UNAUTHORIZED);
        assert_eq!(
            auth_error_response(AuthError::Validation("password too short".into())).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            auth_error_response(AuthError::Repository("down".into())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
