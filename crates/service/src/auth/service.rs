use std::sync::Arc;

use argon2::{password_hash::{PasswordHasher, PasswordVerifier, SaltString}, Argon2, PasswordHash};
use common::types::Role;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{AuthSession, AuthUser, LoginInput, PasswordResetInput, PasswordUpdateInput, RegisterInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub password_algorithm: String,
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: None, password_algorithm: "argon2".into(), token_ttl_hours: 12 }
    }
}

/// Bearer token claims. The role rides inside the token so route guards can
/// authorize without a database round trip.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub uid: String,
    pub name: String,
    pub role: Role,
    pub exp: usize,
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new user with a hashed password.
    ///
    /// Only self-registerable roles are accepted; ADMIN accounts are
    /// provisioned out of band.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use common::types::Role;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::default());
    /// let input = RegisterInput { email: "user@example.com".into(), name: "Test".into(), password: "Secret123".into(), role: Role::Tenant };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.role, Role::Tenant);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email, role = %input.role))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        if input.password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        if !input.role.is_self_registerable() {
            return Err(AuthError::RoleNotAllowed(input.role.to_string()));
        }
        if let Some(existing) = self.repo.find_user_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let user = self.repo.create_user(&input.email, &input.name, input.role).await?;
        let hash = self.hash_password(&input.password)?;
        let _cred = self.repo.upsert_password(user.id, hash, self.cfg.password_algorithm.clone()).await?;
        info!(user_id = %user.id, email = %user.email, role = %user.role, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and optionally issue a bearer token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use common::types::Role;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: Some("secret".into()), ..AuthConfig::default() });
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { email: "u@e.com".into(), name: "N".into(), password: "Passw0rd".into(), role: Role::Landlord }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into(), remember: false })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(session.token.is_some());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let mut token = None;
        if let Some(secret) = &self.cfg.jwt_secret {
            let exp = (chrono::Utc::now() + chrono::Duration::hours(self.cfg.token_ttl_hours)).timestamp() as usize;
            let claims = Claims {
                sub: user.email.clone(),
                uid: user.id.to_string(),
                name: user.name.clone(),
                role: user.role,
                exp,
            };
            token = Some(
                encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
                    .map_err(|e| AuthError::TokenError(e.to_string()))?,
            );
        }

        info!(user_id = %user.id, role = %user.role, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    /// Decode and validate a bearer token back into the actor it names.
    pub fn verify_token(&self, token: &str) -> Result<AuthUser, AuthError> {
        let secret = self.cfg.jwt_secret.as_ref().ok_or_else(|| AuthError::TokenError("no signing secret configured".into()))?;
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        let id = data.claims.uid.parse::<Uuid>().map_err(|e| AuthError::TokenError(e.to_string()))?;
        Ok(AuthUser { id, email: data.claims.sub, name: data.claims.name, role: data.claims.role })
    }

    /// Issue a reset token for the address, if registered. The `Ok(None)`
    /// path for unknown addresses keeps the endpoint from leaking which
    /// emails exist.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn request_password_reset(&self, input: PasswordResetInput) -> Result<Option<String>, AuthError> {
        let Some(user) = self.repo.find_user_by_email(&input.email).await? else {
            debug!("reset requested for unknown address");
            return Ok(None);
        };
        let token = self.repo.issue_reset_token(user.id, self.cfg.token_ttl_hours).await?;
        info!(user_id = %user.id, "password_reset_issued");
        Ok(Some(token))
    }

    /// Complete a reset: consume the token and store the new hash.
    #[instrument(skip(self, token, new_password))]
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        if new_password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        let user_id = self.repo
            .consume_reset_token(token)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        let hash = self.hash_password(new_password)?;
        self.repo.upsert_password(user_id, hash, self.cfg.password_algorithm.clone()).await?;
        info!(%user_id, "password_reset_completed");
        Ok(())
    }

    /// Change the password of an authenticated user after checking the old one.
    #[instrument(skip(self, input))]
    pub async fn update_password(&self, user_id: Uuid, input: PasswordUpdateInput) -> Result<(), AuthError> {
        if input.new_password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        let cred = self.repo
            .get_credentials(user_id)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.old_password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }
        let hash = self.hash_password(&input.new_password)?;
        self.repo.upsert_password(user_id, hash, self.cfg.password_algorithm.clone()).await?;
        info!(%user_id, "password_updated");
        Ok(())
    }

    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc() -> AuthService<MockAuthRepository> {
        AuthService::new(
            Arc::new(MockAuthRepository::default()),
            AuthConfig { jwt_secret: Some("test-secret".into()), ..AuthConfig::default() },
        )
    }

    fn register_input(role: Role) -> RegisterInput {
        RegisterInput {
            email: "a@b.com".into(),
            name: "John Doe".into(),
            password: "Password123!".into(),
            role,
        }
    }

    #[tokio::test]
    async fn register_then_login_yields_role_and_token() {
        let svc = svc();
        let user = svc.register(register_input(Role::Tenant)).await.unwrap();
        assert_eq!(user.role, Role::Tenant);

        let session = svc
            .login(LoginInput { email: "a@b.com".into(), password: "Password123!".into(), remember: false })
            .await
            .unwrap();
        assert_eq!(session.user.role, Role::Tenant);
        let token = session.token.unwrap();
        assert!(!token.is_empty());

        let verified = svc.verify_token(&token).unwrap();
        assert_eq!(verified.id, user.id);
        assert_eq!(verified.role, Role::Tenant);
    }

    #[tokio::test]
    async fn admin_cannot_self_register() {
        let svc = svc();
        let err = svc.register(register_input(Role::Admin)).await.unwrap_err();
        assert!(matches!(err, AuthError::RoleNotAllowed(_)));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let svc = svc();
        svc.register(register_input(Role::Landlord)).await.unwrap();
        let err = svc.register(register_input(Role::Tenant)).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let svc = svc();
        svc.register(register_input(Role::Tenant)).await.unwrap();
        let err = svc
            .login(LoginInput { email: "a@b.com".into(), password: "not-the-one".into(), remember: false })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn reset_flow_replaces_password() {
        let svc = svc();
        svc.register(register_input(Role::Tenant)).await.unwrap();

        let token = svc
            .request_password_reset(PasswordResetInput { email: "a@b.com".into() })
            .await
            .unwrap()
            .expect("token for known address");
        svc.reset_password(&token, "BrandNewPass1").await.unwrap();

        // Old password no longer works, new one does
        assert!(svc
            .login(LoginInput { email: "a@b.com".into(), password: "Password123!".into(), remember: false })
            .await
            .is_err());
        assert!(svc
            .login(LoginInput { email: "a@b.com".into(), password: "BrandNewPass1".into(), remember: false })
            .await
            .is_ok());

        // Token is one-shot
        assert!(svc.reset_password(&token, "AnotherPass1").await.is_err());
    }

    #[tokio::test]
    async fn reset_for_unknown_address_is_silent() {
        let svc = svc();
        let out = svc
            .request_password_reset(PasswordResetInput { email: "nobody@example.com".into() })
            .await
            .unwrap();
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn update_password_checks_old_one() {
        let svc = svc();
        let user = svc.register(register_input(Role::Landlord)).await.unwrap();

        let err = svc
            .update_password(user.id, PasswordUpdateInput { old_password: "wrong".into(), new_password: "NewPassword1".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));

        svc.update_password(user.id, PasswordUpdateInput { old_password: "Password123!".into(), new_password: "NewPassword1".into() })
            .await
            .unwrap();
        assert!(svc
            .login(LoginInput { email: "a@b.com".into(), password: "NewPassword1".into(), remember: false })
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn expired_tokens_are_rejected() {
        let svc = AuthService::new(
            Arc::new(MockAuthRepository::default()),
            AuthConfig { jwt_secret: Some("test-secret".into()), token_ttl_hours: -1, ..AuthConfig::default() },
        );
        svc.register(register_input(Role::Tenant)).await.unwrap();
        let session = svc
            .login(LoginInput { email: "a@b.com".into(), password: "Password123!".into(), remember: false })
            .await
            .unwrap();
        let err = svc.verify_token(&session.token.unwrap()).unwrap_err();
        assert!(matches!(err, AuthError::TokenError(_)));
    }
}
