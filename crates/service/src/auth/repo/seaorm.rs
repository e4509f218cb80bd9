use async_trait::async_trait;
use common::types::Role;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

/// `AuthRepository` backed by the sea-orm entities in `models`.
pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

fn to_auth_user(m: models::user::Model) -> Result<AuthUser, AuthError> {
    let role = m.role().map_err(|e| AuthError::Repository(e.to_string()))?;
    Ok(AuthUser { id: m.id, email: m.email, name: m.name, role })
}

#[async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let found = models::user::find_by_email(&self.db, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        found.map(to_auth_user).transpose()
    }

    async fn create_user(&self, email: &str, name: &str, role: Role) -> Result<AuthUser, AuthError> {
        let created = models::user::create(&self.db, email, name, role)
            .await
            .map_err(|e| match e {
                models::errors::ModelError::Validation(msg) => AuthError::Validation(msg),
                other => AuthError::Repository(other.to_string()),
            })?;
        to_auth_user(created)
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let found = models::user_credentials::find_by_user(&self.db, user_id)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(found.map(|c| Credentials {
            user_id: c.user_id,
            password_hash: c.password_hash,
            password_algorithm: c.password_algorithm,
        }))
    }

    async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
        let saved = models::user_credentials::upsert_password(&self.db, user_id, password_hash, &password_algorithm)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(Credentials {
            user_id: saved.user_id,
            password_hash: saved.password_hash,
            password_algorithm: saved.password_algorithm,
        })
    }

    async fn issue_reset_token(&self, user_id: Uuid, ttl_hours: i64) -> Result<String, AuthError> {
        let row = models::password_reset::issue(&self.db, user_id, ttl_hours)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(row.token)
    }

    async fn consume_reset_token(&self, token: &str) -> Result<Option<Uuid>, AuthError> {
        let row = models::password_reset::consume(&self.db, token)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(row.map(|r| r.user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::domain::{LoginInput, RegisterInput};
    use crate::auth::service::{AuthConfig, AuthService};
    use crate::test_support::get_db;
    use std::sync::Arc;

    #[tokio::test]
    async fn register_login_reset_against_db() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let repo = Arc::new(SeaOrmAuthRepository { db });
        let svc = AuthService::new(
            repo,
            AuthConfig { jwt_secret: Some("test-secret".into()), ..AuthConfig::default() },
        );

        let email = format!("svc_{}@example.com", Uuid::new_v4());
        let user = svc
            .register(RegisterInput {
                email: email.clone(),
                name: "Svc User".into(),
                password: "S3curePass!".into(),
                role: Role::Landlord,
            })
            .await?;
        assert_eq!(user.role, Role::Landlord);

        let session = svc
            .login(LoginInput { email: email.clone(), password: "S3curePass!".into(), remember: false })
            .await?;
        assert!(session.token.is_some());

        let token = svc
            .request_password_reset(crate::auth::domain::PasswordResetInput { email: email.clone() })
            .await?
            .expect("reset token");
        svc.reset_password(&token, "FreshPass123").await?;
        let session = svc
            .login(LoginInput { email, password: "FreshPass123".into(), remember: false })
            .await?;
        assert_eq!(session.user.id, user.id);
        Ok(())
    }
}
