//! HTTP client for the auth boundary.
//!
//! `AuthClient` is the single writer of its `SessionStore`: it validates
//! forms locally, submits them, stores the bearer credential, and publishes
//! the resulting `AuthState`. Submissions that fail local validation never
//! reach the network; a submission while another is in flight is ignored;
//! completions arriving after a logout are discarded by the store's epoch.

use std::sync::Arc;
use std::sync::RwLock;

use tracing::{debug, instrument, warn};

use crate::auth::domain::{AuthResponse, AuthUser, LoginInput, RegisterInput};
use crate::session::SessionStore;
use crate::validation::{self, FieldError, LoginCredentials, RegisterCredentials};

const GENERIC_SERVICE_ERROR: &str = "service unavailable, please try again";

pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<SessionStore>,
    bearer: RwLock<Option<String>>,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>, store: Arc<SessionStore>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, base_url: base_url.into(), store, bearer: RwLock::new(None) })
    }

    /// The active bearer credential, attached to authorized requests.
    pub fn access_token(&self) -> Option<String> {
        self.bearer.read().unwrap().clone()
    }

    fn set_token(&self, token: Option<String>) {
        *self.bearer.write().unwrap() = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Resolve the startup session: present the stored token (if any) to
    /// `/auth/me` and publish the outcome. Runs against the store's initial
    /// loading state.
    #[instrument(skip_all)]
    pub async fn resolve_session(&self, token: Option<String>) {
        let epoch = self.store.begin_initial();
        let Some(token) = token else {
            self.store.set_absent(epoch);
            return;
        };
        let resp = self.http
            .get(self.url("/auth/me"))
            .bearer_auth(&token)
            .send()
            .await;
        match resp {
            Ok(resp) if resp.status().is_success() => match resp.json::<AuthUser>().await {
                Ok(user) => {
                    // Keep the stored token only when the store accepts the
                    // resolution; a reset during the round trip wins.
                    if self.store.set_user(epoch, user) {
                        self.set_token(Some(token));
                    }
                }
                Err(e) => {
                    warn!(error = %e, "malformed session payload");
                    self.store.set_absent(epoch);
                }
            },
            Ok(_) => {
                // Expired or revoked token: resolved, unauthenticated
                self.store.set_absent(epoch);
            }
            Err(e) => {
                warn!(error = %e, "session resolution failed");
                self.store.set_error(epoch, GENERIC_SERVICE_ERROR);
            }
        }
    }

    /// Submit a login. Field errors are returned to the form; auth and
    /// network failures surface through `AuthState.error`.
    #[instrument(skip_all, fields(email = %creds.email))]
    pub async fn login(&self, creds: LoginCredentials) -> Result<(), Vec<FieldError>> {
        validation::validate_login(&creds)?;
        let Some(epoch) = self.store.try_begin() else {
            debug!("submission already in flight, ignoring");
            return Ok(());
        };
        let input = LoginInput { email: creds.email, password: creds.password, remember: creds.remember };
        self.submit(epoch, "/auth/login", &input).await;
        Ok(())
    }

    /// Submit a registration; same contract as `login`.
    #[instrument(skip_all, fields(email = %creds.email, role = %creds.role))]
    pub async fn register(&self, creds: RegisterCredentials) -> Result<(), Vec<FieldError>> {
        validation::validate_register(&creds)?;
        let Some(epoch) = self.store.try_begin() else {
            debug!("submission already in flight, ignoring");
            return Ok(());
        };
        let input = RegisterInput {
            email: creds.email,
            name: creds.name,
            password: creds.password,
            role: creds.role,
        };
        self.submit(epoch, "/auth/register", &input).await;
        Ok(())
    }

    async fn submit<T: serde::Serialize>(&self, epoch: u64, path: &str, input: &T) {
        let resp = self.http.post(self.url(path)).json(input).send().await;
        match resp {
            Ok(resp) if resp.status().is_success() => match resp.json::<AuthResponse>().await {
                Ok(auth) => {
                    // The credential rides on the same epoch check as the
                    // state: a completion the store discards must not leave
                    // a live token behind.
                    if self.store.set_user(epoch, auth.user) {
                        self.set_token(Some(auth.access_token));
                    } else {
                        debug!("discarding credential from superseded attempt");
                    }
                }
                Err(e) => {
                    warn!(error = %e, "malformed auth payload");
                    self.store.set_error(epoch, GENERIC_SERVICE_ERROR);
                }
            },
            Ok(resp) => {
                let message = resp.text().await.unwrap_or_default();
                let message = if message.trim().is_empty() {
                    "invalid credentials".to_string()
                } else {
                    message
                };
                self.store.set_error(epoch, message);
            }
            Err(e) => {
                warn!(error = %e, "auth request failed");
                self.store.set_error(epoch, GENERIC_SERVICE_ERROR);
            }
        }
    }

    /// Drop the session. The server call is best effort; local state is
    /// cleared regardless, which also invalidates in-flight completions.
    #[instrument(skip_all)]
    pub async fn logout(&self) {
        if let Some(token) = self.access_token() {
            let _ = self.http
                .post(self.url("/auth/logout"))
                .bearer_auth(token)
                .send()
                .await;
        }
        self.set_token(None);
        self.store.clear_user();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use common::types::Role;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use uuid::Uuid;

    #[derive(Clone)]
    struct MockState {
        hits: Arc<AtomicUsize>,
        delay_ms: u64,
    }

    fn auth_response(role: Role) -> AuthResponse {
        AuthResponse {
            access_token: "tok-123".into(),
            user: AuthUser { id: Uuid::new_v4(), email: "a@b.com".into(), name: "John Doe".into(), role },
        }
    }

    async fn mock_login(State(s): State<MockState>, Json(input): Json<LoginInput>) -> Result<Json<AuthResponse>, (StatusCode, String)> {
        s.hits.fetch_add(1, Ordering::SeqCst);
        if s.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(s.delay_ms)).await;
        }
        if input.password == "Password123!" {
            Ok(Json(auth_response(Role::Landlord)))
        } else {
            Err((StatusCode::UNAUTHORIZED, "invalid credentials".into()))
        }
    }

    async fn mock_register(State(s): State<MockState>, Json(input): Json<RegisterInput>) -> Json<AuthResponse> {
        s.hits.fetch_add(1, Ordering::SeqCst);
        Json(AuthResponse {
            access_token: "tok-reg".into(),
            user: AuthUser { id: Uuid::new_v4(), email: input.email, name: input.name, role: input.role },
        })
    }

    async fn mock_me(State(s): State<MockState>) -> Json<AuthUser> {
        s.hits.fetch_add(1, Ordering::SeqCst);
        if s.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(s.delay_ms)).await;
        }
        Json(AuthUser { id: Uuid::new_v4(), email: "a@b.com".into(), name: "John Doe".into(), role: Role::Tenant })
    }

    async fn spawn_mock(delay_ms: u64) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let state = MockState { hits: hits.clone(), delay_ms };
        let app = Router::new()
            .route("/auth/login", post(mock_login))
            .route("/auth/register", post(mock_register))
            .route("/auth/me", axum::routing::get(mock_me))
            .with_state(state);
        let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (format!("http://{}", addr), hits)
    }

    fn resolved_client(base: String) -> (Arc<AuthClient>, Arc<SessionStore>) {
        let store = Arc::new(SessionStore::new());
        // No stored token: resolve synchronously to unauthenticated
        store.set_absent(store.begin_initial());
        let client = Arc::new(AuthClient::new(base, store.clone()).unwrap());
        (client, store)
    }

    #[tokio::test]
    async fn login_populates_state_and_token() {
        let (base, _hits) = spawn_mock(0).await;
        let (client, store) = resolved_client(base);

        client
            .login(LoginCredentials { email: "a@b.com".into(), password: "Password123!".into(), remember: false })
            .await
            .unwrap();

        let state = store.snapshot();
        assert_eq!(state.user.as_ref().unwrap().role, Role::Landlord);
        assert!(!state.is_loading);
        assert_eq!(client.access_token().as_deref(), Some("tok-123"));
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_network() {
        let (base, hits) = spawn_mock(0).await;
        let (client, store) = resolved_client(base);

        let errs = client
            .login(LoginCredentials { email: "bad".into(), password: "x".into(), remember: false })
            .await
            .unwrap_err();
        assert!(!errs.is_empty());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(store.snapshot().user.is_none());
    }

    #[tokio::test]
    async fn wrong_credentials_surface_as_state_error() {
        let (base, _hits) = spawn_mock(0).await;
        let (client, store) = resolved_client(base);

        client
            .login(LoginCredentials { email: "a@b.com".into(), password: "WrongPass99".into(), remember: false })
            .await
            .unwrap();

        let state = store.snapshot();
        assert!(state.user.is_none());
        assert_eq!(state.error.as_deref(), Some("invalid credentials"));
    }

    #[tokio::test]
    async fn concurrent_submission_is_ignored() {
        let (base, hits) = spawn_mock(100).await;
        let (client, store) = resolved_client(base);

        let slow = {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .login(LoginCredentials { email: "a@b.com".into(), password: "Password123!".into(), remember: false })
                    .await
            })
        };
        // Let the first submission take the in-flight slot
        tokio::time::sleep(Duration::from_millis(20)).await;
        client
            .login(LoginCredentials { email: "a@b.com".into(), password: "Password123!".into(), remember: false })
            .await
            .unwrap();

        slow.await.unwrap().unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(store.snapshot().user.is_some());
    }

    #[tokio::test]
    async fn register_round_trip_yields_tenant_session() {
        let (base, _hits) = spawn_mock(0).await;
        let (client, store) = resolved_client(base);

        client
            .register(RegisterCredentials {
                email: "a@b.com".into(),
                password: "Password123!".into(),
                confirm_password: "Password123!".into(),
                name: "John Doe".into(),
                role: Role::Tenant,
                accept_terms: true,
            })
            .await
            .unwrap();

        let state = store.snapshot();
        assert_eq!(state.user.as_ref().unwrap().role, Role::Tenant);
        let token = client.access_token().unwrap();
        assert!(!token.is_empty());
    }

    #[tokio::test]
    async fn logout_after_inflight_login_discards_result() {
        let (base, _hits) = spawn_mock(100).await;
        let (client, store) = resolved_client(base);

        let slow = {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .login(LoginCredentials { email: "a@b.com".into(), password: "Password123!".into(), remember: false })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        client.logout().await;
        slow.await.unwrap().unwrap();

        // The login completed after logout; its result must not resurrect
        // the session, and no bearer credential may be left behind either
        assert!(store.snapshot().user.is_none());
        assert!(client.access_token().is_none());
    }

    #[tokio::test]
    async fn logout_during_initial_resolution_discards_credential() {
        let (base, _hits) = spawn_mock(100).await;
        let store = Arc::new(SessionStore::new());
        let client = Arc::new(AuthClient::new(base, store.clone()).unwrap());

        // Startup resolution of a stored token, still in flight
        let resolving = {
            let client = client.clone();
            tokio::spawn(async move { client.resolve_session(Some("stored-tok".into())).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        client.logout().await;
        resolving.await.unwrap();

        assert!(store.snapshot().user.is_none());
        assert!(client.access_token().is_none());
    }

    #[tokio::test]
    async fn unreachable_service_yields_retryable_error() {
        // Nothing listens on this port
        let (client, store) = resolved_client("http://127.0.0.1:1".into());
        client
            .login(LoginCredentials { email: "a@b.com".into(), password: "Password123!".into(), remember: false })
            .await
            .unwrap();
        let state = store.snapshot();
        assert!(state.user.is_none());
        assert_eq!(state.error.as_deref(), Some(GENERIC_SERVICE_ERROR));
    }
}
