use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::guard;
use crate::openapi::ApiDoc;
use crate::shell::Layout;

pub mod auth;
pub mod dashboard;

use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "ops", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// One dashboard area: the layout fixes the allowed-role set on the guard
/// and the shell flavor in the handler together.
fn area(state: &ServerState, layout: Layout, path: &str, handler: axum::routing::MethodRouter<ServerState>) -> Router<ServerState> {
    Router::new().route(path, handler).route_layer(middleware::from_fn_with_state(
        (state.clone(), layout.allowed),
        guard::require_role,
    ))
}

/// Build the full application router: public auth surface, guarded
/// role-scoped dashboards, API docs.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/auth/password-reset", post(auth::password_reset_request))
        .route("/auth/password", post(auth::password_update));

    let tenant = area(&state, Layout::tenant(), "/dashboard/tenant", get(dashboard::tenant));
    let landlord = area(&state, Layout::landlord(), "/dashboard/landlord", get(dashboard::landlord));
    let admin = area(&state, Layout::admin(), "/dashboard/admin", get(dashboard::admin));

    public
        .merge(tenant)
        .merge(landlord)
        .merge(admin)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
