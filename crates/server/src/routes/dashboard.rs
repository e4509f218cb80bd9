use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use common::types::{LeaseStatus, MaintenancePriority, MaintenanceStatus, PaymentStatus, UserType};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{json, Value};

use crate::guard::CurrentUser;
use crate::routes::auth::ServerState;
use crate::shell::{DashboardPage, Shell};

fn status_tags<T: Copy>(all: &[T], f: impl Fn(T) -> &'static str) -> Vec<&'static str> {
    all.iter().map(|s| f(*s)).collect()
}

fn page(user_type: UserType, user: CurrentUser, content: Value) -> Json<DashboardPage<Value>> {
    Json(DashboardPage { shell: Shell::for_user_type(user_type), user: user.0, content })
}

#[utoipa::path(get, path = "/dashboard/tenant", tag = "dashboard", responses((status = 200, description = "Tenant dashboard"), (status = 307, description = "Redirected by the access guard")))]
pub async fn tenant(Extension(user): Extension<CurrentUser>) -> Json<DashboardPage<Value>> {
    page(
        UserType::Tenant,
        user,
        json!({
            "lease_statuses": status_tags(&LeaseStatus::ALL, |s| s.as_str()),
            "payment_statuses": status_tags(&PaymentStatus::ALL, |s| s.as_str()),
            "maintenance_statuses": status_tags(&MaintenanceStatus::ALL, |s| s.as_str()),
        }),
    )
}

#[utoipa::path(get, path = "/dashboard/landlord", tag = "dashboard", responses((status = 200, description = "Landlord dashboard"), (status = 307, description = "Redirected by the access guard")))]
pub async fn landlord(Extension(user): Extension<CurrentUser>) -> Json<DashboardPage<Value>> {
    page(
        UserType::Landlord,
        user,
        json!({
            "lease_statuses": status_tags(&LeaseStatus::ALL, |s| s.as_str()),
            "payment_statuses": status_tags(&PaymentStatus::ALL, |s| s.as_str()),
            "maintenance_statuses": status_tags(&MaintenanceStatus::ALL, |s| s.as_str()),
            "maintenance_priorities": status_tags(&MaintenancePriority::ALL, |s| s.as_str()),
        }),
    )
}

#[utoipa::path(get, path = "/dashboard/admin", tag = "dashboard", responses((status = 200, description = "Admin dashboard"), (status = 307, description = "Redirected by the access guard")))]
pub async fn admin(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<DashboardPage<Value>>, (StatusCode, String)> {
    let user_count = models::user::Entity::find()
        .count(&state.db)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(page(
        UserType::Admin,
        user,
        json!({
            "user_count": user_count,
            "lease_statuses": status_tags(&LeaseStatus::ALL, |s| s.as_str()),
            "maintenance_priorities": status_tags(&MaintenancePriority::ALL, |s| s.as_str()),
        }),
    ))
}
