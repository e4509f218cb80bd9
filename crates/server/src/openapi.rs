use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub email: String, pub name: String, pub password: String, pub role: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String, pub remember: bool }

#[derive(ToSchema)]
pub struct PasswordResetRequest { pub email: String }

#[derive(ToSchema)]
pub struct PasswordUpdateRequest { pub old_password: String, pub new_password: String }

#[derive(ToSchema)]
pub struct UserDoc { pub id: Uuid, pub email: String, pub name: String, pub role: String }

#[derive(ToSchema)]
pub struct AuthResponseDoc { pub access_token: String, pub user: UserDoc }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::auth::password_reset_request,
        crate::routes::auth::password_update,
        crate::routes::dashboard::tenant,
        crate::routes::dashboard::landlord,
        crate::routes::dashboard::admin,
    ),
    components(schemas(
        HealthResponse,
        RegisterRequest,
        LoginRequest,
        PasswordResetRequest,
        PasswordUpdateRequest,
        UserDoc,
        AuthResponseDoc,
    )),
    tags(
        (name = "auth", description = "Registration, login, and password flows"),
        (name = "dashboard", description = "Role-scoped dashboard areas"),
        (name = "ops", description = "Operational endpoints"),
    )
)]
pub struct ApiDoc;
