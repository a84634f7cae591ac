use crate::models::{RegisterUserRequest, UserResponse};
use crate::services::auth_service::AuthContext;
use crate::services::user_service::{self, RegisterOutcome};
use crate::state::AppState;
use actix_web::{web, HttpResponse, ResponseError};

/// POST /registerUser — registers the verified caller. Idempotent: an
/// existing record is returned untouched with a 200 instead of a 201.
#[utoipa::path(
    post,
    path = "/registerUser",
    tag = "Users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered"),
        (status = 200, description = "User already registered"),
        (status = 400, description = "Missing required field"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn register_user(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthContext>,
    request: web::Json<RegisterUserRequest>,
) -> HttpResponse {
    let uid = &auth.subject_id;
    log::info!("📝 POST /registerUser - uid: {}", uid);

    if request.uid.is_some() {
        // Deprecated body-supplied uid: the verified token wins.
        log::debug!("📝 Ignoring body uid in favor of token subject {}", uid);
    }

    match user_service::register_user(state.users.as_ref(), uid, &request).await {
        Ok(RegisterOutcome::Created(user)) => HttpResponse::Created().json(serde_json::json!({
            "message": "User registered",
            "user": UserResponse::from(user)
        })),
        Ok(RegisterOutcome::AlreadyRegistered(user)) => HttpResponse::Ok().json(serde_json::json!({
            "message": "User already registered",
            "user": UserResponse::from(user)
        })),
        Err(e) => {
            log::warn!("❌ Registration failed for {}: {}", uid, e);
            e.error_response()
        }
    }
}

/// GET /getUser — the verified caller's own record.
#[utoipa::path(
    get,
    path = "/getUser",
    tag = "Users",
    responses(
        (status = 200, description = "User record", body = UserResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not registered")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(state: web::Data<AppState>, auth: web::ReqData<AuthContext>) -> HttpResponse {
    let uid = &auth.subject_id;
    log::info!("👤 GET /getUser - uid: {}", uid);

    match user_service::get_user(state.users.as_ref(), uid).await {
        Ok(user) => HttpResponse::Ok().json(UserResponse::from(user)),
        Err(e) => {
            log::warn!("❌ getUser failed for {}: {}", uid, e);
            e.error_response()
        }
    }
}
