use crate::models::{CreateReminderRequest, ReminderResponse};
use crate::services::auth_service::AuthContext;
use crate::services::reminder_service;
use crate::state::AppState;
use actix_web::{web, HttpResponse, ResponseError};

/// POST /addReminder
#[utoipa::path(
    post,
    path = "/addReminder",
    tag = "Reminders",
    request_body = CreateReminderRequest,
    responses(
        (status = 201, description = "Reminder created", body = ReminderResponse),
        (status = 400, description = "Missing field or unparseable timestamp"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_reminder(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthContext>,
    request: web::Json<CreateReminderRequest>,
) -> HttpResponse {
    let uid = &auth.subject_id;
    log::info!("⏰ POST /addReminder - uid: {}, title: {}", uid, request.title);

    match reminder_service::create_reminder(state.reminders.as_ref(), uid, &request).await {
        Ok(reminder) => HttpResponse::Created().json(serde_json::json!({
            "message": "Reminder added",
            "reminder": reminder
        })),
        Err(e) => {
            log::warn!("❌ addReminder failed for {}: {}", uid, e);
            e.error_response()
        }
    }
}

/// GET /getReminders — all reminders owned by the verified caller.
#[utoipa::path(
    get,
    path = "/getReminders",
    tag = "Reminders",
    responses(
        (status = 200, description = "Reminder list", body = [ReminderResponse]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_reminders(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthContext>,
) -> HttpResponse {
    let uid = &auth.subject_id;
    log::debug!("📋 GET /getReminders - uid: {}", uid);

    match reminder_service::list_reminders(state.reminders.as_ref(), uid).await {
        Ok(reminders) => HttpResponse::Ok().json(reminders),
        Err(e) => {
            log::error!("❌ getReminders failed for {}: {}", uid, e);
            e.error_response()
        }
    }
}

/// DELETE /deleteReminder/{id}
#[utoipa::path(
    delete,
    path = "/deleteReminder/{id}",
    tag = "Reminders",
    params(("id" = String, Path, description = "Store-assigned reminder id")),
    responses(
        (status = 200, description = "Deleted (or id did not exist)"),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Store failure")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_reminder(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthContext>,
    path: web::Path<String>,
) -> HttpResponse {
    let id = path.into_inner();
    log::info!("🗑️ DELETE /deleteReminder/{} - uid: {}", id, auth.subject_id);

    match reminder_service::delete_reminder(state.reminders.as_ref(), &id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": format!("Reminder {} deleted", id)
        })),
        Err(e) => {
            log::error!("❌ deleteReminder {} failed: {}", id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": e.to_string()
            }))
        }
    }
}
