use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reminder Service API",
        version = "0.1.0",
        description = "Backend that links user accounts to a Telegram bot for reminder notifications.\n\n**Authentication:** All user and reminder endpoints require a JWT Bearer token; the subject id is always taken from the verified token.\n\n**Features:**\n- Idempotent user registration\n- Reminder CRUD per user\n- Telegram chat linking via /start deep link\n- Scheduled pre-deadline and due notifications"
    ),
    paths(
        crate::api::health::home,
        crate::api::users::register_user,
        crate::api::users::get_user,
        crate::api::reminders::add_reminder,
        crate::api::reminders::get_reminders,
        crate::api::reminders::delete_reminder,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::models::RegisterUserRequest,
            crate::models::UserResponse,
            crate::models::CreateReminderRequest,
            crate::models::ReminderResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness endpoints for uptime monitoring."),
        (name = "Users", description = "Registration and account lookup. Identity comes from the verified bearer token."),
        (name = "Reminders", description = "Per-user reminder management. Notifications are delivered by the background scheduler."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build(),
                ),
            );
        }
    }
}
