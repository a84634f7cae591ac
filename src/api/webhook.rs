use crate::services::telegram_service::{parse_link_command, TelegramUpdate};
use crate::services::user_service::{self, LinkOutcome};
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// POST /webhook/{token} — inbound Telegram updates.
///
/// The path segment is the shared secret: Telegram is configured to call
/// exactly this URL, so anything with a different token is noise. The
/// sender is an anonymous external channel — every outcome, including a
/// store failure, answers 200 "OK" so Telegram never retries or surfaces
/// an error to the chat.
pub async fn telegram_webhook(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> HttpResponse {
    if path.into_inner() != state.bot_token {
        log::warn!("🤖 Webhook called with unknown token, ignoring");
        return HttpResponse::Ok().body("OK");
    }

    // Parsed leniently from raw bytes: a payload shape we don't know is
    // ignored, not rejected.
    let update: TelegramUpdate = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            log::debug!("🤖 Unreadable webhook payload: {}", e);
            return HttpResponse::Ok().body("OK");
        }
    };

    let message = match update.message {
        Some(message) => message,
        None => return HttpResponse::Ok().body("OK"),
    };

    let code = match message.text.as_deref().and_then(parse_link_command) {
        Some(code) => code.to_string(),
        None => return HttpResponse::Ok().body("OK"),
    };

    let chat_id = message.chat.id.to_string();
    match user_service::link_chat(
        state.users.as_ref(),
        state.notifier.as_ref(),
        &code,
        &chat_id,
    )
    .await
    {
        Ok(LinkOutcome::Linked) => {
            log::info!("🤖 Webhook linked chat {} via code {}", chat_id, code)
        }
        Ok(LinkOutcome::UnknownCode) => {}
        Err(e) => log::error!("❌ Webhook linking failed: {}", e),
    }

    HttpResponse::Ok().body("OK")
}
