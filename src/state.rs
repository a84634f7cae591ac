use crate::services::auth_service::IdentityVerifier;
use crate::services::telegram_service::NotificationSender;
use crate::store::{ReminderStore, UserStore};
use std::sync::Arc;

/// Explicit dependency bundle handed to handlers, middleware and the
/// scheduler. Everything behind a trait object so tests can substitute
/// any collaborator; no process-wide singletons.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub reminders: Arc<dyn ReminderStore>,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub notifier: Arc<dyn NotificationSender>,
    /// Telegram bot token: doubles as the webhook path secret and the
    /// outbound send credential.
    pub bot_token: String,
}
