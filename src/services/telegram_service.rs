use crate::utils::AppError;
use async_trait::async_trait;
use serde::Deserialize;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Command prefix an inbound message must carry to link a chat. Telegram
/// puts the deep-link payload after `/start`, so "/start <code>" is what
/// the official clients send.
const LINK_COMMAND: &str = "/start";

/// Best-effort push of a text message to a chat target.
///
/// Delivery failure is an explicit outcome, not a swallowed exception —
/// callers that fire-and-forget log the error and move on.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), AppError>;
}

/// Sends via the Telegram Bot API `sendMessage` method.
pub struct TelegramNotifier {
    client: reqwest::Client,
    token: String,
}

impl TelegramNotifier {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
        }
    }
}

#[async_trait]
impl NotificationSender for TelegramNotifier {
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), AppError> {
        let url = format!("{}/bot{}/sendMessage", TELEGRAM_API_BASE, self.token);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "chat_id": chat_id,
                "text": text,
            }))
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| AppError::Notify(format!("Failed to reach Telegram: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Notify(format!(
                "Telegram API error: {}",
                response.status()
            )));
        }

        log::debug!("📨 Message delivered to chat {}", chat_id);
        Ok(())
    }
}

// ==================== INBOUND WEBHOOK PAYLOAD ====================

/// Telegram update as delivered to the webhook. Only the fields the
/// linking flow needs; everything else is ignored.
#[derive(Debug, Deserialize)]
pub struct TelegramUpdate {
    pub message: Option<TelegramMessage>,
}

#[derive(Debug, Deserialize)]
pub struct TelegramMessage {
    pub chat: TelegramChat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
}

/// Extracts the linking code from an inbound message text: the second
/// whitespace-separated token after the `/start` command prefix.
pub fn parse_link_command(text: &str) -> Option<&str> {
    let mut parts = text.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(LINK_COMMAND), Some(code)) => Some(code),
        _ => None,
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// Records every send; optionally refuses delivery to exercise the
    /// fire-and-forget paths.
    pub struct RecordingNotifier {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        pub fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationSender for RecordingNotifier {
        async fn send(&self, chat_id: &str, text: &str) -> Result<(), AppError> {
            self.sent
                .lock()
                .unwrap()
                .push((chat_id.to_string(), text.to_string()));
            if self.fail {
                return Err(AppError::Notify("delivery refused".to_string()));
            }
            Ok(())
        }
    }
}
