use chrono::{DateTime, Duration, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Pre-deadline alert window: one hour before the deadline.
const PRE_ALERT_WINDOW: i64 = 60 * 60;

/// Due window: within one minute of the deadline, either side.
const DUE_WINDOW_MS: i64 = 60 * 1000;

/// Reminder (armazenado no MongoDB, collection `reminders`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// uid do usuário dono do reminder
    pub user_id: String,

    pub title: String,
    pub body: String,

    /// Deadline as supplied by the caller, RFC 3339. Validated on create,
    /// but re-parsed defensively by the scheduler: records written before
    /// validation existed (or by other writers) may not parse.
    pub timestamp: String,

    /// Idempotency flag: "due in 1 hour" notification already sent.
    /// false -> true exactly once, never reverts.
    #[serde(default)]
    pub pre_notified: bool,

    /// Idempotency flag: "due now" notification already sent.
    #[serde(default)]
    pub due_notified: bool,

    /// Timestamp de criação (Unix timestamp)
    pub created_at: i64,
}

impl Reminder {
    pub fn new(user_id: String, title: String, body: String, timestamp: String) -> Self {
        Self {
            id: None,
            user_id,
            title,
            body,
            timestamp,
            pre_notified: false,
            due_notified: false,
            created_at: Utc::now().timestamp(),
        }
    }

    /// Parses the stored deadline. `None` means the record is malformed and
    /// must be skipped, never propagated as a hard error.
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// `D - 1h <= now < D`. Upper bound is strict: at exactly `D` the
    /// reminder is due, no longer "due in 1 hour".
    pub fn in_pre_window(deadline: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now >= deadline - Duration::seconds(PRE_ALERT_WINDOW) && now < deadline
    }

    /// `|D - now| < 1 minute`.
    pub fn in_due_window(deadline: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        (deadline - now).num_milliseconds().abs() < DUE_WINDOW_MS
    }
}

/// Which idempotency flag the scheduler is persisting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderFlag {
    PreNotified,
    DueNotified,
}

/// Request para criar reminder
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateReminderRequest {
    pub title: String,
    pub body: String,
    /// RFC 3339 deadline, e.g. "2025-01-01T00:00:00Z"
    pub timestamp: String,
}

/// Reminder as returned by the API, decorated with its store-assigned id
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ReminderResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub body: String,
    pub timestamp: String,
    pub pre_notified: bool,
    pub due_notified: bool,
    pub created_at: i64,
}

impl From<Reminder> for ReminderResponse {
    fn from(reminder: Reminder) -> Self {
        Self {
            id: reminder.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: reminder.user_id,
            title: reminder.title,
            body: reminder.body,
            timestamp: reminder.timestamp,
            pre_notified: reminder.pre_notified,
            due_notified: reminder.due_notified,
            created_at: reminder.created_at,
        }
    }
}
