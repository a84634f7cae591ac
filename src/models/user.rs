use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Registered user (armazenado no MongoDB, collection `users`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Subject identifier issued by the identity provider.
    /// Logical primary key — unique index on the collection.
    pub uid: String,

    /// Display name
    pub username: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Telegram chat the bot delivers to. Unset until the user links a
    /// chat via the webhook; overwritten on re-link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,

    /// Timestamp de criação (Unix timestamp)
    pub created_at: i64,
}

impl User {
    pub fn new(uid: String, username: String, email: Option<String>) -> Self {
        Self {
            id: None,
            uid,
            username,
            email,
            chat_id: None,
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// Request para registrar usuário
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterUserRequest {
    /// Ignored; the subject id always comes from the verified token.
    /// Kept in the wire format for older clients that still send it.
    pub uid: Option<String>,
    pub username: String,
    pub email: Option<String>,
}

/// User object as returned by the API (sem campos internos do BSON)
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub uid: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    pub created_at: i64,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            uid: user.uid,
            username: user.username,
            email: user.email,
            chat_id: user.chat_id,
            created_at: user.created_at,
        }
    }
}
