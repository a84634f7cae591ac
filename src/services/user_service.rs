use crate::models::{RegisterUserRequest, User};
use crate::services::telegram_service::NotificationSender;
use crate::store::UserStore;
use crate::utils::AppError;

/// Whether `register_user` created a record or found one already there.
#[derive(Debug)]
pub enum RegisterOutcome {
    Created(User),
    AlreadyRegistered(User),
}

/// What happened to an inbound linking attempt. Unknown codes are not
/// errors — the webhook is an anonymous channel and drops them silently.
#[derive(Debug, PartialEq, Eq)]
pub enum LinkOutcome {
    Linked,
    UnknownCode,
}

/// Registers a user under the verified subject id. Idempotent: a second
/// call with the same uid returns the stored record untouched.
pub async fn register_user(
    users: &dyn UserStore,
    uid: &str,
    request: &RegisterUserRequest,
) -> Result<RegisterOutcome, AppError> {
    if uid.trim().is_empty() {
        return Err(AppError::Validation("uid is required".to_string()));
    }
    if request.username.trim().is_empty() {
        return Err(AppError::Validation("username is required".to_string()));
    }

    if let Some(existing) = users.find_by_uid(uid).await? {
        log::debug!("👤 User {} already registered", uid);
        return Ok(RegisterOutcome::AlreadyRegistered(existing));
    }

    let user = User::new(
        uid.to_string(),
        request.username.clone(),
        request.email.clone(),
    );
    users.insert(&user).await?;

    log::info!("✅ User registered: {} ({})", user.username, uid);
    Ok(RegisterOutcome::Created(user))
}

pub async fn get_user(users: &dyn UserStore, uid: &str) -> Result<User, AppError> {
    users
        .find_by_uid(uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", uid)))
}

/// Links a Telegram chat to the user the linking code names. The code is
/// the user's subject id, carried in the "/start <code>" deep link. On
/// success a confirmation is pushed to the new chat; a delivery failure is
/// logged and never rolls back the link.
pub async fn link_chat(
    users: &dyn UserStore,
    notifier: &dyn NotificationSender,
    code: &str,
    chat_id: &str,
) -> Result<LinkOutcome, AppError> {
    let user = match users.find_by_uid(code).await? {
        Some(user) => user,
        None => {
            log::debug!("🔗 Linking code {} matches no user, dropping", code);
            return Ok(LinkOutcome::UnknownCode);
        }
    };

    users.set_chat_id(&user.uid, chat_id).await?;
    log::info!("🔗 Chat {} linked to user {}", chat_id, user.uid);

    let confirmation = format!(
        "✅ Hi {}! This chat is now linked to your account. \
         You'll receive your reminder notifications here.",
        user.username
    );
    if let Err(e) = notifier.send(chat_id, &confirmation).await {
        log::warn!("⚠️  Link confirmation to chat {} failed: {}", chat_id, e);
    }

    Ok(LinkOutcome::Linked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::telegram_service::test_support::RecordingNotifier;
    use crate::store::MemoryUserStore;

    fn request(username: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            uid: None,
            username: username.to_string(),
            email: None,
        }
    }

    #[tokio::test]
    async fn register_then_get_round_trip() {
        let store = MemoryUserStore::new();

        let outcome = register_user(&store, "u1", &request("Alice")).await.unwrap();
        assert!(matches!(outcome, RegisterOutcome::Created(_)));

        let user = get_user(&store, "u1").await.unwrap();
        assert_eq!(user.username, "Alice");
        assert!(user.chat_id.is_none());
    }

    #[tokio::test]
    async fn register_is_idempotent_and_never_overwrites() {
        let store = MemoryUserStore::new();

        register_user(&store, "u1", &request("Alice")).await.unwrap();
        let second = register_user(&store, "u1", &request("Mallory"))
            .await
            .unwrap();

        match second {
            RegisterOutcome::AlreadyRegistered(user) => assert_eq!(user.username, "Alice"),
            other => panic!("expected AlreadyRegistered, got {:?}", other),
        }
        assert_eq!(get_user(&store, "u1").await.unwrap().username, "Alice");
    }

    #[tokio::test]
    async fn register_rejects_empty_username() {
        let store = MemoryUserStore::new();

        let result = register_user(&store, "u1", &request("  ")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn get_unknown_user_is_not_found() {
        let store = MemoryUserStore::new();

        assert!(matches!(
            get_user(&store, "ghost").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn unknown_linking_code_is_dropped_silently() {
        let store = MemoryUserStore::new();
        let notifier = RecordingNotifier::new();

        let outcome = link_chat(&store, &notifier, "ghost", "42").await.unwrap();
        assert_eq!(outcome, LinkOutcome::UnknownCode);
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn linking_sets_chat_and_sends_confirmation() {
        let store = MemoryUserStore::new();
        let notifier = RecordingNotifier::new();
        register_user(&store, "u1", &request("Alice")).await.unwrap();

        let outcome = link_chat(&store, &notifier, "u1", "42").await.unwrap();

        assert_eq!(outcome, LinkOutcome::Linked);
        assert_eq!(
            get_user(&store, "u1").await.unwrap().chat_id.as_deref(),
            Some("42")
        );
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "42");
    }

    #[tokio::test]
    async fn relinking_overwrites_previous_chat() {
        let store = MemoryUserStore::new();
        let notifier = RecordingNotifier::new();
        register_user(&store, "u1", &request("Alice")).await.unwrap();

        link_chat(&store, &notifier, "u1", "42").await.unwrap();
        link_chat(&store, &notifier, "u1", "99").await.unwrap();

        assert_eq!(
            get_user(&store, "u1").await.unwrap().chat_id.as_deref(),
            Some("99")
        );
    }

    #[tokio::test]
    async fn confirmation_failure_does_not_roll_back_link() {
        let store = MemoryUserStore::new();
        let notifier = RecordingNotifier::failing();
        register_user(&store, "u1", &request("Alice")).await.unwrap();

        let outcome = link_chat(&store, &notifier, "u1", "42").await.unwrap();

        assert_eq!(outcome, LinkOutcome::Linked);
        assert_eq!(
            get_user(&store, "u1").await.unwrap().chat_id.as_deref(),
            Some("42")
        );
    }
}
