use crate::models::{CreateReminderRequest, Reminder, ReminderResponse};
use crate::store::ReminderStore;
use crate::utils::AppError;
use chrono::DateTime;
use mongodb::bson::oid::ObjectId;

/// Creates a reminder owned by the verified caller. Both notification
/// flags start false; the scheduler is the only writer that flips them.
pub async fn create_reminder(
    reminders: &dyn ReminderStore,
    uid: &str,
    request: &CreateReminderRequest,
) -> Result<ReminderResponse, AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }
    if request.body.trim().is_empty() {
        return Err(AppError::Validation("body is required".to_string()));
    }
    if request.timestamp.trim().is_empty() {
        return Err(AppError::Validation("timestamp is required".to_string()));
    }
    if DateTime::parse_from_rfc3339(&request.timestamp).is_err() {
        return Err(AppError::Validation(format!(
            "timestamp must be an RFC 3339 instant, got '{}'",
            request.timestamp
        )));
    }

    let mut reminder = Reminder::new(
        uid.to_string(),
        request.title.clone(),
        request.body.clone(),
        request.timestamp.clone(),
    );

    let id = reminders.insert(&reminder).await?;
    reminder.id = ObjectId::parse_str(&id).ok();

    log::info!("⏰ Reminder '{}' created for user {}", reminder.title, uid);
    Ok(ReminderResponse::from(reminder))
}

/// All reminders owned by `uid`, in store-yielded order.
pub async fn list_reminders(
    reminders: &dyn ReminderStore,
    uid: &str,
) -> Result<Vec<ReminderResponse>, AppError> {
    let items = reminders.find_by_owner(uid).await?;
    Ok(items.into_iter().map(ReminderResponse::from).collect())
}

/// Deletes by id with delete-if-exists semantics: a missing id succeeds.
///
/// TODO: require the caller's subject id to match the reminder's owner
/// before deleting. The source system never checked this and current
/// clients rely on the permissive behavior.
pub async fn delete_reminder(reminders: &dyn ReminderStore, id: &str) -> Result<(), AppError> {
    reminders.delete(id).await?;
    log::info!("🗑️ Reminder {} deleted", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryReminderStore;

    fn request(title: &str, body: &str, timestamp: &str) -> CreateReminderRequest {
        CreateReminderRequest {
            title: title.to_string(),
            body: body.to_string(),
            timestamp: timestamp.to_string(),
        }
    }

    #[tokio::test]
    async fn create_starts_with_both_flags_false() {
        let store = MemoryReminderStore::new();

        let created = create_reminder(&store, "u1", &request("Pay rent", "due", "2025-01-01T00:00:00Z"))
            .await
            .unwrap();

        assert!(!created.pre_notified);
        assert!(!created.due_notified);
        assert!(!created.id.is_empty());
    }

    #[tokio::test]
    async fn create_rejects_missing_fields() {
        let store = MemoryReminderStore::new();

        for bad in [
            request("", "body", "2025-01-01T00:00:00Z"),
            request("title", " ", "2025-01-01T00:00:00Z"),
            request("title", "body", ""),
        ] {
            let result = create_reminder(&store, "u1", &bad).await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn create_rejects_unparseable_timestamp() {
        let store = MemoryReminderStore::new();

        let result =
            create_reminder(&store, "u1", &request("title", "body", "next tuesday")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn list_filters_by_owner() {
        let store = MemoryReminderStore::new();
        create_reminder(&store, "u1", &request("a", "b", "2025-01-01T00:00:00Z"))
            .await
            .unwrap();
        create_reminder(&store, "u2", &request("c", "d", "2025-01-01T00:00:00Z"))
            .await
            .unwrap();

        let mine = list_reminders(&store, "u1").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "a");
        assert_eq!(mine[0].user_id, "u1");
    }

    #[tokio::test]
    async fn delete_is_permissive_about_unknown_ids() {
        let store = MemoryReminderStore::new();

        assert!(delete_reminder(&store, "64b5f0f0f0f0f0f0f0f0f0f0")
            .await
            .is_ok());
        assert!(delete_reminder(&store, "not-even-an-object-id").await.is_ok());
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let store = MemoryReminderStore::new();
        let created = create_reminder(&store, "u1", &request("a", "b", "2025-01-01T00:00:00Z"))
            .await
            .unwrap();

        delete_reminder(&store, &created.id).await.unwrap();
        assert!(list_reminders(&store, "u1").await.unwrap().is_empty());
    }
}
