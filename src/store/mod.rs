#[cfg(test)]
pub mod memory;
pub mod mongo;

use crate::models::{Reminder, ReminderFlag, User};
use crate::utils::AppError;
use async_trait::async_trait;

#[cfg(test)]
pub use memory::{MemoryReminderStore, MemoryUserStore};
pub use mongo::MongoDB;

/// Persistence seam for user records. Services and the scheduler depend on
/// this trait instead of a concrete database handle so tests can swap in the
/// in-memory implementation.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: &User) -> Result<(), AppError>;

    async fn find_by_uid(&self, uid: &str) -> Result<Option<User>, AppError>;

    /// Overwrites any previously linked chat. Re-linking is allowed.
    async fn set_chat_id(&self, uid: &str, chat_id: &str) -> Result<(), AppError>;
}

/// Persistence seam for reminder records.
#[async_trait]
pub trait ReminderStore: Send + Sync {
    /// Returns the store-assigned document id (hex).
    async fn insert(&self, reminder: &Reminder) -> Result<String, AppError>;

    async fn find_by_owner(&self, uid: &str) -> Result<Vec<Reminder>, AppError>;

    /// Full collection scan for the scheduler, store-yielded order.
    async fn find_all(&self) -> Result<Vec<Reminder>, AppError>;

    /// false -> true only. Flags are never reset.
    async fn set_flag(&self, id: &str, flag: ReminderFlag) -> Result<(), AppError>;

    /// Delete-if-exists: an unknown (or even malformed) id is success.
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}
