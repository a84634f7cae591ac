//! In-memory store implementations backed by mutex-guarded vectors.
//!
//! These mirror the Mongo implementations closely enough to stand in for
//! them in tests; ids are still ObjectId hex strings so callers cannot
//! tell the two apart.

use crate::models::{Reminder, ReminderFlag, User};
use crate::store::{ReminderStore, UserStore};
use crate::utils::AppError;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: &User) -> Result<(), AppError> {
        let mut users = self.users.lock().unwrap();
        let mut user = user.clone();
        if user.id.is_none() {
            user.id = Some(ObjectId::new());
        }
        users.push(user);
        Ok(())
    }

    async fn find_by_uid(&self, uid: &str) -> Result<Option<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.uid == uid).cloned())
    }

    async fn set_chat_id(&self, uid: &str, chat_id: &str) -> Result<(), AppError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.uid == uid) {
            user.chat_id = Some(chat_id.to_string());
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryReminderStore {
    reminders: Mutex<Vec<Reminder>>,
    /// When set, `set_flag` fails — exercises the flag-write failure path.
    fail_flag_writes: Mutex<bool>,
}

impl MemoryReminderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_flag_writes(&self, fail: bool) {
        *self.fail_flag_writes.lock().unwrap() = fail;
    }
}

#[async_trait]
impl ReminderStore for MemoryReminderStore {
    async fn insert(&self, reminder: &Reminder) -> Result<String, AppError> {
        let mut reminders = self.reminders.lock().unwrap();
        let mut reminder = reminder.clone();
        let id = reminder.id.unwrap_or_else(ObjectId::new);
        reminder.id = Some(id);
        reminders.push(reminder);
        Ok(id.to_hex())
    }

    async fn find_by_owner(&self, uid: &str) -> Result<Vec<Reminder>, AppError> {
        let reminders = self.reminders.lock().unwrap();
        Ok(reminders
            .iter()
            .filter(|r| r.user_id == uid)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Reminder>, AppError> {
        let reminders = self.reminders.lock().unwrap();
        Ok(reminders.clone())
    }

    async fn set_flag(&self, id: &str, flag: ReminderFlag) -> Result<(), AppError> {
        if *self.fail_flag_writes.lock().unwrap() {
            return Err(AppError::Store("flag write refused".to_string()));
        }

        let mut reminders = self.reminders.lock().unwrap();
        if let Some(reminder) = reminders
            .iter_mut()
            .find(|r| r.id.map(|oid| oid.to_hex()).as_deref() == Some(id))
        {
            match flag {
                ReminderFlag::PreNotified => reminder.pre_notified = true,
                ReminderFlag::DueNotified => reminder.due_notified = true,
            }
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut reminders = self.reminders.lock().unwrap();
        reminders.retain(|r| r.id.map(|oid| oid.to_hex()).as_deref() != Some(id));
        Ok(())
    }
}
