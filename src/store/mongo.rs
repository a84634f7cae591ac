use crate::models::{Reminder, ReminderFlag, User};
use crate::store::{ReminderStore, UserStore};
use crate::utils::AppError;
use async_trait::async_trait;
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use std::error::Error;

const USERS_COLLECTION: &str = "users";
const REMINDERS_COLLECTION: &str = "reminders";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool otimizado
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Extract database name from URI or use default
        let db_name = uri
            .split('/')
            .last()
            .and_then(|s| s.split('?').next())
            .unwrap_or("ReminderBot");

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates necessary indexes for optimal query performance
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        log::info!("🔧 Creating database indexes...");

        // users(uid) unique — at most one record per subject identifier
        let users = self.collection::<mongodb::bson::Document>(USERS_COLLECTION);
        let uid_index = IndexModel::builder()
            .keys(doc! { "uid": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(uid_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(uid) unique"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // reminders(user_id) — listar reminders do usuário
        let reminders = self.collection::<mongodb::bson::Document>(REMINDERS_COLLECTION);
        let owner_index = IndexModel::builder().keys(doc! { "user_id": 1 }).build();

        match reminders.create_index(owner_index).await {
            Ok(_) => log::info!("   ✅ Index created: reminders(user_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}

/// Drains a cursor, skipping records that fail to deserialize. One corrupt
/// document must not hide the rest of the collection.
async fn drain<T>(mut cursor: mongodb::Cursor<T>) -> Vec<T>
where
    T: serde::de::DeserializeOwned + Send + Sync,
{
    let mut items = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(item) => items.push(item),
            Err(e) => log::warn!("⚠️  Skipping unreadable document: {}", e),
        }
    }
    items
}

pub struct MongoUserStore {
    db: MongoDB,
}

impl MongoUserStore {
    pub fn new(db: MongoDB) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<User> {
        self.db.collection(USERS_COLLECTION)
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn insert(&self, user: &User) -> Result<(), AppError> {
        self.collection()
            .insert_one(user)
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;
        Ok(())
    }

    async fn find_by_uid(&self, uid: &str) -> Result<Option<User>, AppError> {
        self.collection()
            .find_one(doc! { "uid": uid })
            .await
            .map_err(|e| AppError::Store(e.to_string()))
    }

    async fn set_chat_id(&self, uid: &str, chat_id: &str) -> Result<(), AppError> {
        self.collection()
            .update_one(
                doc! { "uid": uid },
                doc! { "$set": { "chat_id": chat_id } },
            )
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;
        Ok(())
    }
}

pub struct MongoReminderStore {
    db: MongoDB,
}

impl MongoReminderStore {
    pub fn new(db: MongoDB) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<Reminder> {
        self.db.collection(REMINDERS_COLLECTION)
    }
}

#[async_trait]
impl ReminderStore for MongoReminderStore {
    async fn insert(&self, reminder: &Reminder) -> Result<String, AppError> {
        let result = self
            .collection()
            .insert_one(reminder)
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        result
            .inserted_id
            .as_object_id()
            .map(|id| id.to_hex())
            .ok_or_else(|| AppError::Store("insert returned no ObjectId".to_string()))
    }

    async fn find_by_owner(&self, uid: &str) -> Result<Vec<Reminder>, AppError> {
        let cursor = self
            .collection()
            .find(doc! { "user_id": uid })
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;
        Ok(drain(cursor).await)
    }

    async fn find_all(&self) -> Result<Vec<Reminder>, AppError> {
        let cursor = self
            .collection()
            .find(doc! {})
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;
        Ok(drain(cursor).await)
    }

    async fn set_flag(&self, id: &str, flag: ReminderFlag) -> Result<(), AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::Store(format!("invalid reminder id: {}", id)))?;

        let field = match flag {
            ReminderFlag::PreNotified => "pre_notified",
            ReminderFlag::DueNotified => "due_notified",
        };

        self.collection()
            .update_one(doc! { "_id": object_id }, doc! { "$set": { field: true } })
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        // A malformed id cannot name a stored document, so under
        // delete-if-exists semantics it is already "deleted".
        let object_id = match ObjectId::parse_str(id) {
            Ok(oid) => oid,
            Err(_) => return Ok(()),
        };

        self.collection()
            .delete_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;
        Ok(())
    }
}
