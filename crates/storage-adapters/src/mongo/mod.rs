//! # MongoDB store
//!
//! One `threads` collection; each document embeds its replies. Every port
//! method is a single-document operation, so appends, bumps and flag updates
//! are atomic without transactions.

pub mod models;

use async_trait::async_trait;
use bson::{doc, Document};
use domains::{Reply, ReplyId, Result, Thread, ThreadId, ThreadRepository};
use futures::TryStreamExt;
use mongodb::{Client, Collection, IndexModel};

use crate::error::StorageError;
use models::{MongoReply, MongoThread};

#[derive(Clone)]
pub struct MongoThreadRepository {
    client: Client,
    database: String,
    collection: Collection<MongoThread>,
}

impl MongoThreadRepository {
    /// Connect to MongoDB and make sure the listing index exists.
    pub async fn connect(uri: &str, database: &str) -> std::result::Result<Self, StorageError> {
        let client = Client::with_uri_str(uri).await?;
        let repo = Self::new(&client, database);
        repo.ensure_indexes().await?;
        tracing::info!(database, "mongodb store ready");
        Ok(repo)
    }

    pub fn new(client: &Client, database: &str) -> Self {
        let collection = client.database(database).collection("threads");
        Self {
            client: client.clone(),
            database: database.to_string(),
            collection,
        }
    }

    async fn ensure_indexes(&self) -> std::result::Result<(), StorageError> {
        let index = IndexModel::builder()
            .keys(doc! { "board": 1, "bumped_on": -1 })
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }

    fn by_id(id: ThreadId) -> Document {
        doc! { "_id": id.to_string() }
    }

    fn by_reply(thread_id: ThreadId, reply_id: ReplyId) -> Document {
        doc! { "_id": thread_id.to_string(), "replies._id": reply_id.to_string() }
    }

    async fn fetch(&self, id: ThreadId) -> std::result::Result<Option<Thread>, StorageError> {
        self.collection
            .find_one(Self::by_id(id))
            .await?
            .map(Thread::try_from)
            .transpose()
    }

    async fn fetch_board(
        &self,
        board: &str,
        limit: usize,
        reply_preview: usize,
    ) -> std::result::Result<Vec<Thread>, StorageError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        // Negative $slice keeps the tail of the array.
        let slice = -i64::try_from(reply_preview).unwrap_or(i64::MAX);

        let docs: Vec<MongoThread> = self
            .collection
            .find(doc! { "board": board })
            .sort(doc! { "bumped_on": -1, "_id": -1 })
            .limit(limit)
            .projection(doc! { "replies": { "$slice": slice } })
            .await?
            .try_collect()
            .await?;

        docs.into_iter().map(Thread::try_from).collect()
    }

    async fn append(&self, thread_id: ThreadId, reply: &Reply) -> std::result::Result<bool, StorageError> {
        let update = doc! {
            "$push": { "replies": bson::to_bson(&MongoReply::from(reply))? },
            "$max": { "bumped_on": bson::DateTime::from_chrono(reply.created_on) },
        };
        let result = self.collection.update_one(Self::by_id(thread_id), update).await?;
        Ok(result.matched_count > 0)
    }

    async fn update_reply(
        &self,
        thread_id: ThreadId,
        reply_id: ReplyId,
        set: Document,
    ) -> std::result::Result<bool, StorageError> {
        let result = self
            .collection
            .update_one(Self::by_reply(thread_id, reply_id), doc! { "$set": set })
            .await?;
        Ok(result.matched_count > 0)
    }
}

#[async_trait]
impl ThreadRepository for MongoThreadRepository {
    async fn insert_thread(&self, thread: &Thread) -> Result<()> {
        self.collection
            .insert_one(MongoThread::from(thread))
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    async fn find_thread(&self, id: ThreadId) -> Result<Option<Thread>> {
        Ok(self.fetch(id).await?)
    }

    async fn list_threads(&self, board: &str, limit: usize, reply_preview: usize) -> Result<Vec<Thread>> {
        Ok(self.fetch_board(board, limit, reply_preview).await?)
    }

    async fn remove_thread(&self, id: ThreadId) -> Result<bool> {
        let result = self
            .collection
            .delete_one(Self::by_id(id))
            .await
            .map_err(StorageError::from)?;
        Ok(result.deleted_count > 0)
    }

    async fn flag_thread(&self, id: ThreadId) -> Result<()> {
        self.collection
            .update_one(Self::by_id(id), doc! { "$set": { "reported": true } })
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    async fn push_reply(&self, thread_id: ThreadId, reply: &Reply) -> Result<bool> {
        Ok(self.append(thread_id, reply).await?)
    }

    async fn set_reply_text(&self, thread_id: ThreadId, reply_id: ReplyId, text: &str) -> Result<bool> {
        Ok(self
            .update_reply(thread_id, reply_id, doc! { "replies.$.text": text })
            .await?)
    }

    async fn flag_reply(&self, thread_id: ThreadId, reply_id: ReplyId) -> Result<()> {
        self.update_reply(thread_id, reply_id, doc! { "replies.$.reported": true })
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }
}
