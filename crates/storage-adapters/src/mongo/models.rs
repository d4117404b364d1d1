//! MongoDB document shapes. Replies are embedded in their thread document.

use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use domains::{Reply, ReplyId, Thread, ThreadId};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoThread {
    #[serde(rename = "_id")]
    pub id: String,
    pub board: String,
    pub text: String,
    pub delete_password: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_on: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub bumped_on: DateTime<Utc>,
    #[serde(default)]
    pub reported: bool,
    #[serde(default)]
    pub replies: Vec<MongoReply>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoReply {
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
    pub delete_password: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_on: DateTime<Utc>,
    #[serde(default)]
    pub reported: bool,
}

// Conversions between domain and MongoDB-specific models

impl From<&Thread> for MongoThread {
    fn from(thread: &Thread) -> Self {
        Self {
            id: thread.id.to_string(),
            board: thread.board.clone(),
            text: thread.text.clone(),
            delete_password: thread.delete_password.clone(),
            created_on: thread.created_on,
            bumped_on: thread.bumped_on,
            reported: thread.reported,
            replies: thread.replies.iter().map(MongoReply::from).collect(),
        }
    }
}

impl From<&Reply> for MongoReply {
    fn from(reply: &Reply) -> Self {
        Self {
            id: reply.id.to_string(),
            text: reply.text.clone(),
            delete_password: reply.delete_password.clone(),
            created_on: reply.created_on,
            reported: reply.reported,
        }
    }
}

impl TryFrom<MongoThread> for Thread {
    type Error = StorageError;

    fn try_from(doc: MongoThread) -> Result<Self, Self::Error> {
        let id: ThreadId = doc
            .id
            .parse()
            .map_err(|_| StorageError::Corrupt(format!("thread _id {:?}", doc.id)))?;
        let replies = doc
            .replies
            .into_iter()
            .map(Reply::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id,
            board: doc.board,
            text: doc.text,
            delete_password: doc.delete_password,
            created_on: doc.created_on,
            bumped_on: doc.bumped_on,
            reported: doc.reported,
            replies,
        })
    }
}

impl TryFrom<MongoReply> for Reply {
    type Error = StorageError;

    fn try_from(doc: MongoReply) -> Result<Self, Self::Error> {
        let id: ReplyId = doc
            .id
            .parse()
            .map_err(|_| StorageError::Corrupt(format!("reply _id {:?}", doc.id)))?;

        Ok(Self {
            id,
            text: doc.text,
            delete_password: doc.delete_password,
            created_on: doc.created_on,
            reported: doc.reported,
        })
    }
}
