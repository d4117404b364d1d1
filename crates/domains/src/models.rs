//! # Domain Models
//!
//! A board is nothing more than a name that threads are filed under. Threads
//! own their replies outright: a reply never exists outside the thread it was
//! posted to, and it is never removed from it (deletion only blanks its text).
//! We use UUID v7 for time-ordered, globally unique identification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::time;

/// Text a reply is overwritten with once its author deletes it.
pub const DELETED_REPLY_TEXT: &str = "[deleted]";

/// Maximum number of threads returned by a board listing.
pub const THREAD_PAGE_SIZE: usize = 10;

/// Number of most recent replies shown under each thread of a board listing.
pub const REPLY_PREVIEW: usize = 3;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }
    };
}

entity_id!(
    /// Identifies a thread across every board.
    ThreadId
);

entity_id!(
    /// Identifies a reply; unique within its parent thread (and in practice everywhere).
    ReplyId
);

/// A thread and every reply ever posted to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    pub id: ThreadId,
    /// The board this thread was created on. Never changes.
    pub board: String,
    pub text: String,
    /// Compared verbatim on delete. Not a credential.
    pub delete_password: String,
    pub created_on: DateTime<Utc>,
    /// The timestamp used for sorting threads by activity
    pub bumped_on: DateTime<Utc>,
    pub reported: bool,
    /// Insertion order, append-only.
    pub replies: Vec<Reply>,
}

impl Thread {
    /// Builds a fresh thread stamped with the current time.
    pub fn new(board: impl Into<String>, text: impl Into<String>, delete_password: impl Into<String>) -> Self {
        let now = time::now();
        Self {
            id: ThreadId::new(),
            board: board.into(),
            text: text.into(),
            delete_password: delete_password.into(),
            created_on: now,
            bumped_on: now,
            reported: false,
            replies: Vec::new(),
        }
    }

    pub fn reply(&self, id: ReplyId) -> Option<&Reply> {
        self.replies.iter().find(|r| r.id == id)
    }

    pub fn reply_mut(&mut self, id: ReplyId) -> Option<&mut Reply> {
        self.replies.iter_mut().find(|r| r.id == id)
    }

    /// Appends a reply and bumps the thread. The bump never moves backwards,
    /// even if a reply with an older timestamp arrives late.
    pub fn append(&mut self, reply: Reply) {
        if reply.created_on > self.bumped_on {
            self.bumped_on = reply.created_on;
        }
        self.replies.push(reply);
    }

    pub fn password_matches(&self, candidate: &str) -> bool {
        self.delete_password == candidate
    }

    /// Drops all but the last `keep` replies, preserving their order.
    pub fn truncate_replies(&mut self, keep: usize) {
        let excess = self.replies.len().saturating_sub(keep);
        self.replies.drain(..excess);
    }

    /// Public view of the thread with whatever replies it currently carries.
    pub fn detail(&self) -> ThreadView {
        ThreadView {
            id: self.id,
            text: self.text.clone(),
            created_on: self.created_on,
            bumped_on: self.bumped_on,
            replies: self.replies.iter().map(Reply::view).collect(),
        }
    }
}

/// A reply lives inside exactly one thread.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub id: ReplyId,
    pub text: String,
    pub delete_password: String,
    pub created_on: DateTime<Utc>,
    pub reported: bool,
}

impl Reply {
    pub fn new(text: impl Into<String>, delete_password: impl Into<String>, created_on: DateTime<Utc>) -> Self {
        Self {
            id: ReplyId::new(),
            text: text.into(),
            delete_password: delete_password.into(),
            created_on,
            reported: false,
        }
    }

    pub fn password_matches(&self, candidate: &str) -> bool {
        self.delete_password == candidate
    }

    pub fn is_deleted(&self) -> bool {
        self.text == DELETED_REPLY_TEXT
    }

    pub fn view(&self) -> ReplyView {
        ReplyView {
            id: self.id,
            text: self.text.clone(),
            created_on: self.created_on,
        }
    }
}

/// What clients get to see of a thread: no board, password or report flag.
///
/// Used both for board listings (replies capped) and the single-thread
/// view (all replies).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadView {
    #[serde(rename = "_id")]
    pub id: ThreadId,
    pub text: String,
    pub created_on: DateTime<Utc>,
    pub bumped_on: DateTime<Utc>,
    pub replies: Vec<ReplyView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyView {
    #[serde(rename = "_id")]
    pub id: ReplyId,
    pub text: String,
    pub created_on: DateTime<Utc>,
}
