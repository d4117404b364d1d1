//! # Core Traits (Ports)
//!
//! Any storage backend must implement these traits to be used by the binary.

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::{Reply, ReplyId, Thread, ThreadId};

/// Data persistence contract for threads and their embedded replies.
///
/// Each method maps onto a single store operation, so it is atomic for the
/// one thread document it touches and nothing more.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ThreadRepository: Send + Sync {
    async fn insert_thread(&self, thread: &Thread) -> Result<()>;

    async fn find_thread(&self, id: ThreadId) -> Result<Option<Thread>>;

    /// Threads of `board`, most recently bumped first, at most `limit` of
    /// them, each carrying only its last `reply_preview` replies.
    async fn list_threads(&self, board: &str, limit: usize, reply_preview: usize) -> Result<Vec<Thread>>;

    /// Hard delete, replies included. Returns whether anything was removed.
    async fn remove_thread(&self, id: ThreadId) -> Result<bool>;

    /// Sets the reported flag if the thread exists.
    async fn flag_thread(&self, id: ThreadId) -> Result<()>;

    /// Appends `reply` and raises `bumped_on` to its `created_on`.
    /// Returns `false` when the thread does not exist.
    async fn push_reply(&self, thread_id: ThreadId, reply: &Reply) -> Result<bool>;

    /// Overwrites a reply's text. Returns `false` when thread or reply is missing.
    async fn set_reply_text(&self, thread_id: ThreadId, reply_id: ReplyId, text: &str) -> Result<bool>;

    /// Sets the reported flag on a reply if it exists.
    async fn flag_reply(&self, thread_id: ThreadId, reply_id: ReplyId) -> Result<()>;

    /// Cheap round trip used by health checks.
    async fn ping(&self) -> Result<()>;
}
