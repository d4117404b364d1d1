//! # In-memory store
//!
//! `DashMap`-backed implementation of `ThreadRepository`. Every mutation
//! happens under the shard lock of the one thread it touches, which gives
//! the same per-document atomicity a document store provides.
//! Used by tests and by the `memory` backend for local development.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use domains::{Reply, ReplyId, Result, Thread, ThreadId, ThreadRepository};

#[derive(Debug, Clone, Default)]
pub struct InMemoryThreadRepository {
    threads: Arc<DashMap<ThreadId, Thread>>,
}

impl InMemoryThreadRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `f` to a reply if both it and its thread exist.
    fn with_reply(&self, thread_id: ThreadId, reply_id: ReplyId, f: impl FnOnce(&mut Reply)) -> bool {
        let Some(mut thread) = self.threads.get_mut(&thread_id) else {
            return false;
        };
        match thread.reply_mut(reply_id) {
            Some(reply) => {
                f(reply);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl ThreadRepository for InMemoryThreadRepository {
    async fn insert_thread(&self, thread: &Thread) -> Result<()> {
        self.threads.insert(thread.id, thread.clone());
        Ok(())
    }

    async fn find_thread(&self, id: ThreadId) -> Result<Option<Thread>> {
        Ok(self.threads.get(&id).map(|t| t.value().clone()))
    }

    async fn list_threads(&self, board: &str, limit: usize, reply_preview: usize) -> Result<Vec<Thread>> {
        let mut threads: Vec<Thread> = self
            .threads
            .iter()
            .filter(|entry| entry.board == board)
            .map(|entry| entry.value().clone())
            .collect();

        threads.sort_by(|a, b| b.bumped_on.cmp(&a.bumped_on).then_with(|| b.id.cmp(&a.id)));
        threads.truncate(limit);
        for thread in &mut threads {
            thread.truncate_replies(reply_preview);
        }
        Ok(threads)
    }

    async fn remove_thread(&self, id: ThreadId) -> Result<bool> {
        Ok(self.threads.remove(&id).is_some())
    }

    async fn flag_thread(&self, id: ThreadId) -> Result<()> {
        if let Some(mut thread) = self.threads.get_mut(&id) {
            thread.reported = true;
        }
        Ok(())
    }

    async fn push_reply(&self, thread_id: ThreadId, reply: &Reply) -> Result<bool> {
        match self.threads.get_mut(&thread_id) {
            Some(mut thread) => {
                thread.append(reply.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_reply_text(&self, thread_id: ThreadId, reply_id: ReplyId, text: &str) -> Result<bool> {
        Ok(self.with_reply(thread_id, reply_id, |reply| reply.text = text.to_string()))
    }

    async fn flag_reply(&self, thread_id: ThreadId, reply_id: ReplyId) -> Result<()> {
        self.with_reply(thread_id, reply_id, |reply| reply.reported = true);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use domains::time;

    async fn seeded(repo: &InMemoryThreadRepository, board: &str, offset_ms: i64) -> Thread {
        let mut thread = Thread::new(board, format!("thread at {offset_ms}"), "pw");
        thread.created_on += TimeDelta::milliseconds(offset_ms);
        thread.bumped_on = thread.created_on;
        repo.insert_thread(&thread).await.unwrap();
        thread
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryThreadRepository::new();
        let thread = seeded(&repo, "b", 0).await;

        let found = repo.find_thread(thread.id).await.unwrap();
        assert_eq!(found, Some(thread));
        assert!(repo.find_thread(ThreadId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_sorts_and_limits() {
        let repo = InMemoryThreadRepository::new();
        for i in 0..12 {
            seeded(&repo, "b", i).await;
        }
        seeded(&repo, "other", 100).await;

        let threads = repo.list_threads("b", 10, 3).await.unwrap();
        assert_eq!(threads.len(), 10);
        assert!(threads.iter().all(|t| t.board == "b"));
        assert!(threads.windows(2).all(|w| w[0].bumped_on >= w[1].bumped_on));
        assert_eq!(threads[0].text, "thread at 11");
    }

    #[tokio::test]
    async fn test_push_reply_bumps_and_preview_truncates() {
        let repo = InMemoryThreadRepository::new();
        let older = seeded(&repo, "b", 0).await;
        let newer = seeded(&repo, "b", 50).await;

        let mut last = newer.bumped_on;
        for i in 0..4 {
            let reply = Reply::new(format!("r{i}"), "pw", time::strictly_after(last));
            last = reply.created_on;
            assert!(repo.push_reply(older.id, &reply).await.unwrap());
        }

        let threads = repo.list_threads("b", 10, 3).await.unwrap();
        assert_eq!(threads[0].id, older.id);
        assert_eq!(threads[0].bumped_on, last);
        let texts: Vec<_> = threads[0].replies.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, ["r1", "r2", "r3"]);

        // Stored thread keeps the full history.
        let stored = repo.find_thread(older.id).await.unwrap().unwrap();
        assert_eq!(stored.replies.len(), 4);
    }

    #[tokio::test]
    async fn test_push_reply_to_missing_thread() {
        let repo = InMemoryThreadRepository::new();
        let reply = Reply::new("r", "pw", time::now());
        assert!(!repo.push_reply(ThreadId::new(), &reply).await.unwrap());
    }

    #[tokio::test]
    async fn test_reply_mutations() {
        let repo = InMemoryThreadRepository::new();
        let thread = seeded(&repo, "b", 0).await;
        let reply = Reply::new("r", "pw", time::strictly_after(thread.bumped_on));
        repo.push_reply(thread.id, &reply).await.unwrap();

        assert!(repo.set_reply_text(thread.id, reply.id, "[deleted]").await.unwrap());
        assert!(!repo.set_reply_text(thread.id, ReplyId::new(), "x").await.unwrap());
        repo.flag_reply(thread.id, reply.id).await.unwrap();
        repo.flag_reply(ThreadId::new(), reply.id).await.unwrap();

        let stored = repo.find_thread(thread.id).await.unwrap().unwrap();
        assert_eq!(stored.replies[0].text, "[deleted]");
        assert!(stored.replies[0].reported);
    }

    #[tokio::test]
    async fn test_flag_and_remove_thread() {
        let repo = InMemoryThreadRepository::new();
        let thread = seeded(&repo, "b", 0).await;

        repo.flag_thread(thread.id).await.unwrap();
        repo.flag_thread(ThreadId::new()).await.unwrap();
        assert!(repo.find_thread(thread.id).await.unwrap().unwrap().reported);

        assert!(repo.remove_thread(thread.id).await.unwrap());
        assert!(!repo.remove_thread(thread.id).await.unwrap());
        assert!(repo.find_thread(thread.id).await.unwrap().is_none());
    }
}
