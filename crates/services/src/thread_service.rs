//! Thread-level operations: create, list a board, delete, report.

use std::sync::Arc;

use domains::{DomainError, Result, Thread, ThreadId, ThreadRepository, ThreadView, REPLY_PREVIEW, THREAD_PAGE_SIZE};
use tracing::instrument;

use crate::outcome::{DeleteOutcome, Reported};
use crate::{parse_id, require};

#[derive(Clone)]
pub struct ThreadService {
    repo: Arc<dyn ThreadRepository>,
}

impl ThreadService {
    pub fn new(repo: Arc<dyn ThreadRepository>) -> Self {
        Self { repo }
    }

    /// Starts a new thread on `board`. The returned view has no replies and
    /// `bumped_on == created_on`.
    #[instrument(skip(self, text, delete_password))]
    pub async fn create_thread(&self, board: &str, text: &str, delete_password: &str) -> Result<ThreadView> {
        require("board", board)?;
        require("text", text)?;
        require("delete_password", delete_password)?;

        let thread = Thread::new(board, text, delete_password);
        self.repo.insert_thread(&thread).await?;

        tracing::info!(thread_id = %thread.id, "thread created");
        Ok(thread.detail())
    }

    /// The most recently bumped threads of `board` with a short reply preview.
    /// The store applies both caps; threads come back already trimmed.
    #[instrument(skip(self))]
    pub async fn list_threads(&self, board: &str) -> Result<Vec<ThreadView>> {
        let threads = self.repo.list_threads(board, THREAD_PAGE_SIZE, REPLY_PREVIEW).await?;
        tracing::debug!(count = threads.len(), "threads listed");

        Ok(threads.iter().map(Thread::detail).collect())
    }

    /// Removes a thread and all of its replies if the password matches.
    #[instrument(skip(self, delete_password))]
    pub async fn delete_thread(&self, thread_id: &str, delete_password: &str) -> Result<DeleteOutcome> {
        require("thread_id", thread_id)?;
        require("delete_password", delete_password)?;

        let id: ThreadId = parse_id(thread_id).ok_or_else(|| DomainError::thread_not_found(thread_id))?;
        let thread = self
            .repo
            .find_thread(id)
            .await?
            .ok_or_else(|| DomainError::thread_not_found(thread_id))?;

        if !thread.password_matches(delete_password) {
            tracing::info!("thread delete rejected: incorrect password");
            return Ok(DeleteOutcome::IncorrectPassword);
        }

        // Lost a race with another delete.
        if !self.repo.remove_thread(id).await? {
            return Err(DomainError::thread_not_found(thread_id));
        }

        tracing::info!("thread deleted");
        Ok(DeleteOutcome::Success)
    }

    /// Flags a thread for moderation. Unknown ids are silently ignored.
    #[instrument(skip(self))]
    pub async fn report_thread(&self, thread_id: &str) -> Result<Reported> {
        if let Some(id) = parse_id::<ThreadId>(thread_id) {
            self.repo.flag_thread(id).await?;
        }
        Ok(Reported)
    }
}
