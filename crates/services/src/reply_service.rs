//! Reply-level operations, plus the full single-thread view they are read through.

use std::sync::Arc;

use domains::{
    time, DomainError, Reply, ReplyId, Result, ThreadId, ThreadRepository, ThreadView, DELETED_REPLY_TEXT,
};
use tracing::instrument;

use crate::outcome::{DeleteOutcome, Reported};
use crate::{parse_id, require};

#[derive(Clone)]
pub struct ReplyService {
    repo: Arc<dyn ThreadRepository>,
}

impl ReplyService {
    pub fn new(repo: Arc<dyn ThreadRepository>) -> Self {
        Self { repo }
    }

    /// Appends a reply to a thread and bumps it. Returns the new reply's id.
    #[instrument(skip(self, text, delete_password))]
    pub async fn add_reply(&self, thread_id: &str, text: &str, delete_password: &str) -> Result<ReplyId> {
        require("text", text)?;
        require("delete_password", delete_password)?;
        require("thread_id", thread_id)?;

        let id: ThreadId = parse_id(thread_id).ok_or_else(|| DomainError::thread_not_found(thread_id))?;
        let thread = self
            .repo
            .find_thread(id)
            .await?
            .ok_or_else(|| DomainError::thread_not_found(thread_id))?;

        let reply = Reply::new(text, delete_password, time::strictly_after(thread.bumped_on));
        if !self.repo.push_reply(id, &reply).await? {
            return Err(DomainError::thread_not_found(thread_id));
        }

        tracing::info!(reply_id = %reply.id, "reply added");
        Ok(reply.id)
    }

    /// A thread with every reply, in the order they were posted.
    #[instrument(skip(self))]
    pub async fn get_thread(&self, thread_id: &str) -> Result<ThreadView> {
        let id: ThreadId = parse_id(thread_id).ok_or_else(|| DomainError::thread_not_found(thread_id))?;
        let thread = self
            .repo
            .find_thread(id)
            .await?
            .ok_or_else(|| DomainError::thread_not_found(thread_id))?;
        Ok(thread.detail())
    }

    /// Blanks a reply's text if the password matches. The reply itself stays.
    #[instrument(skip(self, delete_password))]
    pub async fn delete_reply(&self, thread_id: &str, reply_id: &str, delete_password: &str) -> Result<DeleteOutcome> {
        let tid: ThreadId = parse_id(thread_id).ok_or_else(|| DomainError::thread_not_found(thread_id))?;
        let rid: ReplyId = parse_id(reply_id).ok_or_else(|| DomainError::reply_not_found(reply_id))?;

        let thread = self
            .repo
            .find_thread(tid)
            .await?
            .ok_or_else(|| DomainError::thread_not_found(thread_id))?;
        let reply = thread.reply(rid).ok_or_else(|| DomainError::reply_not_found(reply_id))?;

        if !reply.password_matches(delete_password) {
            tracing::info!("reply delete rejected: incorrect password");
            return Ok(DeleteOutcome::IncorrectPassword);
        }

        if reply.is_deleted() {
            return Ok(DeleteOutcome::Success);
        }

        if !self.repo.set_reply_text(tid, rid, DELETED_REPLY_TEXT).await? {
            return Err(DomainError::reply_not_found(reply_id));
        }

        tracing::info!("reply deleted");
        Ok(DeleteOutcome::Success)
    }

    /// Flags a reply for moderation. Unknown ids are silently ignored.
    #[instrument(skip(self))]
    pub async fn report_reply(&self, thread_id: &str, reply_id: &str) -> Result<Reported> {
        if let (Some(tid), Some(rid)) = (parse_id::<ThreadId>(thread_id), parse_id::<ReplyId>(reply_id)) {
            self.repo.flag_reply(tid, rid).await?;
        }
        Ok(Reported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use domains::{MockThreadRepository, Thread};
    use mockall::predicate::eq;

    fn service(repo: MockThreadRepository) -> ReplyService {
        ReplyService::new(Arc::new(repo))
    }

    fn thread_with_reply(password: &str) -> (Thread, ReplyId) {
        let mut thread = Thread::new("b", "op", "tpw");
        let reply = Reply::new("hi", password, time::strictly_after(thread.bumped_on));
        let rid = reply.id;
        thread.append(reply);
        (thread, rid)
    }

    #[tokio::test]
    async fn test_add_reply_bumps_past_thread() {
        let thread = Thread::new("b", "op", "pw");
        let id = thread.id;
        let bumped = thread.bumped_on;

        let mut repo = MockThreadRepository::new();
        repo.expect_find_thread()
            .with(eq(id))
            .returning(move |_| Ok(Some(thread.clone())));
        repo.expect_push_reply()
            .withf(move |tid: &ThreadId, reply: &Reply| {
                *tid == id && reply.text == "hi" && !reply.reported && reply.created_on > bumped
            })
            .times(1)
            .returning(|_, _| Ok(true));

        service(repo).add_reply(&id.to_string(), "hi", "rpw").await.unwrap();
    }

    #[tokio::test]
    async fn test_add_reply_to_future_bumped_thread_still_advances() {
        let mut thread = Thread::new("b", "op", "pw");
        thread.bumped_on += TimeDelta::seconds(30);
        let bumped = thread.bumped_on;

        let mut repo = MockThreadRepository::new();
        repo.expect_find_thread()
            .returning(move |_| Ok(Some(thread.clone())));
        repo.expect_push_reply()
            .withf(move |_, reply: &Reply| reply.created_on == bumped + TimeDelta::milliseconds(1))
            .returning(|_, _| Ok(true));

        service(repo).add_reply(&ThreadId::new().to_string(), "hi", "rpw").await.unwrap();
    }

    #[tokio::test]
    async fn test_add_reply_validation_and_missing_thread() {
        let mut repo = MockThreadRepository::new();
        repo.expect_find_thread().returning(|_| Ok(None));
        let svc = service(repo);

        let err = svc.add_reply("", "hi", "pw").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        let err = svc.add_reply(&ThreadId::new().to_string(), "", "pw").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        let err = svc.add_reply(&ThreadId::new().to_string(), "hi", "pw").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_add_reply_thread_vanished_before_push() {
        let thread = Thread::new("b", "op", "pw");
        let mut repo = MockThreadRepository::new();
        repo.expect_find_thread()
            .returning(move |_| Ok(Some(thread.clone())));
        repo.expect_push_reply().returning(|_, _| Ok(false));

        let err = service(repo)
            .add_reply(&ThreadId::new().to_string(), "hi", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_thread_returns_all_replies() {
        let (mut thread, _) = thread_with_reply("pw");
        for i in 0..4 {
            let at = time::strictly_after(thread.bumped_on);
            thread.append(Reply::new(format!("more {i}"), "pw", at));
        }
        let id = thread.id;

        let mut repo = MockThreadRepository::new();
        repo.expect_find_thread()
            .returning(move |_| Ok(Some(thread.clone())));

        let view = service(repo).get_thread(&id.to_string()).await.unwrap();
        assert_eq!(view.replies.len(), 5);
        assert_eq!(view.replies[0].text, "hi");
        assert_eq!(view.replies[4].text, "more 3");
    }

    #[tokio::test]
    async fn test_get_thread_bad_id_is_not_found() {
        let svc = service(MockThreadRepository::new());
        let err = svc.get_thread("").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_reply_wrong_password() {
        let (thread, rid) = thread_with_reply("right");
        let tid = thread.id;

        let mut repo = MockThreadRepository::new();
        repo.expect_find_thread()
            .returning(move |_| Ok(Some(thread.clone())));
        repo.expect_set_reply_text().never();

        let outcome = service(repo)
            .delete_reply(&tid.to_string(), &rid.to_string(), "wrong")
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::IncorrectPassword);
    }

    #[tokio::test]
    async fn test_delete_reply_blanks_text() {
        let (thread, rid) = thread_with_reply("right");
        let tid = thread.id;

        let mut repo = MockThreadRepository::new();
        repo.expect_find_thread()
            .returning(move |_| Ok(Some(thread.clone())));
        repo.expect_set_reply_text()
            .withf(move |t: &ThreadId, r: &ReplyId, text: &str| *t == tid && *r == rid && text == "[deleted]")
            .times(1)
            .returning(|_, _, _| Ok(true));

        let outcome = service(repo)
            .delete_reply(&tid.to_string(), &rid.to_string(), "right")
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::Success);
    }

    #[tokio::test]
    async fn test_delete_already_deleted_reply_skips_write() {
        let (mut thread, rid) = thread_with_reply("right");
        thread.replies[0].text = DELETED_REPLY_TEXT.to_string();
        let tid = thread.id;

        let mut repo = MockThreadRepository::new();
        repo.expect_find_thread()
            .returning(move |_| Ok(Some(thread.clone())));
        repo.expect_set_reply_text().never();

        let outcome = service(repo)
            .delete_reply(&tid.to_string(), &rid.to_string(), "right")
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::Success);
    }

    #[tokio::test]
    async fn test_delete_reply_unknown_reply_is_not_found() {
        let (thread, _) = thread_with_reply("pw");
        let tid = thread.id;

        let mut repo = MockThreadRepository::new();
        repo.expect_find_thread()
            .returning(move |_| Ok(Some(thread.clone())));
        let svc = service(repo);

        let err = svc
            .delete_reply(&tid.to_string(), &ReplyId::new().to_string(), "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let err = svc.delete_reply(&tid.to_string(), "", "pw").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_report_reply_is_idempotent() {
        let tid = ThreadId::new();
        let rid = ReplyId::new();

        let mut repo = MockThreadRepository::new();
        repo.expect_flag_reply()
            .with(eq(tid), eq(rid))
            .times(2)
            .returning(|_, _| Ok(()));
        let svc = service(repo);

        for _ in 0..2 {
            let outcome = svc.report_reply(&tid.to_string(), &rid.to_string()).await.unwrap();
            assert_eq!(outcome.as_str(), "reported");
        }
    }
}
