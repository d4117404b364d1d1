//! # PostgreSQL store
//!
//! This module implements the data mapping between the relational model and
//! the domain models. Replies live in a child table ordered by `seq`; the
//! thread aggregate is reassembled on read.

use std::collections::HashMap;

use async_trait::async_trait;
use domains::{Reply, ReplyId, Result, Thread, ThreadId, ThreadRepository};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

use crate::error::StorageError;

type StorageResult<T> = std::result::Result<T, StorageError>;

const THREAD_COLUMNS: &str = "id, board, text, delete_password, created_on, bumped_on, reported";

#[derive(Clone)]
pub struct PgThreadRepository {
    pool: PgPool,
}

impl PgThreadRepository {
    /// Opens a pool and applies pending migrations.
    pub async fn connect(url: &str, max_connections: u32) -> StorageResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("postgres store ready");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: ThreadId) -> StorageResult<Option<Thread>> {
        let row = sqlx::query(&format!("SELECT {THREAD_COLUMNS} FROM threads WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut thread = thread_from_row(&row)?;

        thread.replies = sqlx::query(
            "SELECT id, text, delete_password, created_on, reported FROM replies WHERE thread_id = $1 ORDER BY seq",
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(reply_from_row)
        .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Some(thread))
    }

    async fn fetch_board(&self, board: &str, limit: usize, reply_preview: usize) -> StorageResult<Vec<Thread>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let preview = i64::try_from(reply_preview).unwrap_or(i64::MAX);

        let mut threads = sqlx::query(&format!(
            "SELECT {THREAD_COLUMNS} FROM threads WHERE board = $1 ORDER BY bumped_on DESC, id DESC LIMIT $2"
        ))
        .bind(board)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(thread_from_row)
        .collect::<std::result::Result<Vec<_>, _>>()?;

        if threads.is_empty() {
            return Ok(threads);
        }

        let ids: Vec<Uuid> = threads.iter().map(|t| t.id.as_uuid()).collect();
        let rows = sqlx::query(
            "SELECT thread_id, id, text, delete_password, created_on, reported FROM ( \
                 SELECT r.*, ROW_NUMBER() OVER (PARTITION BY r.thread_id ORDER BY r.seq DESC) AS rn \
                 FROM replies r WHERE r.thread_id = ANY($1) \
             ) latest WHERE rn <= $2 ORDER BY thread_id, seq",
        )
        .bind(&ids)
        .bind(preview)
        .fetch_all(&self.pool)
        .await?;

        let mut by_thread: HashMap<Uuid, Vec<Reply>> = HashMap::new();
        for row in &rows {
            let thread_id: Uuid = row.try_get("thread_id")?;
            by_thread.entry(thread_id).or_default().push(reply_from_row(row)?);
        }
        for thread in &mut threads {
            thread.replies = by_thread.remove(&thread.id.as_uuid()).unwrap_or_default();
        }

        Ok(threads)
    }

    async fn insert(&self, thread: &Thread) -> StorageResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO threads (id, board, text, delete_password, created_on, bumped_on, reported) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(thread.id.as_uuid())
        .bind(&thread.board)
        .bind(&thread.text)
        .bind(&thread.delete_password)
        .bind(thread.created_on)
        .bind(thread.bumped_on)
        .bind(thread.reported)
        .execute(&mut *tx)
        .await?;

        for reply in &thread.replies {
            insert_reply(&mut tx, thread.id, reply).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Bump and append in one transaction. The UPDATE takes the thread row
    /// lock, so concurrent appends to one thread serialize here.
    async fn append(&self, thread_id: ThreadId, reply: &Reply) -> StorageResult<bool> {
        let mut tx = self.pool.begin().await?;

        let bumped = sqlx::query("UPDATE threads SET bumped_on = GREATEST(bumped_on, $2) WHERE id = $1")
            .bind(thread_id.as_uuid())
            .bind(reply.created_on)
            .execute(&mut *tx)
            .await?;

        if bumped.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        insert_reply(&mut tx, thread_id, reply).await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn execute(&self, sql: &str, thread_id: ThreadId, reply_id: Option<ReplyId>) -> StorageResult<u64> {
        let mut query = sqlx::query(sql).bind(thread_id.as_uuid());
        if let Some(reply_id) = reply_id {
            query = query.bind(reply_id.as_uuid());
        }
        Ok(query.execute(&self.pool).await?.rows_affected())
    }

    async fn rewrite_reply(&self, thread_id: ThreadId, reply_id: ReplyId, text: &str) -> StorageResult<bool> {
        let updated = sqlx::query("UPDATE replies SET text = $3 WHERE thread_id = $1 AND id = $2")
            .bind(thread_id.as_uuid())
            .bind(reply_id.as_uuid())
            .bind(text)
            .execute(&self.pool)
            .await?;
        Ok(updated.rows_affected() > 0)
    }
}

async fn insert_reply(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    thread_id: ThreadId,
    reply: &Reply,
) -> StorageResult<()> {
    sqlx::query(
        "INSERT INTO replies (id, thread_id, text, delete_password, created_on, reported) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(reply.id.as_uuid())
    .bind(thread_id.as_uuid())
    .bind(&reply.text)
    .bind(&reply.delete_password)
    .bind(reply.created_on)
    .bind(reply.reported)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

fn thread_from_row(row: &PgRow) -> std::result::Result<Thread, sqlx::Error> {
    Ok(Thread {
        id: ThreadId::from_uuid(row.try_get("id")?),
        board: row.try_get("board")?,
        text: row.try_get("text")?,
        delete_password: row.try_get("delete_password")?,
        created_on: row.try_get("created_on")?,
        bumped_on: row.try_get("bumped_on")?,
        reported: row.try_get("reported")?,
        replies: Vec::new(),
    })
}

fn reply_from_row(row: &PgRow) -> std::result::Result<Reply, sqlx::Error> {
    Ok(Reply {
        id: ReplyId::from_uuid(row.try_get("id")?),
        text: row.try_get("text")?,
        delete_password: row.try_get("delete_password")?,
        created_on: row.try_get("created_on")?,
        reported: row.try_get("reported")?,
    })
}

#[async_trait]
impl ThreadRepository for PgThreadRepository {
    async fn insert_thread(&self, thread: &Thread) -> Result<()> {
        Ok(self.insert(thread).await?)
    }

    async fn find_thread(&self, id: ThreadId) -> Result<Option<Thread>> {
        Ok(self.fetch(id).await?)
    }

    async fn list_threads(&self, board: &str, limit: usize, reply_preview: usize) -> Result<Vec<Thread>> {
        Ok(self.fetch_board(board, limit, reply_preview).await?)
    }

    async fn remove_thread(&self, id: ThreadId) -> Result<bool> {
        Ok(self.execute("DELETE FROM threads WHERE id = $1", id, None).await? > 0)
    }

    async fn flag_thread(&self, id: ThreadId) -> Result<()> {
        self.execute("UPDATE threads SET reported = TRUE WHERE id = $1", id, None)
            .await?;
        Ok(())
    }

    async fn push_reply(&self, thread_id: ThreadId, reply: &Reply) -> Result<bool> {
        Ok(self.append(thread_id, reply).await?)
    }

    async fn set_reply_text(&self, thread_id: ThreadId, reply_id: ReplyId, text: &str) -> Result<bool> {
        Ok(self.rewrite_reply(thread_id, reply_id, text).await?)
    }

    async fn flag_reply(&self, thread_id: ThreadId, reply_id: ReplyId) -> Result<()> {
        self.execute(
            "UPDATE replies SET reported = TRUE WHERE thread_id = $1 AND id = $2",
            thread_id,
            Some(reply_id),
        )
        .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }
}
