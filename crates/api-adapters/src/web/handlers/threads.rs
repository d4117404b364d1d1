use axum::{
    extract::{Path, State},
    Json,
};
use domains::ThreadView;

use crate::dto::{CreateThreadRequest, DeleteThreadRequest, ReportThreadRequest};
use crate::web::{extract::Payload, ApiResult, AppState};

pub async fn create_thread(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Payload(req): Payload<CreateThreadRequest>,
) -> ApiResult<Json<ThreadView>> {
    let thread = state
        .threads
        .create_thread(&board, &req.text, &req.delete_password)
        .await?;
    Ok(Json(thread))
}

pub async fn list_threads(
    State(state): State<AppState>,
    Path(board): Path<String>,
) -> ApiResult<Json<Vec<ThreadView>>> {
    Ok(Json(state.threads.list_threads(&board).await?))
}

// The board segment is routing only; the thread id is authoritative.
pub async fn delete_thread(
    State(state): State<AppState>,
    Path(_board): Path<String>,
    Payload(req): Payload<DeleteThreadRequest>,
) -> ApiResult<&'static str> {
    let outcome = state
        .threads
        .delete_thread(&req.thread_id, &req.delete_password)
        .await?;
    Ok(outcome.as_str())
}

pub async fn report_thread(
    State(state): State<AppState>,
    Path(_board): Path<String>,
    Payload(req): Payload<ReportThreadRequest>,
) -> ApiResult<&'static str> {
    Ok(state.threads.report_thread(&req.thread_id).await?.as_str())
}
