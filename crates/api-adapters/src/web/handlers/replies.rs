use axum::{
    extract::{Path, State},
    Json,
};
use domains::ThreadView;

use crate::dto::{CreateReplyRequest, DeleteReplyRequest, ReplyCreated, ReportReplyRequest, ThreadQuery};
use crate::web::{
    extract::{Payload, QueryParams},
    ApiResult, AppState,
};

pub async fn add_reply(
    State(state): State<AppState>,
    Path(_board): Path<String>,
    Payload(req): Payload<CreateReplyRequest>,
) -> ApiResult<Json<ReplyCreated>> {
    let reply_id = state
        .replies
        .add_reply(&req.thread_id, &req.text, &req.delete_password)
        .await?;
    Ok(Json(ReplyCreated::new(reply_id)))
}

pub async fn get_thread(
    State(state): State<AppState>,
    Path(_board): Path<String>,
    QueryParams(query): QueryParams<ThreadQuery>,
) -> ApiResult<Json<ThreadView>> {
    Ok(Json(state.replies.get_thread(&query.thread_id).await?))
}

pub async fn delete_reply(
    State(state): State<AppState>,
    Path(_board): Path<String>,
    Payload(req): Payload<DeleteReplyRequest>,
) -> ApiResult<&'static str> {
    let outcome = state
        .replies
        .delete_reply(&req.thread_id, &req.reply_id, &req.delete_password)
        .await?;
    Ok(outcome.as_str())
}

pub async fn report_reply(
    State(state): State<AppState>,
    Path(_board): Path<String>,
    Payload(req): Payload<ReportReplyRequest>,
) -> ApiResult<&'static str> {
    Ok(state
        .replies
        .report_reply(&req.thread_id, &req.reply_id)
        .await?
        .as_str())
}
