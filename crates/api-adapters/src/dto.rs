//! Wire shapes for request bodies and the few responses that are not domain views.
//!
//! Every request field defaults to the empty string so that a missing field
//! reaches the service layer, which owns the decision of what is required.

use domains::ReplyId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateThreadRequest {
    pub text: String,
    pub delete_password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteThreadRequest {
    pub thread_id: String,
    pub delete_password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReportThreadRequest {
    pub thread_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateReplyRequest {
    pub thread_id: String,
    pub text: String,
    pub delete_password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteReplyRequest {
    pub thread_id: String,
    pub reply_id: String,
    pub delete_password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReportReplyRequest {
    pub thread_id: String,
    pub reply_id: String,
}

/// Query string of `GET /api/replies/{board}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ThreadQuery {
    pub thread_id: String,
}

pub const REPLY_CREATED_MESSAGE: &str = "Reply added successfully";

#[derive(Debug, Serialize, Deserialize)]
pub struct ReplyCreated {
    pub message: String,
    #[serde(rename = "replyId")]
    pub reply_id: ReplyId,
}

impl ReplyCreated {
    pub fn new(reply_id: ReplyId) -> Self {
        Self {
            message: REPLY_CREATED_MESSAGE.to_string(),
            reply_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
