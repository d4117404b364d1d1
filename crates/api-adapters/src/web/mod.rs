//! # Web adapter (axum)
//!
//! Routes:
//! - `/api/threads/{board}`: POST create, GET list, DELETE, PUT report
//! - `/api/replies/{board}`: POST add, GET thread, DELETE, PUT report
//! - `/health`: storage liveness

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use domains::ThreadRepository;
use services::{ReplyService, ThreadService};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

pub use error::{ApiError, ApiResult};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub threads: ThreadService,
    pub replies: ReplyService,
    pub repo: Arc<dyn ThreadRepository>,
}

impl AppState {
    pub fn new(repo: Arc<dyn ThreadRepository>) -> Self {
        Self {
            threads: ThreadService::new(repo.clone()),
            replies: ReplyService::new(repo.clone()),
            repo,
        }
    }
}

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route(
            "/threads/{board}",
            post(handlers::threads::create_thread)
                .get(handlers::threads::list_threads)
                .delete(handlers::threads::delete_thread)
                .put(handlers::threads::report_thread),
        )
        .route(
            "/replies/{board}",
            post(handlers::replies::add_reply)
                .get(handlers::replies::get_thread)
                .delete(handlers::replies::delete_reply)
                .put(handlers::replies::report_reply),
        );

    Router::new()
        .nest("/api", api)
        .route("/health", get(handlers::health::health_check))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(middleware::request_span))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors),
        )
        .with_state(state)
}
