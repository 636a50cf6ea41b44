pub mod feed;
pub mod health;
pub mod lanes;
pub mod quote;
pub mod stats;
pub mod transactions;

use crate::datasource::TradeSource;
use crate::orchestration::{Desk, FeedControl};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub desk: Arc<Desk>,
    pub feed: Arc<FeedControl>,
    pub source: Arc<dyn TradeSource>,
}

impl AppState {
    pub fn new(desk: Arc<Desk>, feed: Arc<FeedControl>, source: Arc<dyn TradeSource>) -> Self {
        Self { desk, feed, source }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/lanes", get(lanes::get_lanes))
        .route("/v1/quote", get(quote::get_quote))
        .route(
            "/v1/transactions",
            get(transactions::get_transactions)
                .post(transactions::post_transaction)
                .delete(transactions::clear_transactions),
        )
        .route("/v1/batches", post(transactions::post_batch))
        .route("/v1/stats", get(stats::get_stats))
        .route("/v1/feed", get(feed::get_feed))
        .route("/v1/feed/pause", post(feed::pause))
        .route("/v1/feed/resume", post(feed::resume))
        .layer(cors)
        .with_state(state)
}
