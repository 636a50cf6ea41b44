//! Live/paused control over the slot clock and batch poller.

use super::AppState;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub live: bool,
    pub next_batch_in_ms: i64,
}

fn feed_status(state: &AppState) -> FeedResponse {
    FeedResponse {
        live: state.feed.is_live(),
        next_batch_in_ms: state.feed.next_batch_in_ms(),
    }
}

pub async fn get_feed(State(state): State<AppState>) -> Json<FeedResponse> {
    Json(feed_status(&state))
}

pub async fn pause(State(state): State<AppState>) -> Json<FeedResponse> {
    state.feed.pause();
    Json(feed_status(&state))
}

pub async fn resume(State(state): State<AppState>) -> Json<FeedResponse> {
    state.feed.resume();
    Json(feed_status(&state))
}
