use super::AppState;
use axum::extract::State;
use axum::Json;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

pub async fn ready(State(state): State<AppState>) -> Json<serde_json::Value> {
    let (slot, lanes) = state.desk.lanes().await;
    Json(serde_json::json!({
        "status": "ready",
        "lanes": lanes.len(),
        "slot": slot,
        "live": state.feed.is_live(),
    }))
}
