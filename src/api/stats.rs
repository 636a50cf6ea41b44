use super::AppState;
use crate::orchestration::DeskStats;
use axum::extract::State;
use axum::Json;

pub async fn get_stats(State(state): State<AppState>) -> Json<DeskStats> {
    Json(state.desk.stats().await)
}
