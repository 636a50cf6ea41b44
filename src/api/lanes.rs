use super::AppState;
use crate::domain::{Lane, Slot};
use axum::extract::State;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanesResponse {
    pub slot: Slot,
    pub lanes: Vec<Lane>,
}

pub async fn get_lanes(State(state): State<AppState>) -> Json<LanesResponse> {
    let (slot, lanes) = state.desk.lanes().await;
    Json(LanesResponse { slot, lanes })
}
