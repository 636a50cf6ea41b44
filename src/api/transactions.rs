use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::{TradeAttempt, Transaction};
use crate::error::AppError;
use crate::orchestration::{BatchSummary, TransactionFilter};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsQuery {
    pub limit: Option<usize>,
    pub toxic_only: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearedResponse {
    pub cleared: usize,
}

pub async fn get_transactions(
    Query(params): Query<TransactionsQuery>,
    State(state): State<AppState>,
) -> Json<TransactionsResponse> {
    let filter = TransactionFilter {
        limit: params.limit,
        toxic_only: params.toxic_only.unwrap_or(false),
    };
    let transactions = state.desk.transactions(filter).await;
    Json(TransactionsResponse { transactions })
}

/// Execute and classify a single externally supplied attempt.
pub async fn post_transaction(
    State(state): State<AppState>,
    payload: Result<Json<TradeAttempt>, JsonRejection>,
) -> Result<Json<Transaction>, AppError> {
    let Json(attempt) = payload?;
    validate_attempt(&attempt)?;
    let tx = state.desk.process_attempt(attempt).await;
    Ok(Json(tx))
}

pub async fn clear_transactions(State(state): State<AppState>) -> Json<ClearedResponse> {
    let cleared = state.desk.clear_transactions().await;
    Json(ClearedResponse { cleared })
}

/// Pull a batch from the trade source right now and restart the poller's countdown.
pub async fn post_batch(State(state): State<AppState>) -> Result<Json<BatchSummary>, AppError> {
    let summary = state.desk.ingest_batch(state.source.as_ref()).await?;
    state.feed.rearm();
    Ok(Json(summary))
}

fn validate_attempt(attempt: &TradeAttempt) -> Result<(), AppError> {
    if !attempt.input_amount.is_finite() || attempt.input_amount < 0.0 {
        return Err(AppError::BadRequest(
            "inputAmount must be a non-negative number".into(),
        ));
    }
    if attempt.program_id.is_empty() {
        return Err(AppError::BadRequest("programId must not be empty".into()));
    }
    Ok(())
}
