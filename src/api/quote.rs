use super::AppState;
use crate::domain::FillQuote;
use crate::error::AppError;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteQuery {
    pub amount: f64,
    pub oracle_price: Option<f64>,
}

/// Dry-run fill against current lane state; nothing is consumed.
pub async fn get_quote(
    Query(params): Query<QuoteQuery>,
    State(state): State<AppState>,
) -> Result<Json<FillQuote>, AppError> {
    if !params.amount.is_finite() || params.amount <= 0.0 {
        return Err(AppError::BadRequest("amount must be a positive number".into()));
    }
    if let Some(price) = params.oracle_price {
        if !price.is_finite() || price <= 0.0 {
            return Err(AppError::BadRequest(
                "oraclePrice must be a positive number".into(),
            ));
        }
    }

    let quote = state.desk.quote(params.amount, params.oracle_price).await;
    Ok(Json(quote))
}
