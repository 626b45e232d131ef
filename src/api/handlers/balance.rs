use axum::Json;
use axum::extract::{Query, State};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::api::types::{BalanceQuery, BalanceResponse};

pub async fn get_balance(
    State(state): State<AppState>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<BalanceResponse>, ApiError> {
    if query.address.trim().is_empty() || query.coin_type.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "address and coin_type are required".into(),
        ));
    }

    let balance = state
        .inner
        .context
        .lookup_balance(&query.address, &query.coin_type, query.decimals)
        .await;

    Ok(Json(BalanceResponse {
        address: query.address,
        coin_type: query.coin_type,
        balance,
    }))
}
