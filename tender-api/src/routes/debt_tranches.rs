/// Debt tranche endpoints: partial repayments of a personal debt

use super::{created, deleted, Created};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
};
use axum::{extract::State, http::StatusCode};
use tender_shared::models::debt_tranche::{CreateDebtTranche, DebtTranche, UpdateDebtTranche};

pub async fn create_debt_tranche(
    State(state): State<AppState>,
    Json(req): Json<CreateDebtTranche>,
) -> ApiResult<Created<DebtTranche>> {
    Ok(created(DebtTranche::create(&state.db, req).await?))
}

pub async fn get_debt_tranche(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DebtTranche>> {
    DebtTranche::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Debt tranche"))
}

/// Id comes from the body
pub async fn update_debt_tranche(
    State(state): State<AppState>,
    Json(req): Json<UpdateDebtTranche>,
) -> ApiResult<Json<DebtTranche>> {
    DebtTranche::update(&state.db, req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Debt tranche"))
}

pub async fn delete_debt_tranche(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    deleted(DebtTranche::delete(&state.db, id).await?, "Debt tranche")
}

pub async fn list_by_debt(
    State(state): State<AppState>,
    Path(debt_id): Path<i64>,
) -> ApiResult<Json<Vec<DebtTranche>>> {
    Ok(Json(DebtTranche::list_by_debt(&state.db, debt_id).await?))
}
