/// Extra transaction endpoints
///
/// Extra transactions are free-form entries (rent, salaries, ...) that are
/// not tied to a company.

use super::{created, deleted, Created};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
};
use axum::{extract::State, http::StatusCode};
use tender_shared::models::{
    counts::{CountedTable, StatusCounts},
    extra_transaction::{CreateExtraTransaction, ExtraTransaction, UpdateExtraTransaction},
};

pub async fn create_extra_transaction(
    State(state): State<AppState>,
    Json(req): Json<CreateExtraTransaction>,
) -> ApiResult<Created<ExtraTransaction>> {
    let extra = ExtraTransaction::create(&state.db, req).await?;
    tracing::info!(extra_transaction_id = extra.id, "Extra transaction created");
    Ok(created(extra))
}

pub async fn list_extra_transactions(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ExtraTransaction>>> {
    Ok(Json(ExtraTransaction::list(&state.db).await?))
}

pub async fn get_extra_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ExtraTransaction>> {
    ExtraTransaction::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Extra transaction"))
}

pub async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<ExtraTransaction>>> {
    Ok(Json(ExtraTransaction::list_by_user(&state.db, user_id).await?))
}

pub async fn update_extra_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateExtraTransaction>,
) -> ApiResult<Json<ExtraTransaction>> {
    ExtraTransaction::update(&state.db, id, req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Extra transaction"))
}

pub async fn delete_extra_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    deleted(
        ExtraTransaction::delete(&state.db, id).await?,
        "Extra transaction",
    )
}

pub async fn realization_count(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<StatusCounts>> {
    Ok(Json(
        StatusCounts::for_user(&state.db, CountedTable::ExtraTransactions, user_id).await?,
    ))
}
