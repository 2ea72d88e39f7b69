/// Balance category and balance history endpoints
///
/// - `/balance_categories` - CRUD, updates carry the id in the body
/// - `/balance-history` - entries per user and per category

use super::{created, deleted, Created};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
};
use axum::{extract::State, http::StatusCode};
use tender_shared::models::balance::{
    BalanceCategory, BalanceHistory, BalanceHistoryInput, CreateBalanceCategory,
    UpdateBalanceCategory,
};

// Categories

pub async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CreateBalanceCategory>,
) -> ApiResult<Created<BalanceCategory>> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }
    Ok(created(BalanceCategory::create(&state.db, req).await?))
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<BalanceCategory>>> {
    Ok(Json(BalanceCategory::list(&state.db).await?))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<BalanceCategory>> {
    BalanceCategory::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Balance category"))
}

pub async fn update_category(
    State(state): State<AppState>,
    Json(req): Json<UpdateBalanceCategory>,
) -> ApiResult<Json<BalanceCategory>> {
    BalanceCategory::update(&state.db, req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Balance category"))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    deleted(
        BalanceCategory::delete(&state.db, id).await?,
        "Balance category",
    )
}

// History

pub async fn create_history(
    State(state): State<AppState>,
    Json(req): Json<BalanceHistoryInput>,
) -> ApiResult<Created<BalanceHistory>> {
    let entry = BalanceHistory::create(&state.db, req).await?;
    tracing::info!(
        entry_id = entry.id,
        user_id = entry.user_id,
        amount = entry.amount,
        "Balance history recorded"
    );
    Ok(created(entry))
}

/// History of user `id`
pub async fn list_user_history(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<BalanceHistory>>> {
    Ok(Json(BalanceHistory::list_by_user(&state.db, user_id).await?))
}

pub async fn list_category_history(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> ApiResult<Json<Vec<BalanceHistory>>> {
    Ok(Json(
        BalanceHistory::list_by_category(&state.db, category_id).await?,
    ))
}

pub async fn update_history(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<BalanceHistoryInput>,
) -> ApiResult<Json<BalanceHistory>> {
    BalanceHistory::update(&state.db, id, req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Balance history entry"))
}

pub async fn delete_history(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    deleted(
        BalanceHistory::delete(&state.db, id).await?,
        "Balance history entry",
    )
}
