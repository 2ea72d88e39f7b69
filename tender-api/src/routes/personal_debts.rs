/// Personal debt endpoints

use super::{created, deleted, Created};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
};
use axum::{extract::State, http::StatusCode};
use tender_shared::models::personal_debt::{CreatePersonalDebt, PersonalDebt, UpdatePersonalDebt};

pub async fn create_debt(
    State(state): State<AppState>,
    Json(req): Json<CreatePersonalDebt>,
) -> ApiResult<Created<PersonalDebt>> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }
    Ok(created(PersonalDebt::create(&state.db, req).await?))
}

pub async fn list_debts(State(state): State<AppState>) -> ApiResult<Json<Vec<PersonalDebt>>> {
    Ok(Json(PersonalDebt::list(&state.db).await?))
}

pub async fn get_debt(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<PersonalDebt>> {
    PersonalDebt::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Debt"))
}

pub async fn list_by_status(
    State(state): State<AppState>,
    Path(status): Path<i32>,
) -> ApiResult<Json<Vec<PersonalDebt>>> {
    Ok(Json(PersonalDebt::list_by_status(&state.db, status).await?))
}

pub async fn update_debt(
    State(state): State<AppState>,
    Json(req): Json<UpdatePersonalDebt>,
) -> ApiResult<Json<PersonalDebt>> {
    PersonalDebt::update(&state.db, req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Debt"))
}

pub async fn delete_debt(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    deleted(PersonalDebt::delete(&state.db, id).await?, "Debt")
}
