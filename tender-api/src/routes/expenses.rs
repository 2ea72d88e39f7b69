/// Personal expense endpoints
///
/// Summaries report the totals for the current calendar year and month:
///
/// - `GET /expenses/summary` - all expenses
/// - `GET /expenses/summary/category/:id` - a category and its subcategories
/// - `GET /expenses/summary/subcategory/:id` - one category only

use super::{created, deleted, Created};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
};
use axum::{extract::State, http::StatusCode};
use tender_shared::models::personal_expense::{
    CreatePersonalExpense, ExpenseSummary, PersonalExpense, SummaryScope, UpdatePersonalExpense,
};

pub async fn create_expense(
    State(state): State<AppState>,
    Json(req): Json<CreatePersonalExpense>,
) -> ApiResult<Created<PersonalExpense>> {
    Ok(created(PersonalExpense::create(&state.db, req).await?))
}

pub async fn list_expenses(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PersonalExpense>>> {
    Ok(Json(PersonalExpense::list(&state.db).await?))
}

pub async fn get_expense(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<PersonalExpense>> {
    PersonalExpense::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Expense"))
}

pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> ApiResult<Json<Vec<PersonalExpense>>> {
    Ok(Json(
        PersonalExpense::list_by_category(&state.db, category_id).await?,
    ))
}

pub async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePersonalExpense>,
) -> ApiResult<Json<PersonalExpense>> {
    PersonalExpense::update(&state.db, id, req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Expense"))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    deleted(PersonalExpense::delete(&state.db, id).await?, "Expense")
}

pub async fn summary(State(state): State<AppState>) -> ApiResult<Json<ExpenseSummary>> {
    Ok(Json(
        PersonalExpense::summary(&state.db, SummaryScope::All).await?,
    ))
}

pub async fn category_summary(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ExpenseSummary>> {
    Ok(Json(
        PersonalExpense::summary(&state.db, SummaryScope::Category(id)).await?,
    ))
}

pub async fn subcategory_summary(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ExpenseSummary>> {
    Ok(Json(
        PersonalExpense::summary(&state.db, SummaryScope::Subcategory(id)).await?,
    ))
}
