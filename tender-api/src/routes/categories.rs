/// Expense category endpoints
///
/// Categories form a tree through `parent`; top-level categories have none.

use super::{created, deleted, Created};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
};
use axum::{extract::State, http::StatusCode};
use tender_shared::models::category::{Category, CategoryInput};

fn check_name(input: &CategoryInput) -> ApiResult<()> {
    if input.category_name.trim().is_empty() {
        return Err(ApiError::BadRequest("category_name is required".to_string()));
    }
    Ok(())
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CategoryInput>,
) -> ApiResult<Created<Category>> {
    check_name(&req)?;
    Ok(created(Category::create(&state.db, req).await?))
}

pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(Category::list(&state.db).await?))
}

pub async fn list_children(
    State(state): State<AppState>,
    Path(parent_id): Path<i64>,
) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(Category::list_children(&state.db, parent_id).await?))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Category>> {
    Category::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Category"))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<CategoryInput>,
) -> ApiResult<Json<Category>> {
    check_name(&req)?;
    if req.parent_id == Some(id) {
        return Err(ApiError::BadRequest(
            "A category cannot be its own parent".to_string(),
        ));
    }

    Category::update(&state.db, id, req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Category"))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    deleted(Category::delete(&state.db, id).await?, "Category")
}
