/// Company permission endpoints
///
/// - `POST /permissions` - Grant a user access to a company (status 1)
/// - `GET /permissions/user/:user_id` - A user's permissions
/// - `PUT /permissions/:id` - Replace user, company and status
/// - `DELETE /permissions/:id` - Revoke

use super::{created, deleted, Created};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
};
use axum::{extract::State, http::StatusCode};
use tender_shared::models::permission::{CreatePermission, Permission, UpdatePermission};

pub async fn create_permission(
    State(state): State<AppState>,
    Json(req): Json<CreatePermission>,
) -> ApiResult<Created<Permission>> {
    let permission = Permission::create(&state.db, req).await?;
    tracing::info!(
        permission_id = permission.id,
        user_id = permission.user_id,
        company_id = permission.company_id,
        "Permission granted"
    );
    Ok(created(permission))
}

pub async fn list_user_permissions(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<Permission>>> {
    Ok(Json(Permission::list_by_user(&state.db, user_id).await?))
}

pub async fn update_permission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePermission>,
) -> ApiResult<Json<Permission>> {
    Permission::update(&state.db, id, req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Permission"))
}

pub async fn delete_permission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    deleted(Permission::delete(&state.db, id).await?, "Permission")
}
