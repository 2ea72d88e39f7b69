/// Company (counterparty) endpoints

use super::{created, deleted, Created};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
};
use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use tender_shared::models::company::{Company, CompanyInput};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CompanyRequest {
    #[validate(length(min = 1, max = 255, message = "Company name is required"))]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,
}

impl From<CompanyRequest> for CompanyInput {
    fn from(req: CompanyRequest) -> Self {
        CompanyInput {
            name: req.name,
            description: req.description,
        }
    }
}

pub async fn create_company(
    State(state): State<AppState>,
    Json(req): Json<CompanyRequest>,
) -> ApiResult<Created<Company>> {
    req.validate()?;
    Ok(created(Company::create(&state.db, req.into()).await?))
}

pub async fn list_companies(State(state): State<AppState>) -> ApiResult<Json<Vec<Company>>> {
    Ok(Json(Company::list(&state.db).await?))
}

pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Company>> {
    Company::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Company"))
}

pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<CompanyRequest>,
) -> ApiResult<Json<Company>> {
    req.validate()?;

    Company::update(&state.db, id, req.into())
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Company"))
}

pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    deleted(Company::delete(&state.db, id).await?, "Company")
}
