/// Tender endpoints

use super::{created, deleted, Created};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
};
use axum::{extract::State, http::StatusCode};
use tender_shared::models::{
    counts::{CountedTable, StatusCounts},
    tender::{
        CompanyTotalNet, CreateTender, Tender, TenderRealization, UpdateTender, TYPE_GOIK,
        TYPE_GOPP,
    },
};

fn check_kind(kind: &str) -> ApiResult<()> {
    if kind == TYPE_GOIK || kind == TYPE_GOPP {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "Tender type must be {} or {}",
            TYPE_GOIK, TYPE_GOPP
        )))
    }
}

/// `date` is always the time of creation
pub async fn create_tender(
    State(state): State<AppState>,
    Json(req): Json<CreateTender>,
) -> ApiResult<Created<Tender>> {
    check_kind(&req.kind)?;

    let tender = Tender::create(&state.db, req).await?;
    tracing::info!(tender_id = tender.id, "Tender created");
    Ok(created(tender))
}

pub async fn list_tenders(State(state): State<AppState>) -> ApiResult<Json<Vec<Tender>>> {
    Ok(Json(Tender::list(&state.db).await?))
}

pub async fn get_tender(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Tender>> {
    Tender::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Tender"))
}

pub async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<Tender>>> {
    Ok(Json(Tender::list_by_user(&state.db, user_id).await?))
}

pub async fn list_by_company(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
) -> ApiResult<Json<Vec<Tender>>> {
    Ok(Json(Tender::list_by_company(&state.db, company_id).await?))
}

pub async fn company_totals(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<CompanyTotalNet>>> {
    Ok(Json(Tender::total_net_by_company(&state.db).await?))
}

pub async fn realization_sum(State(state): State<AppState>) -> ApiResult<Json<TenderRealization>> {
    Ok(Json(Tender::realization_sum(&state.db).await?))
}

pub async fn realization_count(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<StatusCounts>> {
    Ok(Json(
        StatusCounts::for_user(&state.db, CountedTable::Tenders, user_id).await?,
    ))
}

pub async fn update_tender(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTender>,
) -> ApiResult<Json<Tender>> {
    if let Some(kind) = &req.kind {
        check_kind(kind)?;
    }

    Tender::update(&state.db, id, req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Tender"))
}

pub async fn delete_tender(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    deleted(Tender::delete(&state.db, id).await?, "Tender")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_kind() {
        assert!(check_kind("ГОИК").is_ok());
        assert!(check_kind("ГОПП").is_ok());
        assert!(matches!(check_kind("Закуп"), Err(ApiError::BadRequest(_))));
    }
}
