/// Data export endpoints
///
/// - `POST /data/user/:user_id/status/:status` - Everything a user has in one status
/// - `POST /data/{transactions,tenders,extra}/date` - Rows in a date range
/// - `POST /data/{transactions,tenders,extra}/date/company` - Same, for one company
///
/// Date-range bodies carry `user_id`: 1 is the administrator and sees every
/// row, any other positive id sees its own rows, and anything else gets an
/// empty list.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
};
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tender_shared::models::{
    date_range::DateRangeRequest, extra_transaction::ExtraTransaction, tender::Tender,
    transaction::Transaction,
};

/// Everything a user has in one status
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusBundle {
    pub transactions: Vec<Transaction>,
    pub tenders: Vec<Tender>,
    pub extra_transactions: Vec<ExtraTransaction>,
}

fn check_range(range: &DateRangeRequest) -> ApiResult<()> {
    if range.start_date > range.end_date {
        return Err(ApiError::BadRequest(
            "start_date must not be after end_date".to_string(),
        ));
    }
    Ok(())
}

fn require_company(range: &DateRangeRequest) -> ApiResult<()> {
    check_range(range)?;
    if range.company_id.is_none() {
        return Err(ApiError::BadRequest("company_id is required".to_string()));
    }
    Ok(())
}

pub async fn by_user_and_status(
    State(state): State<AppState>,
    Path((user_id, status)): Path<(i64, i32)>,
) -> ApiResult<Json<StatusBundle>> {
    let (transactions, tenders, extra_transactions) = tokio::try_join!(
        Transaction::list_by_user_and_status(&state.db, user_id, status),
        Tender::list_by_user_and_status(&state.db, user_id, status),
        ExtraTransaction::list_by_user_and_status(&state.db, user_id, status),
    )?;

    Ok(Json(StatusBundle {
        transactions,
        tenders,
        extra_transactions,
    }))
}

pub async fn transactions_by_date(
    State(state): State<AppState>,
    Json(range): Json<DateRangeRequest>,
) -> ApiResult<Json<Vec<Transaction>>> {
    check_range(&range)?;
    Ok(Json(
        Transaction::list_completed_between(&state.db, &range, false).await?,
    ))
}

pub async fn transactions_by_date_and_company(
    State(state): State<AppState>,
    Json(range): Json<DateRangeRequest>,
) -> ApiResult<Json<Vec<Transaction>>> {
    require_company(&range)?;
    Ok(Json(
        Transaction::list_completed_between(&state.db, &range, true).await?,
    ))
}

pub async fn tenders_by_date(
    State(state): State<AppState>,
    Json(range): Json<DateRangeRequest>,
) -> ApiResult<Json<Vec<Tender>>> {
    check_range(&range)?;
    Ok(Json(Tender::list_completed_between(&state.db, &range, false).await?))
}

pub async fn tenders_by_date_and_company(
    State(state): State<AppState>,
    Json(range): Json<DateRangeRequest>,
) -> ApiResult<Json<Vec<Tender>>> {
    require_company(&range)?;
    Ok(Json(Tender::list_completed_between(&state.db, &range, true).await?))
}

/// Also serves `/data/extra/date/company`; extra transactions have no company
pub async fn extras_by_date(
    State(state): State<AppState>,
    Json(range): Json<DateRangeRequest>,
) -> ApiResult<Json<Vec<ExtraTransaction>>> {
    check_range(&range)?;
    Ok(Json(ExtraTransaction::list_between(&state.db, &range).await?))
}
