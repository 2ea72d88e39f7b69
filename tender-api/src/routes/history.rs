/// Unified activity feed
///
/// `POST /history` with `{source?, start_date?, end_date?, limit?, offset?}`
/// returns entries from transactions, tenders, personal expenses, personal
/// debts, extra transactions and balance history, newest first.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::Json,
};
use axum::extract::State;
use tender_shared::models::history::{HistoryEntry, HistoryRequest};

/// Largest page a client may ask for
pub const MAX_LIMIT: i64 = 1000;

fn check(req: &HistoryRequest) -> ApiResult<()> {
    if let (Some(start), Some(end)) = (req.start_date, req.end_date) {
        if start > end {
            return Err(ApiError::BadRequest(
                "start_date must not be after end_date".to_string(),
            ));
        }
    }
    if req.limit.is_some_and(|limit| limit > MAX_LIMIT) {
        return Err(ApiError::BadRequest(format!(
            "limit must not exceed {}",
            MAX_LIMIT
        )));
    }
    Ok(())
}

pub async fn history(
    State(state): State<AppState>,
    Json(req): Json<HistoryRequest>,
) -> ApiResult<Json<Vec<HistoryEntry>>> {
    check(&req)?;
    Ok(Json(req.fetch(&state.db).await?))
}
