/// Status-2 sums per user and client data
///
/// - `GET /sums/all/:id` - totals for one user
/// - `GET /sums/:id` - line items behind those totals
/// - `GET /debts` - totals for every user, keyed by account number

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{Json, Path},
};
use axum::extract::State;
use tender_shared::models::sums::{AccountDebts, ClientData, Sums};

pub async fn user_sums(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Sums>> {
    Ok(Json(Sums::for_user(&state.db, user_id).await?))
}

pub async fn client_data(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<ClientData>> {
    Ok(Json(ClientData::for_user(&state.db, user_id).await?))
}

pub async fn account_debts(State(state): State<AppState>) -> ApiResult<Json<Vec<AccountDebts>>> {
    Ok(Json(AccountDebts::list(&state.db).await?))
}
