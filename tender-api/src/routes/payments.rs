/// Tranche and change endpoints
///
/// `/tranches` and `/changes` have the same shape and share these
/// handlers; the router attaches the target table as an
/// `Extension<PaymentTable>`.
///
/// - `POST /{tranches,changes}`
/// - `GET /{tranches,changes}/:id`
/// - `PUT /{tranches,changes}` - id in the body
/// - `DELETE /{tranches,changes}/:id`
/// - `GET /{tranches,changes}/transaction/:transaction_id` - newest first

use super::{created, deleted, Created};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
};
use axum::{extract::State, http::StatusCode, Extension};
use tender_shared::models::payment::{CreatePayment, Payment, PaymentTable, UpdatePayment};

fn label(table: PaymentTable) -> &'static str {
    match table {
        PaymentTable::Tranches => "Tranche",
        PaymentTable::Changes => "Change",
    }
}

pub async fn create_payment(
    State(state): State<AppState>,
    Extension(table): Extension<PaymentTable>,
    Json(req): Json<CreatePayment>,
) -> ApiResult<Created<Payment>> {
    let payment = Payment::create(&state.db, table, req).await?;
    tracing::info!(
        table = table.as_str(),
        id = payment.id,
        transaction_id = payment.transaction_id,
        amount = payment.amount,
        "Payment recorded"
    );
    Ok(created(payment))
}

pub async fn get_payment(
    State(state): State<AppState>,
    Extension(table): Extension<PaymentTable>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Payment>> {
    Payment::find_by_id(&state.db, table, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(label(table)))
}

pub async fn update_payment(
    State(state): State<AppState>,
    Extension(table): Extension<PaymentTable>,
    Json(req): Json<UpdatePayment>,
) -> ApiResult<Json<Payment>> {
    Payment::update(&state.db, table, req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(label(table)))
}

pub async fn delete_payment(
    State(state): State<AppState>,
    Extension(table): Extension<PaymentTable>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    deleted(Payment::delete(&state.db, table, id).await?, label(table))
}

pub async fn list_by_transaction(
    State(state): State<AppState>,
    Extension(table): Extension<PaymentTable>,
    Path(transaction_id): Path<i64>,
) -> ApiResult<Json<Vec<Payment>>> {
    Ok(Json(
        Payment::list_by_transaction(&state.db, table, transaction_id).await?,
    ))
}
