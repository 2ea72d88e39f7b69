/// Transaction endpoints
///
/// Transactions are written together with their expenses in one database
/// transaction; see [`Transaction::create`] and [`Transaction::update`].
///
/// # Endpoints
///
/// - `POST /transactions` - Create with expenses
/// - `GET /transactions` - All transactions followed by all extra transactions
/// - `GET /transactions/:id`
/// - `GET /transactions/user/:id`
/// - `GET /transactions/company/:id` - Each item carries its outstanding `debt`
/// - `GET /transactions/user/:id/company/:company_id`
/// - `GET /transactions/user/zakup/:id` - Purchase total of a user
/// - `GET /transactions/user/debt/:id` - Total of one purchase in progress
/// - `GET /transactions/realization/sum` - Sale total of completed purchases
/// - `GET /transactions/realization/count/:id` - Status counts for a user
/// - `GET /transactions/tranches/debt`
/// - `GET /transactions/tranches/company/debt`
/// - `GET /transactions/tranches/id/debt/:id`
/// - `PUT /transactions/:id` - Partial update
/// - `DELETE /transactions/:id` - Delete with expenses

use super::{created, deleted, Created};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
};
use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tender_shared::models::{
    counts::{CountedTable, StatusCounts},
    extra_transaction::ExtraTransaction,
    transaction::{
        CompanyDebt, CreateTransaction, SingleTransactionDebt, Transaction, TransactionDebt,
        UpdateTransaction,
    },
};

/// Item of the combined `GET /transactions` listing
///
/// Serialized without a tag; clients tell the kinds apart by their fields.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum LedgerEntry {
    Transaction(Transaction),
    Extra(ExtraTransaction),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ZakupTotal {
    pub zakup: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DebtTotal {
    pub debt: f64,
}

fn ledger(transactions: Vec<Transaction>, extras: Vec<ExtraTransaction>) -> Vec<LedgerEntry> {
    transactions
        .into_iter()
        .map(LedgerEntry::Transaction)
        .chain(extras.into_iter().map(LedgerEntry::Extra))
        .collect()
}

pub async fn create_transaction(
    State(state): State<AppState>,
    Json(req): Json<CreateTransaction>,
) -> ApiResult<Created<Transaction>> {
    if req.kind.trim().is_empty() {
        return Err(ApiError::BadRequest("Transaction type is required".to_string()));
    }

    let transaction = Transaction::create(&state.db, req).await?;
    tracing::info!(
        transaction_id = transaction.id,
        expenses = transaction.expenses.len(),
        "Transaction created"
    );

    Ok(created(transaction))
}

pub async fn list_all(State(state): State<AppState>) -> ApiResult<Json<Vec<LedgerEntry>>> {
    let transactions = Transaction::list(&state.db).await?;
    let extras = ExtraTransaction::list(&state.db).await?;

    Ok(Json(ledger(transactions, extras)))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Transaction>> {
    Transaction::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Transaction"))
}

pub async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<Transaction>>> {
    Ok(Json(Transaction::list_by_user(&state.db, user_id).await?))
}

pub async fn list_by_company(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
) -> ApiResult<Json<Vec<Transaction>>> {
    Ok(Json(Transaction::list_by_company(&state.db, company_id).await?))
}

pub async fn list_by_user_and_company(
    State(state): State<AppState>,
    Path((user_id, company_id)): Path<(i64, i64)>,
) -> ApiResult<Json<Vec<Transaction>>> {
    Ok(Json(
        Transaction::list_by_user_and_company(&state.db, user_id, company_id).await?,
    ))
}

pub async fn zakup_total(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<ZakupTotal>> {
    let zakup = Transaction::zakup_total_for_user(&state.db, user_id).await?;
    Ok(Json(ZakupTotal { zakup }))
}

/// 404 unless the transaction is a purchase still in status 2
pub async fn zakup_debt(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DebtTotal>> {
    Transaction::zakup_debt(&state.db, id)
        .await?
        .map(|debt| Json(DebtTotal { debt }))
        .ok_or_else(|| ApiError::not_found("Open purchase"))
}

pub async fn realization_sum(State(state): State<AppState>) -> ApiResult<Json<ZakupTotal>> {
    let zakup = Transaction::realization_sum(&state.db).await?;
    Ok(Json(ZakupTotal { zakup }))
}

pub async fn realization_count(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<StatusCounts>> {
    Ok(Json(
        StatusCounts::for_user(&state.db, CountedTable::Transactions, user_id).await?,
    ))
}

pub async fn tranche_debts(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<TransactionDebt>>> {
    Ok(Json(Transaction::debts(&state.db).await?))
}

pub async fn company_debts(State(state): State<AppState>) -> ApiResult<Json<Vec<CompanyDebt>>> {
    Ok(Json(Transaction::company_debts(&state.db).await?))
}

pub async fn debt_of(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<SingleTransactionDebt>>> {
    Ok(Json(Transaction::debt_of(&state.db, id).await?))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTransaction>,
) -> ApiResult<Json<Transaction>> {
    let transaction = Transaction::update(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::not_found("Transaction"))?;

    tracing::info!(transaction_id = id, "Transaction updated");
    Ok(Json(transaction))
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let removed = Transaction::delete(&state.db, id).await?;
    if removed {
        tracing::info!(transaction_id = id, "Transaction deleted");
    }
    deleted(removed, "Transaction")
}
