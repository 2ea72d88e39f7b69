/// Per-user totals over active business (status 2)
///
/// Three views of the same data: the summed totals of one user, the
/// itemized rows behind them, and the summed totals of every user keyed by
/// their account number (INN).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

use super::tender::{TYPE_GOIK, TYPE_GOPP};

/// Summed totals of one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sums {
    pub transactions_sum: f64,
    pub additional_expenses_sum: f64,
    pub tenders_goik_sum: f64,
    pub tenders_gopp_sum: f64,
    pub extra_transactions_sum: f64,
}

/// Summed totals of one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccountDebts {
    pub account_number: String,
    pub transactions_sum: f64,
    pub additional_expenses_sum: f64,
    pub tenders_goik_sum: f64,
    pub tenders_gopp_sum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TransactionData {
    pub transaction_number: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TenderData {
    pub tender_number: Option<String>,
    pub amount: f64,
}

/// An expense, dated by its transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AdditionalExpenseData {
    pub date: DateTime<Utc>,
    pub amount: f64,
}

/// Itemized status-2 business of one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientData {
    pub user_id: i64,
    pub transactions: Vec<TransactionData>,
    pub tenders_goik: Vec<TenderData>,
    pub tenders_gopp: Vec<TenderData>,
    pub additional_expenses: Vec<AdditionalExpenseData>,
}

/// Placeholder for transactions booked without a number
const MISSING_NUMBER: &str = "-";

impl Sums {
    pub async fn for_user(pool: &MySqlPool, user_id: i64) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Sums>(
            r#"
            SELECT
                (SELECT COALESCE(SUM(total), 0) FROM transactions
                 WHERE user_id = ? AND status = 2) AS transactions_sum,
                (SELECT COALESCE(SUM(ae.amount), 0)
                 FROM additional_expenses ae
                 JOIN transactions t ON ae.transaction_id = t.id
                 WHERE t.user_id = ? AND t.status = 2) AS additional_expenses_sum,
                (SELECT COALESCE(SUM(total), 0) FROM tenders
                 WHERE user_id = ? AND status = 2 AND type = ?) AS tenders_goik_sum,
                (SELECT COALESCE(SUM(total), 0) FROM tenders
                 WHERE user_id = ? AND status = 2 AND type = ?) AS tenders_gopp_sum,
                (SELECT COALESCE(SUM(total), 0) FROM extra_transactions
                 WHERE user_id = ? AND status = 2) AS extra_transactions_sum
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .bind(user_id)
        .bind(TYPE_GOIK)
        .bind(user_id)
        .bind(TYPE_GOPP)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}

impl AccountDebts {
    /// Totals of every user, in user id order
    pub async fn list(pool: &MySqlPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, AccountDebts>(
            r#"
            SELECT
                u.inn AS account_number,
                (SELECT COALESCE(SUM(t.total), 0) FROM transactions t
                 WHERE t.user_id = u.id AND t.status = 2) AS transactions_sum,
                (SELECT COALESCE(SUM(ae.amount), 0)
                 FROM additional_expenses ae
                 JOIN transactions t ON ae.transaction_id = t.id
                 WHERE t.user_id = u.id AND t.status = 2) AS additional_expenses_sum,
                (SELECT COALESCE(SUM(td.total), 0) FROM tenders td
                 WHERE td.user_id = u.id AND td.status = 2 AND td.type = ?) AS tenders_goik_sum,
                (SELECT COALESCE(SUM(td.total), 0) FROM tenders td
                 WHERE td.user_id = u.id AND td.status = 2 AND td.type = ?) AS tenders_gopp_sum
            FROM users u
            ORDER BY u.id
            "#,
        )
        .bind(TYPE_GOIK)
        .bind(TYPE_GOPP)
        .fetch_all(pool)
        .await
    }
}

impl ClientData {
    pub async fn for_user(pool: &MySqlPool, user_id: i64) -> Result<Self, sqlx::Error> {
        let transactions = sqlx::query_as::<_, TransactionData>(
            r#"
            SELECT COALESCE(transaction_number, ?) AS transaction_number, sell AS amount
            FROM transactions
            WHERE user_id = ? AND status = 2
            ORDER BY id
            "#,
        )
        .bind(MISSING_NUMBER)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        let tenders_goik = Self::tenders(pool, user_id, TYPE_GOIK).await?;
        let tenders_gopp = Self::tenders(pool, user_id, TYPE_GOPP).await?;

        let additional_expenses = sqlx::query_as::<_, AdditionalExpenseData>(
            r#"
            SELECT t.date AS date, ae.amount AS amount
            FROM additional_expenses ae
            JOIN transactions t ON ae.transaction_id = t.id
            WHERE t.user_id = ? AND t.status = 2
            ORDER BY ae.id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(Self {
            user_id,
            transactions,
            tenders_goik,
            tenders_gopp,
            additional_expenses,
        })
    }

    async fn tenders(
        pool: &MySqlPool,
        user_id: i64,
        kind: &str,
    ) -> Result<Vec<TenderData>, sqlx::Error> {
        sqlx::query_as::<_, TenderData>(
            r#"
            SELECT tender_number, total AS amount
            FROM tenders
            WHERE user_id = ? AND status = 2 AND type = ?
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .bind(kind)
        .fetch_all(pool)
        .await
    }
}
