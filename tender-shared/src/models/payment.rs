/// Payments recorded against a transaction
///
/// Tranches pay a transaction's debt down; changes record adjustments to it.
/// Both tables have the same shape and the same operations, so one model
/// serves both, selected by [`PaymentTable`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

/// Which payment table to operate on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentTable {
    Tranches,
    Changes,
}

impl PaymentTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentTable::Tranches => "tranches",
            PaymentTable::Changes => "changes",
        }
    }
}

/// A tranche or change row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    pub id: i64,
    pub transaction_id: i64,
    pub amount: f64,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
}

/// Input for creating a payment; the date is the insertion time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePayment {
    pub transaction_id: i64,
    #[serde(default)]
    pub amount: f64,
    pub description: Option<String>,
}

/// Full replacement of a payment, id carried in the body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePayment {
    pub id: i64,
    pub transaction_id: i64,
    #[serde(default)]
    pub amount: f64,
    pub description: Option<String>,
}

impl Payment {
    pub async fn create(
        pool: &MySqlPool,
        table: PaymentTable,
        data: CreatePayment,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            "INSERT INTO {} (transaction_id, amount, description) VALUES (?, ?, ?)",
            table.as_str()
        );
        let result = sqlx::query(&sql)
            .bind(data.transaction_id)
            .bind(data.amount)
            .bind(data.description)
            .execute(pool)
            .await?;

        let id = result.last_insert_id() as i64;
        Self::find_by_id(pool, table, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(
        pool: &MySqlPool,
        table: PaymentTable,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT id, transaction_id, amount, description, date FROM {} WHERE id = ?",
            table.as_str()
        );
        sqlx::query_as::<_, Payment>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Payments of a transaction, newest first
    pub async fn list_by_transaction(
        pool: &MySqlPool,
        table: PaymentTable,
        transaction_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT id, transaction_id, amount, description, date
            FROM {}
            WHERE transaction_id = ?
            ORDER BY date DESC, id DESC
            "#,
            table.as_str()
        );
        sqlx::query_as::<_, Payment>(&sql)
            .bind(transaction_id)
            .fetch_all(pool)
            .await
    }

    /// Replaces transaction, amount and description
    ///
    /// # Returns
    ///
    /// The updated row, or None if it doesn't exist
    pub async fn update(
        pool: &MySqlPool,
        table: PaymentTable,
        data: UpdatePayment,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            "UPDATE {} SET transaction_id = ?, amount = ?, description = ? WHERE id = ?",
            table.as_str()
        );
        sqlx::query(&sql)
            .bind(data.transaction_id)
            .bind(data.amount)
            .bind(data.description)
            .bind(data.id)
            .execute(pool)
            .await?;

        Self::find_by_id(pool, table, data.id).await
    }

    pub async fn delete(pool: &MySqlPool, table: PaymentTable, id: i64) -> Result<bool, sqlx::Error> {
        let sql = format!("DELETE FROM {} WHERE id = ?", table.as_str());
        let result = sqlx::query(&sql).bind(id).execute(pool).await?;

        Ok(result.rows_affected() > 0)
    }
}
