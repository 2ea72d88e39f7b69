/// Partial repayments of a personal debt

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DebtTranche {
    pub id: i64,
    pub debt_id: i64,
    pub amount: f64,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
}

/// Input for creating a debt tranche
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDebtTranche {
    pub debt_id: i64,
    #[serde(default)]
    pub amount: f64,
    pub description: Option<String>,

    /// Defaults to the current time
    pub date: Option<DateTime<Utc>>,
}

/// Full replacement of a debt tranche, id carried in the body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDebtTranche {
    pub id: i64,
    pub debt_id: i64,
    #[serde(default)]
    pub amount: f64,
    pub description: Option<String>,

    /// Keeps the stored date when absent
    pub date: Option<DateTime<Utc>>,
}

impl DebtTranche {
    pub async fn create(pool: &MySqlPool, data: CreateDebtTranche) -> Result<Self, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO debt_tranches (debt_id, amount, description, date) VALUES (?, ?, ?, ?)",
        )
        .bind(data.debt_id)
        .bind(data.amount)
        .bind(data.description)
        .bind(data.date.unwrap_or_else(Utc::now))
        .execute(pool)
        .await?;

        let id = result.last_insert_id() as i64;
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &MySqlPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, DebtTranche>(
            "SELECT id, debt_id, amount, description, date FROM debt_tranches WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Tranches of a debt, newest first
    pub async fn list_by_debt(pool: &MySqlPool, debt_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, DebtTranche>(
            r#"
            SELECT id, debt_id, amount, description, date
            FROM debt_tranches
            WHERE debt_id = ?
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(debt_id)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &MySqlPool,
        data: UpdateDebtTranche,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE debt_tranches
            SET debt_id = ?, amount = ?, description = ?, date = COALESCE(?, date)
            WHERE id = ?
            "#,
        )
        .bind(data.debt_id)
        .bind(data.amount)
        .bind(data.description)
        .bind(data.date)
        .bind(data.id)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, data.id).await
    }

    pub async fn delete(pool: &MySqlPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM debt_tranches WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
