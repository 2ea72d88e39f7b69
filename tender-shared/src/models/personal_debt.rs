/// Personal debts
///
/// Money lent or borrowed outside the business. Repayments are tracked as
/// debt tranches, see [`super::debt_tranche`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PersonalDebt {
    pub id: i64,
    pub name: String,
    pub amount: f64,

    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,

    pub get_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub status: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePersonalDebt {
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub get_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: i32,
}

/// Full replacement of a debt, id carried in the body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePersonalDebt {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub get_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: i32,
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, name, amount, type, get_date, return_date, status, created_at, updated_at
    FROM personal_debts
"#;

impl PersonalDebt {
    pub async fn create(pool: &MySqlPool, data: CreatePersonalDebt) -> Result<Self, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO personal_debts (name, amount, type, get_date, return_date, status)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.name)
        .bind(data.amount)
        .bind(data.kind)
        .bind(data.get_date)
        .bind(data.return_date)
        .bind(data.status)
        .execute(pool)
        .await?;

        let id = result.last_insert_id() as i64;
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &MySqlPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, PersonalDebt>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All debts, most recently created first
    pub async fn list(pool: &MySqlPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, PersonalDebt>(&format!("{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC"))
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_status(pool: &MySqlPool, status: i32) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, PersonalDebt>(&format!(
            "{SELECT_COLUMNS} WHERE status = ? ORDER BY created_at DESC, id DESC"
        ))
        .bind(status)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &MySqlPool,
        data: UpdatePersonalDebt,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE personal_debts
            SET name = ?, amount = ?, type = ?, get_date = ?, return_date = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(data.name)
        .bind(data.amount)
        .bind(data.kind)
        .bind(data.get_date)
        .bind(data.return_date)
        .bind(data.status)
        .bind(data.id)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, data.id).await
    }

    /// Deletes a debt; its tranches go with it
    pub async fn delete(pool: &MySqlPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM personal_debts WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
