/// Balance categories and balance history
///
/// History rows record movements of a user's cash balance, optionally
/// tagged with a balance category.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BalanceCategory {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBalanceCategory {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

/// Rename, id carried in the body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBalanceCategory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

impl BalanceCategory {
    pub async fn create(
        pool: &MySqlPool,
        data: CreateBalanceCategory,
    ) -> Result<Self, sqlx::Error> {
        let result = sqlx::query("INSERT INTO balance_category (name, parent_id) VALUES (?, ?)")
            .bind(data.name)
            .bind(data.parent_id)
            .execute(pool)
            .await?;

        let id = result.last_insert_id() as i64;
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &MySqlPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, BalanceCategory>(
            "SELECT id, name, parent_id, created_at, updated_at FROM balance_category WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// All categories, alphabetically
    pub async fn list(pool: &MySqlPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, BalanceCategory>(
            "SELECT id, name, parent_id, created_at, updated_at FROM balance_category ORDER BY name",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &MySqlPool,
        data: UpdateBalanceCategory,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query(
            "UPDATE balance_category SET name = ?, parent_id = COALESCE(?, parent_id) WHERE id = ?",
        )
        .bind(data.name)
        .bind(data.parent_id)
        .bind(data.id)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, data.id).await
    }

    pub async fn delete(pool: &MySqlPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM balance_category WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BalanceHistory {
    pub id: i64,
    pub amount: f64,
    pub description: Option<String>,
    pub user_id: i64,
    pub category_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing a history row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceHistoryInput {
    #[serde(default)]
    pub amount: f64,
    pub description: Option<String>,
    pub user_id: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
}

const HISTORY_COLUMNS: &str = r#"
    SELECT id, amount, description, user_id, category_id, created_at, updated_at
    FROM balance_history
"#;

impl BalanceHistory {
    pub async fn create(pool: &MySqlPool, data: BalanceHistoryInput) -> Result<Self, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO balance_history (amount, description, user_id, category_id) VALUES (?, ?, ?, ?)",
        )
        .bind(data.amount)
        .bind(data.description)
        .bind(data.user_id)
        .bind(data.category_id)
        .execute(pool)
        .await?;

        let id = result.last_insert_id() as i64;
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &MySqlPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, BalanceHistory>(&format!("{HISTORY_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A user's balance movements, newest first
    pub async fn list_by_user(pool: &MySqlPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, BalanceHistory>(&format!(
            "{HISTORY_COLUMNS} WHERE user_id = ? ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_by_category(
        pool: &MySqlPool,
        category_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, BalanceHistory>(&format!(
            "{HISTORY_COLUMNS} WHERE category_id = ? ORDER BY created_at DESC, id DESC"
        ))
        .bind(category_id)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &MySqlPool,
        id: i64,
        data: BalanceHistoryInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE balance_history
            SET amount = ?, description = ?, user_id = ?, category_id = COALESCE(?, category_id)
            WHERE id = ?
            "#,
        )
        .bind(data.amount)
        .bind(data.description)
        .bind(data.user_id)
        .bind(data.category_id)
        .bind(id)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, id).await
    }

    pub async fn delete(pool: &MySqlPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM balance_history WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
