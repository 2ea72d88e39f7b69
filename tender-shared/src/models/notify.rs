/// Push notification device tokens and delivery history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

/// A device token registered for a user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct NotifyToken {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotifyToken {
    pub user_id: i64,
    pub token: String,
}

impl NotifyToken {
    pub async fn create(pool: &MySqlPool, data: CreateNotifyToken) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO notify_tokens (user_id, token) VALUES (?, ?)")
            .bind(data.user_id)
            .bind(data.token)
            .execute(pool)
            .await?;

        Ok(result.last_insert_id() as i64)
    }

    pub async fn list_by_user(pool: &MySqlPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, NotifyToken>(
            "SELECT id, user_id, token, created_at FROM notify_tokens WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Removes every registration of a token string
    pub async fn delete_by_token(pool: &MySqlPool, token: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notify_tokens WHERE token = ?")
            .bind(token)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// A delivered notification
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct NotifyHistory {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl NotifyHistory {
    pub async fn record(
        pool: &MySqlPool,
        user_id: i64,
        title: &str,
        body: &str,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO notify_history (user_id, title, body) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(title)
            .bind(body)
            .execute(pool)
            .await?;

        Ok(result.last_insert_id() as i64)
    }

    /// A user's notifications, newest first
    pub async fn list_by_user(pool: &MySqlPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, NotifyHistory>(
            r#"
            SELECT id, user_id, title, body, created_at
            FROM notify_history
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn delete(pool: &MySqlPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notify_history WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
