/// Permission model: which user may work with which company
///
/// New grants start with status 1 (active).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE permissions (
///     id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
///     user_id BIGINT NOT NULL,
///     company_id BIGINT NOT NULL,
///     status INT NOT NULL DEFAULT 1
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

/// Status assigned to freshly granted permissions
pub const PERMISSION_ACTIVE: i32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Permission {
    pub id: i64,
    pub user_id: i64,
    pub company_id: i64,
    pub status: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePermission {
    pub user_id: i64,
    pub company_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePermission {
    pub user_id: i64,
    pub company_id: i64,
    pub status: i32,
}

impl Permission {
    /// Grants a user access to a company
    pub async fn create(pool: &MySqlPool, data: CreatePermission) -> Result<Self, sqlx::Error> {
        let result =
            sqlx::query("INSERT INTO permissions (user_id, company_id, status) VALUES (?, ?, ?)")
                .bind(data.user_id)
                .bind(data.company_id)
                .bind(PERMISSION_ACTIVE)
                .execute(pool)
                .await?;

        Ok(Self {
            id: result.last_insert_id() as i64,
            user_id: data.user_id,
            company_id: data.company_id,
            status: PERMISSION_ACTIVE,
        })
    }

    pub async fn find_by_id(pool: &MySqlPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Permission>(
            "SELECT id, user_id, company_id, status FROM permissions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists the permissions held by a user
    pub async fn list_by_user(pool: &MySqlPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Permission>(
            "SELECT id, user_id, company_id, status FROM permissions WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Rewrites a permission; None if it doesn't exist
    pub async fn update(
        pool: &MySqlPool,
        id: i64,
        data: UpdatePermission,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query("UPDATE permissions SET user_id = ?, company_id = ?, status = ? WHERE id = ?")
            .bind(data.user_id)
            .bind(data.company_id)
            .bind(data.status)
            .bind(id)
            .execute(pool)
            .await?;

        Self::find_by_id(pool, id).await
    }

    pub async fn delete(pool: &MySqlPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM permissions WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
