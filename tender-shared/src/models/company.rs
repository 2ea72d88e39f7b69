/// Company model and database operations
///
/// Companies are the counterparties transactions and tenders are booked
/// against. Reports group by company id.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE companies (
///     id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     description TEXT NULL
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

/// Company record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Input for creating or replacing a company
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyInput {
    pub name: String,
    pub description: Option<String>,
}

impl Company {
    /// Creates a new company
    pub async fn create(pool: &MySqlPool, data: CompanyInput) -> Result<Self, sqlx::Error> {
        let result = sqlx::query("INSERT INTO companies (name, description) VALUES (?, ?)")
            .bind(data.name)
            .bind(data.description)
            .execute(pool)
            .await?;

        let id = result.last_insert_id() as i64;
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Lists all companies
    pub async fn list(pool: &MySqlPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Company>("SELECT id, name, description FROM companies ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Finds a company by ID
    pub async fn find_by_id(pool: &MySqlPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Company>("SELECT id, name, description FROM companies WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replaces name and description
    ///
    /// # Returns
    ///
    /// The updated company, or None if it doesn't exist
    pub async fn update(
        pool: &MySqlPool,
        id: i64,
        data: CompanyInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query("UPDATE companies SET name = ?, description = ? WHERE id = ?")
            .bind(data.name)
            .bind(data.description)
            .bind(id)
            .execute(pool)
            .await?;

        Self::find_by_id(pool, id).await
    }

    /// Deletes a company by ID
    pub async fn delete(pool: &MySqlPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM companies WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
