/// Personal expense categories
///
/// A category with a `parent` is a subcategory. Only one level of nesting
/// is used.

use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub category_name: String,

    #[serde(rename = "parent")]
    pub parent_id: Option<i64>,
}

/// Input for creating or renaming a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryInput {
    pub category_name: String,

    #[serde(rename = "parent", default)]
    pub parent_id: Option<i64>,
}

impl Category {
    pub async fn create(pool: &MySqlPool, data: CategoryInput) -> Result<Self, sqlx::Error> {
        let result = sqlx::query("INSERT INTO categories (category_name, parent_id) VALUES (?, ?)")
            .bind(data.category_name)
            .bind(data.parent_id)
            .execute(pool)
            .await?;

        let id = result.last_insert_id() as i64;
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &MySqlPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "SELECT id, category_name, parent_id FROM categories WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list(pool: &MySqlPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT id, category_name, parent_id FROM categories ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Direct children of a category
    pub async fn list_children(pool: &MySqlPool, parent_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "SELECT id, category_name, parent_id FROM categories WHERE parent_id = ? ORDER BY id",
        )
        .bind(parent_id)
        .fetch_all(pool)
        .await
    }

    /// Renames a category; the parent is only changed when supplied
    pub async fn update(
        pool: &MySqlPool,
        id: i64,
        data: CategoryInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query(
            "UPDATE categories SET category_name = ?, parent_id = COALESCE(?, parent_id) WHERE id = ?",
        )
        .bind(data.category_name)
        .bind(data.parent_id)
        .bind(id)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, id).await
    }

    pub async fn delete(pool: &MySqlPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
