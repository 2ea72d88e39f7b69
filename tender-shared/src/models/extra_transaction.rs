/// Extra transactions
///
/// Ad-hoc income or spending booked by a user outside the purchase flow.
/// They carry no company and no expenses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{MySql, MySqlPool, QueryBuilder};

use super::date_range::{DateRangeRequest, Visibility};

/// Extra transaction with the owner's name
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExtraTransaction {
    pub id: i64,
    pub user_id: i64,
    pub description: Option<String>,
    pub total: f64,
    pub date: DateTime<Utc>,
    pub status: i32,

    /// First name in lists, "first last" for single lookups
    pub name: Option<String>,
}

/// Input for creating an extra transaction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateExtraTransaction {
    pub user_id: i64,
    pub description: Option<String>,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub status: i32,
}

/// Partial update; absent fields keep their stored values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateExtraTransaction {
    pub user_id: Option<i64>,
    pub description: Option<String>,
    pub total: Option<f64>,
    pub status: Option<i32>,
}

impl UpdateExtraTransaction {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.description.is_none()
            && self.total.is_none()
            && self.status.is_none()
    }
}

const SELECT_FIRST_NAME: &str = r#"
    SELECT e.id, e.user_id, e.description, e.total, e.date, e.status, u.name AS name
    FROM extra_transactions e
    JOIN users u ON u.id = e.user_id
"#;

const SELECT_FULL_NAME: &str = r#"
    SELECT e.id, e.user_id, e.description, e.total, e.date, e.status,
           CONCAT(u.name, ' ', u.last_name) AS name
    FROM extra_transactions e
    JOIN users u ON u.id = e.user_id
"#;

impl ExtraTransaction {
    pub async fn create(
        pool: &MySqlPool,
        data: CreateExtraTransaction,
    ) -> Result<Self, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO extra_transactions (user_id, description, total, status) VALUES (?, ?, ?, ?)",
        )
        .bind(data.user_id)
        .bind(data.description)
        .bind(data.total)
        .bind(data.status)
        .execute(pool)
        .await?;

        let id = result.last_insert_id() as i64;
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &MySqlPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, ExtraTransaction>(&format!("{SELECT_FULL_NAME} WHERE e.id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All extra transactions, newest first
    pub async fn list(pool: &MySqlPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ExtraTransaction>(&format!("{SELECT_FIRST_NAME} ORDER BY e.date DESC"))
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_user(pool: &MySqlPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ExtraTransaction>(&format!(
            "{SELECT_FULL_NAME} WHERE e.user_id = ? ORDER BY e.date DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_by_user_and_status(
        pool: &MySqlPool,
        user_id: i64,
        status: i32,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ExtraTransaction>(&format!(
            "{SELECT_FIRST_NAME} WHERE e.user_id = ? AND e.status = ? ORDER BY e.date DESC"
        ))
        .bind(user_id)
        .bind(status)
        .fetch_all(pool)
        .await
    }

    /// Extra transactions booked inside a date range
    ///
    /// The end date covers its whole day. Extra transactions have no
    /// company, so the company variant of the export uses this too.
    pub async fn list_between(
        pool: &MySqlPool,
        range: &DateRangeRequest,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let visibility = range.visibility();
        if visibility == Visibility::Nothing {
            return Ok(Vec::new());
        }

        let (start, end) = range.datetime_bounds();
        let mut query = QueryBuilder::<MySql>::new(SELECT_FIRST_NAME);
        query.push(" WHERE e.date BETWEEN ");
        query.push_bind(start);
        query.push(" AND ");
        query.push_bind(end);

        if let Visibility::Owner(user_id) = visibility {
            query.push(" AND e.user_id = ").push_bind(user_id);
        }
        query.push(" ORDER BY e.date DESC");

        query
            .build_query_as::<ExtraTransaction>()
            .fetch_all(pool)
            .await
    }

    /// Updates the supplied fields
    ///
    /// # Returns
    ///
    /// The updated row, or None if it doesn't exist
    pub async fn update(
        pool: &MySqlPool,
        id: i64,
        data: UpdateExtraTransaction,
    ) -> Result<Option<Self>, sqlx::Error> {
        if !data.is_empty() {
            let mut query = QueryBuilder::<MySql>::new("UPDATE extra_transactions SET ");
            let mut set = query.separated(", ");

            if let Some(user_id) = data.user_id {
                set.push("user_id = ").push_bind_unseparated(user_id);
            }
            if let Some(description) = data.description {
                set.push("description = ").push_bind_unseparated(description);
            }
            if let Some(total) = data.total {
                set.push("total = ").push_bind_unseparated(total);
            }
            if let Some(status) = data.status {
                set.push("status = ").push_bind_unseparated(status);
            }

            query.push(" WHERE id = ").push_bind(id);
            query.build().execute(pool).await?;
        }

        Self::find_by_id(pool, id).await
    }

    pub async fn delete(pool: &MySqlPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM extra_transactions WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_is_empty() {
        assert!(UpdateExtraTransaction::default().is_empty());
        assert!(!UpdateExtraTransaction {
            status: Some(0),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_create_defaults() {
        let input: CreateExtraTransaction =
            serde_json::from_str(r#"{"user_id": 3, "description": "Аренда"}"#).unwrap();
        assert_eq!(input.user_id, 3);
        assert_eq!(input.total, 0.0);
        assert_eq!(input.status, 0);
    }
}
