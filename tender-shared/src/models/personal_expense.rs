/// Personal expenses and their yearly/monthly summaries
///
/// Each expense belongs to a category. Categories nest one level deep, so a
/// category summary includes the expenses of its direct children.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{MySql, MySqlPool, QueryBuilder};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PersonalExpense {
    pub id: i64,
    pub amount: f64,
    pub reason: String,
    pub description: Option<String>,
    pub category_id: i64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePersonalExpense {
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub reason: String,
    pub description: Option<String>,
    pub category_id: i64,

    /// Defaults to the current time
    pub date: Option<DateTime<Utc>>,
}

/// Partial update; absent fields keep their stored values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePersonalExpense {
    pub amount: Option<f64>,
    pub reason: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub date: Option<DateTime<Utc>>,
}

impl UpdatePersonalExpense {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.reason.is_none()
            && self.description.is_none()
            && self.category_id.is_none()
            && self.date.is_none()
    }
}

/// Spending in the current calendar year and month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExpenseSummary {
    pub yearly_total: f64,
    pub monthly_total: f64,
}

/// Which expenses a summary covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryScope {
    All,
    /// A category together with its direct children
    Category(i64),
    /// A single category only
    Subcategory(i64),
}

/// Builds the summary query for a scope and a reference year/month
fn summary_query(scope: SummaryScope, year: i32, month: u32) -> QueryBuilder<'static, MySql> {
    let mut query = QueryBuilder::<MySql>::new("SELECT COALESCE(SUM(CASE WHEN YEAR(pe.date) = ");
    query.push_bind(year);
    query.push(" THEN pe.amount END), 0) AS yearly_total, COALESCE(SUM(CASE WHEN YEAR(pe.date) = ");
    query.push_bind(year);
    query.push(" AND MONTH(pe.date) = ");
    query.push_bind(month);
    query.push(" THEN pe.amount END), 0) AS monthly_total FROM personal_expenses pe");

    match scope {
        SummaryScope::All => {}
        SummaryScope::Category(id) => {
            query.push(" JOIN categories c ON c.id = pe.category_id WHERE c.parent_id = ");
            query.push_bind(id);
            query.push(" OR pe.category_id = ");
            query.push_bind(id);
        }
        SummaryScope::Subcategory(id) => {
            query.push(" WHERE pe.category_id = ");
            query.push_bind(id);
        }
    }

    query
}

const SELECT_COLUMNS: &str =
    "SELECT id, amount, reason, description, category_id, date FROM personal_expenses";

impl PersonalExpense {
    pub async fn create(
        pool: &MySqlPool,
        data: CreatePersonalExpense,
    ) -> Result<Self, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO personal_expenses (amount, reason, description, category_id, date)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.amount)
        .bind(data.reason)
        .bind(data.description)
        .bind(data.category_id)
        .bind(data.date.unwrap_or_else(Utc::now))
        .execute(pool)
        .await?;

        let id = result.last_insert_id() as i64;
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &MySqlPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, PersonalExpense>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &MySqlPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, PersonalExpense>(&format!("{SELECT_COLUMNS} ORDER BY date DESC, id DESC"))
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_category(
        pool: &MySqlPool,
        category_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, PersonalExpense>(&format!(
            "{SELECT_COLUMNS} WHERE category_id = ? ORDER BY date DESC, id DESC"
        ))
        .bind(category_id)
        .fetch_all(pool)
        .await
    }

    /// Totals for the current year and month in the given scope
    pub async fn summary(
        pool: &MySqlPool,
        scope: SummaryScope,
    ) -> Result<ExpenseSummary, sqlx::Error> {
        let now = Utc::now();
        summary_query(scope, now.year(), now.month())
            .build_query_as::<ExpenseSummary>()
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &MySqlPool,
        id: i64,
        data: UpdatePersonalExpense,
    ) -> Result<Option<Self>, sqlx::Error> {
        if !data.is_empty() {
            let mut query = QueryBuilder::<MySql>::new("UPDATE personal_expenses SET ");
            let mut set = query.separated(", ");

            if let Some(amount) = data.amount {
                set.push("amount = ").push_bind_unseparated(amount);
            }
            if let Some(reason) = data.reason {
                set.push("reason = ").push_bind_unseparated(reason);
            }
            if let Some(description) = data.description {
                set.push("description = ").push_bind_unseparated(description);
            }
            if let Some(category_id) = data.category_id {
                set.push("category_id = ").push_bind_unseparated(category_id);
            }
            if let Some(date) = data.date {
                set.push("date = ").push_bind_unseparated(date);
            }

            query.push(" WHERE id = ").push_bind(id);
            query.build().execute(pool).await?;
        }

        Self::find_by_id(pool, id).await
    }

    pub async fn delete(pool: &MySqlPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM personal_expenses WHERE id = ?")
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
    fn test_summary_query_all() {
        let query = summary_query(SummaryScope::All, 2024, 5);
        let sql = query.sql();
        assert!(sql.ends_with("FROM personal_expenses pe"));
        assert!(!sql.contains("WHERE"));
        assert_eq!(sql.matches('?').count(), 3);
    }

    #[test]
    fn test_summary_query_category_includes_children() {
        let query = summary_query(SummaryScope::Category(4), 2024, 5);
        let sql = query.sql();
        assert!(sql.contains("JOIN categories c ON c.id = pe.category_id"));
        assert!(sql.contains("WHERE c.parent_id = ? OR pe.category_id = ?"));
        assert_eq!(sql.matches('?').count(), 5);
    }

    #[test]
    fn test_summary_query_subcategory() {
        let query = summary_query(SummaryScope::Subcategory(9), 2024, 5);
        let sql = query.sql();
        assert!(!sql.contains("JOIN"));
        assert!(sql.ends_with("WHERE pe.category_id = ?"));
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UpdatePersonalExpense::default().is_empty());
        assert!(!UpdatePersonalExpense {
            reason: Some(String::new()),
            ..Default::default()
        }
        .is_empty());
    }
}
