/// Tender model and database operations
///
/// A tender is a procurement contract won by a user for a company. Its
/// type is either GOIK (`ГОИК`) or GOPP (`ГОПП`) and its net value is
/// `total - commission`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{MySql, MySqlPool, QueryBuilder};

use super::date_range::{DateRangeRequest, Visibility};

pub const TYPE_GOIK: &str = "ГОИК";
pub const TYPE_GOPP: &str = "ГОПП";

/// Tender with the names of its user and company
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tender {
    pub id: i64,

    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,

    pub tender_number: Option<String>,
    pub user_id: i64,
    pub company_id: i64,
    pub organization: Option<String>,
    pub total: f64,
    pub commission: f64,
    pub completed_date: Option<NaiveDate>,
    pub date: DateTime<Utc>,
    pub status: i32,
    pub username: Option<String>,
    pub companyname: Option<String>,
}

/// Input for creating a tender; `date` is always the creation time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTender {
    #[serde(rename = "type")]
    pub kind: String,
    pub tender_number: Option<String>,
    pub user_id: i64,
    pub company_id: i64,
    pub organization: Option<String>,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub commission: f64,
    pub completed_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: i32,
}

/// Partial update; absent fields keep their stored values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTender {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub tender_number: Option<String>,
    pub user_id: Option<i64>,
    pub company_id: Option<i64>,
    pub organization: Option<String>,
    pub total: Option<f64>,
    pub commission: Option<f64>,
    pub completed_date: Option<NaiveDate>,
    pub date: Option<DateTime<Utc>>,
    pub status: Option<i32>,
}

impl UpdateTender {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.tender_number.is_none()
            && self.user_id.is_none()
            && self.company_id.is_none()
            && self.organization.is_none()
            && self.total.is_none()
            && self.commission.is_none()
            && self.completed_date.is_none()
            && self.date.is_none()
            && self.status.is_none()
    }

    /// Appends `SET` assignments for every supplied field
    fn push_assignments(self, query: &mut QueryBuilder<'_, MySql>) {
        let mut set = query.separated(", ");

        if let Some(v) = self.kind {
            set.push("type = ").push_bind_unseparated(v);
        }
        if let Some(v) = self.tender_number {
            set.push("tender_number = ").push_bind_unseparated(v);
        }
        if let Some(v) = self.user_id {
            set.push("user_id = ").push_bind_unseparated(v);
        }
        if let Some(v) = self.company_id {
            set.push("company_id = ").push_bind_unseparated(v);
        }
        if let Some(v) = self.organization {
            set.push("organization = ").push_bind_unseparated(v);
        }
        if let Some(v) = self.total {
            set.push("total = ").push_bind_unseparated(v);
        }
        if let Some(v) = self.commission {
            set.push("commission = ").push_bind_unseparated(v);
        }
        if let Some(v) = self.completed_date {
            set.push("completed_date = ").push_bind_unseparated(v);
        }
        if let Some(v) = self.date {
            set.push("date = ").push_bind_unseparated(v);
        }
        if let Some(v) = self.status {
            set.push("status = ").push_bind_unseparated(v);
        }
    }
}

/// Net tender value per company
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CompanyTotalNet {
    pub company_id: i64,
    pub total_net: f64,
}

/// Realized net tender value per type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TenderRealization {
    pub goik: f64,
    pub gopp: f64,
}

const SELECT_COLUMNS: &str = r#"
    SELECT t.id, t.type, t.tender_number, t.user_id, t.company_id, t.organization,
           t.total, t.commission, t.completed_date, t.date, t.status,
           u.name AS username, c.name AS companyname
    FROM tenders t
    JOIN users u ON u.id = t.user_id
    JOIN companies c ON c.id = t.company_id
"#;

impl Tender {
    pub async fn create(pool: &MySqlPool, data: CreateTender) -> Result<Self, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO tenders (type, tender_number, user_id, company_id, organization,
                                 total, commission, completed_date, date, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.kind)
        .bind(data.tender_number)
        .bind(data.user_id)
        .bind(data.company_id)
        .bind(data.organization)
        .bind(data.total)
        .bind(data.commission)
        .bind(data.completed_date)
        .bind(Utc::now())
        .bind(data.status)
        .execute(pool)
        .await?;

        let id = result.last_insert_id() as i64;
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &MySqlPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Tender>(&format!("{SELECT_COLUMNS} WHERE t.id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &MySqlPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Tender>(&format!("{SELECT_COLUMNS} ORDER BY t.date DESC"))
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_user(pool: &MySqlPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Tender>(&format!(
            "{SELECT_COLUMNS} WHERE t.user_id = ? ORDER BY t.date DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_by_company(
        pool: &MySqlPool,
        company_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Tender>(&format!(
            "{SELECT_COLUMNS} WHERE t.company_id = ? ORDER BY t.date DESC"
        ))
        .bind(company_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_by_user_and_status(
        pool: &MySqlPool,
        user_id: i64,
        status: i32,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Tender>(&format!(
            "{SELECT_COLUMNS} WHERE t.user_id = ? AND t.status = ? ORDER BY t.date DESC"
        ))
        .bind(user_id)
        .bind(status)
        .fetch_all(pool)
        .await
    }

    /// Tenders completed inside a date range
    ///
    /// Visibility follows [`DateRangeRequest::visibility`]; `by_company`
    /// narrows to the request's company.
    pub async fn list_completed_between(
        pool: &MySqlPool,
        range: &DateRangeRequest,
        by_company: bool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let visibility = range.visibility();
        if visibility == Visibility::Nothing {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<MySql>::new(SELECT_COLUMNS);
        query.push(" WHERE t.completed_date BETWEEN ");
        query.push_bind(range.start_date);
        query.push(" AND ");
        query.push_bind(range.end_date);

        if let Visibility::Owner(user_id) = visibility {
            query.push(" AND t.user_id = ").push_bind(user_id);
        }
        if by_company {
            query.push(" AND t.company_id = ").push_bind(range.company_id);
        }
        query.push(" ORDER BY t.completed_date DESC");

        query.build_query_as::<Tender>().fetch_all(pool).await
    }

    /// Net value (`total - commission`) per company
    pub async fn total_net_by_company(
        pool: &MySqlPool,
    ) -> Result<Vec<CompanyTotalNet>, sqlx::Error> {
        sqlx::query_as::<_, CompanyTotalNet>(
            r#"
            SELECT company_id, COALESCE(SUM(total - commission), 0) AS total_net
            FROM tenders
            GROUP BY company_id
            ORDER BY company_id
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Net value of tenders in status 2 or 3, per type
    pub async fn realization_sum(pool: &MySqlPool) -> Result<TenderRealization, sqlx::Error> {
        sqlx::query_as::<_, TenderRealization>(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN type = ? THEN total - commission END), 0) AS goik,
                COALESCE(SUM(CASE WHEN type = ? THEN total - commission END), 0) AS gopp
            FROM tenders
            WHERE status IN (2, 3)
            "#,
        )
        .bind(TYPE_GOIK)
        .bind(TYPE_GOPP)
        .fetch_one(pool)
        .await
    }

    /// Updates the supplied fields
    ///
    /// # Returns
    ///
    /// The updated tender, or None if it doesn't exist
    pub async fn update(
        pool: &MySqlPool,
        id: i64,
        data: UpdateTender,
    ) -> Result<Option<Self>, sqlx::Error> {
        if !data.is_empty() {
            let mut query = QueryBuilder::<MySql>::new("UPDATE tenders SET ");
            data.push_assignments(&mut query);
            query.push(" WHERE id = ").push_bind(id);
            query.build().execute(pool).await?;
        }

        Self::find_by_id(pool, id).await
    }

    pub async fn delete(pool: &MySqlPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tenders WHERE id = ?")
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
    fn test_update_assignments_only_for_supplied_fields() {
        let mut query = QueryBuilder::<MySql>::new("UPDATE tenders SET ");
        UpdateTender {
            total: Some(500.0),
            status: Some(2),
            ..Default::default()
        }
        .push_assignments(&mut query);
        query.push(" WHERE id = ").push_bind(7i64);

        assert_eq!(
            query.sql(),
            "UPDATE tenders SET total = ?, status = ? WHERE id = ?"
        );
    }

    #[test]
    fn test_update_leaves_completed_date_alone_when_absent() {
        let mut query = QueryBuilder::<MySql>::new("UPDATE tenders SET ");
        UpdateTender {
            commission: Some(10.0),
            ..Default::default()
        }
        .push_assignments(&mut query);

        assert!(!query.sql().contains("completed_date"));
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UpdateTender::default().is_empty());
        assert!(!UpdateTender {
            kind: Some(TYPE_GOPP.to_string()),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_type_field_is_renamed() {
        let input: CreateTender = serde_json::from_str(
            r#"{"type":"ГОИК","user_id":2,"company_id":3,"total":1000,"commission":100}"#,
        )
        .unwrap();
        assert_eq!(input.kind, TYPE_GOIK);
        assert_eq!(input.total - input.commission, 900.0);
    }
}
