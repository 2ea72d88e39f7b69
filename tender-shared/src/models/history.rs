/// Unified activity feed
///
/// Merges transactions, tenders, personal expenses, personal debts, extra
/// transactions and balance history into one newest-first list. Each entry
/// names the table it came from in `source`.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{MySql, MySqlPool, QueryBuilder};

/// Page size when the request doesn't set one
pub const DEFAULT_LIMIT: i64 = 50;

const UNION_SQL: &str = r#"
    SELECT id, 'Transaction' AS source, amount, total, date FROM transactions
    UNION ALL
    SELECT id, 'Tender' AS source, total AS amount, NULL AS total, date FROM tenders
    UNION ALL
    SELECT id, 'PersonalExpense' AS source, amount, NULL AS total, date FROM personal_expenses
    UNION ALL
    SELECT id, 'PersonalDebt' AS source, amount, NULL AS total,
           CAST(get_date AS DATETIME) AS date FROM personal_debts
    UNION ALL
    SELECT id, 'ExtraTransaction' AS source, total AS amount, NULL AS total, date FROM extra_transactions
    UNION ALL
    SELECT id, 'BalanceHistory' AS source, amount, NULL AS total, created_at AS date FROM balance_history
"#;

/// One feed entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HistoryEntry {
    pub id: i64,
    pub source: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    pub date: Option<DateTime<Utc>>,
}

/// Feed request
///
/// `offset` is a 1-based position: offset n skips n - 1 entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryRequest {
    pub source: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl HistoryRequest {
    /// Effective `(limit, offset)` for the SQL query
    pub fn pagination(&self) -> (i64, i64) {
        let limit = match self.limit {
            Some(limit) if limit > 0 => limit,
            _ => DEFAULT_LIMIT,
        };
        let offset = match self.offset {
            Some(offset) if offset > 0 => offset - 1,
            _ => 0,
        };
        (limit, offset)
    }

    fn query(&self) -> QueryBuilder<'static, MySql> {
        let mut query = QueryBuilder::<MySql>::new("SELECT id, source, amount, total, date FROM (");
        query.push(UNION_SQL);
        query.push(") h");

        let mut clause = " WHERE ";
        if let Some(source) = self.source.clone().filter(|s| !s.is_empty()) {
            query.push(clause).push("h.source = ").push_bind(source);
            clause = " AND ";
        }
        if let Some(start) = self.start_date {
            query.push(clause).push("h.date >= ").push_bind(start.and_time(NaiveTime::default()));
            clause = " AND ";
        }
        if let Some(end) = self.end_date {
            let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default();
            query.push(clause).push("h.date <= ").push_bind(end.and_time(end_of_day));
        }

        let (limit, offset) = self.pagination();
        query.push(" ORDER BY h.date DESC, h.id DESC LIMIT ");
        query.push_bind(limit);
        query.push(" OFFSET ");
        query.push_bind(offset);
        query
    }

    pub async fn fetch(&self, pool: &MySqlPool) -> Result<Vec<HistoryEntry>, sqlx::Error> {
        self.query()
            .build_query_as::<HistoryEntry>()
            .fetch_all(pool)
            .await
    }
}
