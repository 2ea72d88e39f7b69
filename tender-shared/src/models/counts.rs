/// Per-status row counts for a user
///
/// Transactions, tenders and extra transactions all expose a
/// `/realization/count/:id` view with the same shape.

use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

/// Tables that carry a `user_id` and a 0–3 `status`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountedTable {
    Transactions,
    Tenders,
    ExtraTransactions,
}

impl CountedTable {
    /// Table name as it appears in SQL
    pub fn as_str(&self) -> &'static str {
        match self {
            CountedTable::Transactions => "transactions",
            CountedTable::Tenders => "tenders",
            CountedTable::ExtraTransactions => "extra_transactions",
        }
    }
}

/// Number of rows owned by a user, in total and per status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StatusCounts {
    pub total: i64,
    pub status0: i64,
    pub status1: i64,
    pub status2: i64,
    pub status3: i64,
}

impl StatusCounts {
    /// Counts the rows of `table` owned by `user_id`
    pub async fn for_user(
        pool: &MySqlPool,
        table: CountedTable,
        user_id: i64,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(CASE WHEN status = 0 THEN 1 END) AS status0,
                COUNT(CASE WHEN status = 1 THEN 1 END) AS status1,
                COUNT(CASE WHEN status = 2 THEN 1 END) AS status2,
                COUNT(CASE WHEN status = 3 THEN 1 END) AS status3
            FROM {}
            WHERE user_id = ?
            "#,
            table.as_str()
        );

        sqlx::query_as::<_, StatusCounts>(&sql)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
