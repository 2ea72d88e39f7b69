/// Transaction amount reports
///
/// Every report sums `transactions.amount` and differs only in its filter
/// and grouping:
///
/// - yearly: per year, then per month inside it (`[{year, months}]`)
/// - monthly: per calendar month (`[{name, amount}]`)
/// - per company: per company (`[{name, total_amount}]`)
///
/// Filters are optional and combine with AND. Month names come from
/// MySQL's `MONTHNAME`, so they follow the server's `lc_time_names`.

use serde::{Deserialize, Serialize};
use sqlx::{MySql, MySqlPool, QueryBuilder};

/// Optional filters shared by every report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub user_id: Option<i64>,
    pub company_id: Option<i64>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl ReportFilter {
    fn push_where(&self, query: &mut QueryBuilder<'_, MySql>) {
        let mut clause = " WHERE ";

        if let Some(user_id) = self.user_id {
            query.push(clause).push("t.user_id = ").push_bind(user_id);
            clause = " AND ";
        }
        if let Some(company_id) = self.company_id {
            query.push(clause).push("t.company_id = ").push_bind(company_id);
            clause = " AND ";
        }
        if let Some(year) = self.year {
            query.push(clause).push("YEAR(t.date) = ").push_bind(year);
            clause = " AND ";
        }
        if let Some(month) = self.month {
            query.push(clause).push("MONTH(t.date) = ").push_bind(month);
        }
    }
}

/// Sum for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MonthlyAmount {
    pub name: String,
    pub amount: f64,
}

/// Monthly sums of one year, newest month first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyAmounts {
    pub year: i64,
    pub months: Vec<MonthlyAmount>,
}

/// Sum for one company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CompanyTotalAmount {
    pub name: String,
    pub total_amount: f64,
}

/// Row of the per-year-and-month query
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
struct YearMonthRow {
    year: i64,
    name: String,
    amount: f64,
}

/// Folds rows ordered by year DESC, month DESC into per-year groups
fn group_by_year(rows: Vec<YearMonthRow>) -> Vec<YearlyAmounts> {
    let mut grouped: Vec<YearlyAmounts> = Vec::new();

    for row in rows {
        let month = MonthlyAmount {
            name: row.name,
            amount: row.amount,
        };
        match grouped.last_mut() {
            Some(current) if current.year == row.year => current.months.push(month),
            _ => grouped.push(YearlyAmounts {
                year: row.year,
                months: vec![month],
            }),
        }
    }

    grouped
}

fn year_month_query(filter: &ReportFilter) -> QueryBuilder<'static, MySql> {
    let mut query = QueryBuilder::<MySql>::new(
        "SELECT CAST(YEAR(t.date) AS SIGNED) AS year, MONTHNAME(t.date) AS name, \
         COALESCE(SUM(t.amount), 0) AS amount FROM transactions t",
    );
    filter.push_where(&mut query);
    query.push(" GROUP BY year, MONTH(t.date), name ORDER BY year DESC, MONTH(t.date) DESC");
    query
}

fn month_query(filter: &ReportFilter) -> QueryBuilder<'static, MySql> {
    let mut query = QueryBuilder::<MySql>::new(
        "SELECT MONTHNAME(t.date) AS name, COALESCE(SUM(t.amount), 0) AS amount FROM transactions t",
    );
    filter.push_where(&mut query);
    query.push(" GROUP BY MONTH(t.date), name ORDER BY MONTH(t.date) DESC");
    query
}

fn company_query(filter: &ReportFilter) -> QueryBuilder<'static, MySql> {
    let mut query = QueryBuilder::<MySql>::new(
        "SELECT c.name AS name, COALESCE(SUM(t.amount), 0) AS total_amount \
         FROM transactions t JOIN companies c ON c.id = t.company_id",
    );
    filter.push_where(&mut query);
    query.push(" GROUP BY c.id, c.name ORDER BY c.id");
    query
}

/// Sums grouped by year, then month
pub async fn yearly(
    pool: &MySqlPool,
    filter: &ReportFilter,
) -> Result<Vec<YearlyAmounts>, sqlx::Error> {
    let rows = year_month_query(filter)
        .build_query_as::<YearMonthRow>()
        .fetch_all(pool)
        .await?;

    Ok(group_by_year(rows))
}

/// Sums grouped by calendar month
///
/// Months of different years fall into the same bucket unless the filter
/// pins a year.
pub async fn monthly(
    pool: &MySqlPool,
    filter: &ReportFilter,
) -> Result<Vec<MonthlyAmount>, sqlx::Error> {
    month_query(filter)
        .build_query_as::<MonthlyAmount>()
        .fetch_all(pool)
        .await
}

/// Sums grouped by company, in company id order
pub async fn by_company(
    pool: &MySqlPool,
    filter: &ReportFilter,
) -> Result<Vec<CompanyTotalAmount>, sqlx::Error> {
    company_query(filter)
        .build_query_as::<CompanyTotalAmount>()
        .fetch_all(pool)
        .await
}
