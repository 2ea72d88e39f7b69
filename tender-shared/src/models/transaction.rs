/// Transaction model and database operations
///
/// A transaction is a purchase or sale booked by a user against a company.
/// It owns a list of additional expenses (`additional_expenses`) and is paid
/// down by tranches. Its outstanding debt is `sell` minus the sum of its
/// tranche amounts.
///
/// Create, update and delete touch the transaction row and its expenses
/// together, so each runs inside a single database transaction and rolls back
/// on any failure.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE transactions (
///     id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
///     transaction_number VARCHAR(255) NULL,
///     type VARCHAR(64) NOT NULL,
///     tender_number VARCHAR(255) NULL,
///     user_id BIGINT NOT NULL,
///     company_id BIGINT NULL,
///     organization VARCHAR(255) NULL,
///     amount DOUBLE NOT NULL DEFAULT 0,
///     total DOUBLE NOT NULL DEFAULT 0,
///     sell DOUBLE NOT NULL DEFAULT 0,
///     product_name VARCHAR(255) NULL,
///     completed_date DATE NULL,
///     date DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
///     status INT NOT NULL DEFAULT 0
/// );
///
/// CREATE TABLE additional_expenses (
///     id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     amount DOUBLE NOT NULL DEFAULT 0,
///     transaction_id BIGINT NOT NULL REFERENCES transactions (id) ON DELETE CASCADE
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tender_shared::models::transaction::{CreateTransaction, NewExpense, Transaction};
/// use tender_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let created = Transaction::create(&pool, CreateTransaction {
///     kind: "Закуп".to_string(),
///     user_id: 2,
///     company_id: Some(1),
///     amount: 1000.0,
///     total: 1200.0,
///     sell: 1500.0,
///     expenses: vec![NewExpense { name: "Доставка".to_string(), amount: 50.0 }],
///     ..Default::default()
/// }).await?;
///
/// assert_eq!(created.expenses.len(), 1);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{MySql, MySqlConnection, MySqlPool, QueryBuilder};
use std::collections::HashMap;

use super::date_range::{DateRangeRequest, Visibility};

/// Transaction type for purchases
pub const TYPE_ZAKUP: &str = "Закуп";

/// Largest number of ids bound into one `IN (...)` list
///
/// MySQL rejects prepared statements with more than 65,535 placeholders, so
/// per-transaction lookups over long listings are split into batches.
pub const ID_CHUNK_SIZE: usize = 1000;

/// `prefix ?, ?, ... suffix` with one bound parameter per id
fn id_list_query(prefix: &str, ids: &[i64], suffix: &str) -> QueryBuilder<'static, MySql> {
    let mut query = QueryBuilder::<MySql>::new(prefix);
    let mut list = query.separated(", ");
    for id in ids {
        list.push_bind(*id);
    }
    list.push_unseparated(suffix);
    query
}

/// Additional expense attached to a transaction
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Expense {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub transaction_id: i64,
}

/// Expense as supplied by clients on create/update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub name: String,
    #[serde(default)]
    pub amount: f64,
}

/// Transaction with its expenses and the names of its user and company
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: i64,
    pub transaction_number: Option<String>,

    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,

    pub tender_number: Option<String>,
    pub user_id: i64,
    pub company_id: Option<i64>,
    pub organization: Option<String>,
    pub amount: f64,
    pub total: f64,
    pub sell: f64,
    pub product_name: Option<String>,
    pub completed_date: Option<NaiveDate>,
    pub date: DateTime<Utc>,
    pub status: i32,
    pub user_name: Option<String>,
    pub company_name: Option<String>,

    #[sqlx(skip)]
    #[serde(default)]
    pub expenses: Vec<Expense>,

    /// Outstanding debt, only filled by the per-company listing
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt: Option<f64>,
}

/// Input for creating a transaction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTransaction {
    pub transaction_number: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub tender_number: Option<String>,
    pub user_id: i64,
    pub company_id: Option<i64>,
    pub organization: Option<String>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub sell: f64,
    pub product_name: Option<String>,
    pub completed_date: Option<NaiveDate>,

    /// Defaults to the current time
    pub date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: i32,
    #[serde(default)]
    pub expenses: Vec<NewExpense>,
}

/// Partial update; absent fields keep their stored values
///
/// When `expenses` is present it replaces the whole expense list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTransaction {
    pub transaction_number: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub tender_number: Option<String>,
    pub user_id: Option<i64>,
    pub company_id: Option<i64>,
    pub organization: Option<String>,
    pub amount: Option<f64>,
    pub total: Option<f64>,
    pub sell: Option<f64>,
    pub product_name: Option<String>,
    pub completed_date: Option<NaiveDate>,
    pub status: Option<i32>,
    pub expenses: Option<Vec<NewExpense>>,
}

impl UpdateTransaction {
    /// Overlays the supplied fields on an existing row
    fn apply_to(self, existing: &mut Transaction) -> Option<Vec<NewExpense>> {
        if let Some(v) = self.transaction_number {
            existing.transaction_number = Some(v);
        }
        if let Some(v) = self.kind {
            existing.kind = v;
        }
        if let Some(v) = self.tender_number {
            existing.tender_number = Some(v);
        }
        if let Some(v) = self.user_id {
            existing.user_id = v;
        }
        if let Some(v) = self.company_id {
            existing.company_id = Some(v);
        }
        if let Some(v) = self.organization {
            existing.organization = Some(v);
        }
        if let Some(v) = self.amount {
            existing.amount = v;
        }
        if let Some(v) = self.total {
            existing.total = v;
        }
        if let Some(v) = self.sell {
            existing.sell = v;
        }
        if let Some(v) = self.product_name {
            existing.product_name = Some(v);
        }
        if let Some(v) = self.completed_date {
            existing.completed_date = Some(v);
        }
        if let Some(v) = self.status {
            existing.status = v;
        }
        self.expenses
    }
}

/// Debt of one transaction, with its company
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TransactionDebt {
    pub transaction_id: i64,
    pub company_id: Option<i64>,
    pub debt: f64,
}

/// Debt of one transaction
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SingleTransactionDebt {
    pub transaction_id: i64,
    pub debt: f64,
}

/// Summed debt of a company
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CompanyDebt {
    pub company_id: Option<i64>,
    pub debt: f64,
}

/// Outstanding debt: sale price minus everything already paid in tranches
pub fn outstanding_debt(sell: f64, tranche_total: f64) -> f64 {
    sell - tranche_total
}

const SELECT_COLUMNS: &str = r#"
    SELECT t.id, t.transaction_number, t.type, t.tender_number, t.user_id, t.company_id,
           t.organization, t.amount, t.total, t.sell, t.product_name, t.completed_date,
           t.date, t.status, u.name AS user_name, c.name AS company_name
    FROM transactions t
"#;

/// Only transactions whose user and company both exist
const INNER_JOINS: &str = " JOIN users u ON u.id = t.user_id JOIN companies c ON c.id = t.company_id ";

const LEFT_JOINS: &str =
    " LEFT JOIN users u ON u.id = t.user_id LEFT JOIN companies c ON c.id = t.company_id ";

async fn insert_expenses(
    conn: &mut MySqlConnection,
    transaction_id: i64,
    expenses: &[NewExpense],
) -> Result<(), sqlx::Error> {
    if expenses.is_empty() {
        return Ok(());
    }

    let mut query =
        QueryBuilder::<MySql>::new("INSERT INTO additional_expenses (name, amount, transaction_id) ");
    query.push_values(expenses, |mut row, expense| {
        row.push_bind(expense.name.clone())
            .push_bind(expense.amount)
            .push_bind(transaction_id);
    });
    query.build().execute(conn).await?;

    Ok(())
}

impl Transaction {
    /// Creates a transaction and its expenses atomically
    ///
    /// # Returns
    ///
    /// The stored transaction re-read with user/company names and expenses
    ///
    /// # Errors
    ///
    /// Any failing statement rolls back the whole operation
    pub async fn create(pool: &MySqlPool, data: CreateTransaction) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO transactions (transaction_number, type, tender_number, user_id, company_id,
                                      organization, amount, total, sell, product_name,
                                      completed_date, date, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.transaction_number)
        .bind(data.kind)
        .bind(data.tender_number)
        .bind(data.user_id)
        .bind(data.company_id)
        .bind(data.organization)
        .bind(data.amount)
        .bind(data.total)
        .bind(data.sell)
        .bind(data.product_name)
        .bind(data.completed_date)
        .bind(data.date.unwrap_or_else(Utc::now))
        .bind(data.status)
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_id() as i64;
        insert_expenses(&mut *tx, id, &data.expenses).await?;

        tx.commit().await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Finds a transaction by ID, with expenses
    pub async fn find_by_id(pool: &MySqlPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let found = sqlx::query_as::<_, Transaction>(&format!(
            "{SELECT_COLUMNS}{LEFT_JOINS} WHERE t.id = ?"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        match found {
            Some(transaction) => {
                let mut list = vec![transaction];
                Self::attach_expenses(pool, &mut list).await?;
                Ok(list.pop())
            }
            None => Ok(None),
        }
    }

    /// Lists every transaction, newest first
    pub async fn list(pool: &MySqlPool) -> Result<Vec<Self>, sqlx::Error> {
        let mut list = sqlx::query_as::<_, Transaction>(&format!(
            "{SELECT_COLUMNS}{INNER_JOINS} ORDER BY t.date DESC"
        ))
        .fetch_all(pool)
        .await?;

        Self::attach_expenses(pool, &mut list).await?;
        Ok(list)
    }

    /// Lists a user's transactions, newest first
    pub async fn list_by_user(pool: &MySqlPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let mut list = sqlx::query_as::<_, Transaction>(&format!(
            "{SELECT_COLUMNS}{INNER_JOINS} WHERE t.user_id = ? ORDER BY t.date DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Self::attach_expenses(pool, &mut list).await?;
        Ok(list)
    }

    /// Lists a company's transactions, newest first, each with its debt
    pub async fn list_by_company(
        pool: &MySqlPool,
        company_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut list = sqlx::query_as::<_, Transaction>(&format!(
            "{SELECT_COLUMNS}{INNER_JOINS} WHERE t.company_id = ? ORDER BY t.date DESC"
        ))
        .bind(company_id)
        .fetch_all(pool)
        .await?;

        Self::attach_expenses(pool, &mut list).await?;
        Self::attach_debts(pool, &mut list).await?;
        Ok(list)
    }

    /// Lists transactions of one user with one company
    pub async fn list_by_user_and_company(
        pool: &MySqlPool,
        user_id: i64,
        company_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut list = sqlx::query_as::<_, Transaction>(&format!(
            "{SELECT_COLUMNS}{INNER_JOINS} WHERE t.company_id = ? AND t.user_id = ? ORDER BY t.date DESC"
        ))
        .bind(company_id)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Self::attach_expenses(pool, &mut list).await?;
        Ok(list)
    }

    /// Lists a user's transactions in a given status
    pub async fn list_by_user_and_status(
        pool: &MySqlPool,
        user_id: i64,
        status: i32,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut list = sqlx::query_as::<_, Transaction>(&format!(
            "{SELECT_COLUMNS}{LEFT_JOINS} WHERE t.user_id = ? AND t.status = ? ORDER BY t.date DESC"
        ))
        .bind(user_id)
        .bind(status)
        .fetch_all(pool)
        .await?;

        Self::attach_expenses(pool, &mut list).await?;
        Ok(list)
    }

    /// Lists transactions completed inside a date range
    ///
    /// Visibility follows [`DateRangeRequest::visibility`]. When
    /// `by_company` is set the request's `company_id` narrows the result.
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
        query.push(INNER_JOINS);
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

        let mut list = query.build_query_as::<Transaction>().fetch_all(pool).await?;

        Self::attach_expenses(pool, &mut list).await?;
        Ok(list)
    }

    /// Loads the expenses of every listed transaction, [`ID_CHUNK_SIZE`] ids per query
    async fn attach_expenses(pool: &MySqlPool, list: &mut [Self]) -> Result<(), sqlx::Error> {
        let ids: Vec<i64> = list.iter().map(|transaction| transaction.id).collect();

        let mut grouped: HashMap<i64, Vec<Expense>> = HashMap::new();
        for chunk in ids.chunks(ID_CHUNK_SIZE) {
            let mut query = id_list_query(
                "SELECT id, name, amount, transaction_id FROM additional_expenses WHERE transaction_id IN (",
                chunk,
                ") ORDER BY id",
            );
            for expense in query.build_query_as::<Expense>().fetch_all(pool).await? {
                grouped.entry(expense.transaction_id).or_default().push(expense);
            }
        }

        for transaction in list.iter_mut() {
            transaction.expenses = grouped.remove(&transaction.id).unwrap_or_default();
        }

        Ok(())
    }

    /// Fills `debt` for every listed transaction
    async fn attach_debts(pool: &MySqlPool, list: &mut [Self]) -> Result<(), sqlx::Error> {
        let ids: Vec<i64> = list.iter().map(|transaction| transaction.id).collect();

        let mut paid: HashMap<i64, f64> = HashMap::new();
        for chunk in ids.chunks(ID_CHUNK_SIZE) {
            let mut query = id_list_query(
                "SELECT transaction_id, COALESCE(SUM(amount), 0) FROM tranches WHERE transaction_id IN (",
                chunk,
                ") GROUP BY transaction_id",
            );
            paid.extend(query.build_query_as::<(i64, f64)>().fetch_all(pool).await?);
        }

        for transaction in list.iter_mut() {
            let tranche_total = paid.get(&transaction.id).copied().unwrap_or(0.0);
            transaction.debt = Some(outstanding_debt(transaction.sell, tranche_total));
        }

        Ok(())
    }

    /// Updates a transaction and, when supplied, replaces its expenses
    ///
    /// Runs inside one database transaction. The row is locked while the
    /// supplied fields are merged over the stored ones.
    ///
    /// # Returns
    ///
    /// The updated transaction, or None if it doesn't exist
    pub async fn update(
        pool: &MySqlPool,
        id: i64,
        data: UpdateTransaction,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let existing = sqlx::query_as::<_, Transaction>(&format!(
            "{SELECT_COLUMNS}{LEFT_JOINS} WHERE t.id = ? FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut merged) = existing else {
            tx.rollback().await?;
            return Ok(None);
        };
        let expenses = data.apply_to(&mut merged);

        sqlx::query(
            r#"
            UPDATE transactions
            SET transaction_number = ?, type = ?, tender_number = ?, user_id = ?, company_id = ?,
                organization = ?, amount = ?, total = ?, sell = ?, product_name = ?,
                completed_date = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(&merged.transaction_number)
        .bind(&merged.kind)
        .bind(&merged.tender_number)
        .bind(merged.user_id)
        .bind(merged.company_id)
        .bind(&merged.organization)
        .bind(merged.amount)
        .bind(merged.total)
        .bind(merged.sell)
        .bind(&merged.product_name)
        .bind(merged.completed_date)
        .bind(merged.status)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if let Some(expenses) = expenses {
            sqlx::query("DELETE FROM additional_expenses WHERE transaction_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            insert_expenses(&mut *tx, id, &expenses).await?;
        }

        tx.commit().await?;

        Self::find_by_id(pool, id).await
    }

    /// Deletes a transaction together with its expenses
    ///
    /// # Returns
    ///
    /// False (and nothing deleted) if the transaction doesn't exist
    pub async fn delete(pool: &MySqlPool, id: i64) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM additional_expenses WHERE transaction_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Sum of `total` over a user's purchases in status 2
    pub async fn zakup_total_for_user(pool: &MySqlPool, user_id: i64) -> Result<f64, sqlx::Error> {
        let (sum,): (f64,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(total), 0)
            FROM transactions
            WHERE status = 2 AND user_id = ? AND type = ?
            "#,
        )
        .bind(user_id)
        .bind(TYPE_ZAKUP)
        .fetch_one(pool)
        .await?;

        Ok(sum)
    }

    /// `total` of a single purchase in status 2, None otherwise
    pub async fn zakup_debt(pool: &MySqlPool, id: i64) -> Result<Option<f64>, sqlx::Error> {
        let row: Option<(f64,)> = sqlx::query_as(
            "SELECT total FROM transactions WHERE status = 2 AND id = ? AND type = ?",
        )
        .bind(id)
        .bind(TYPE_ZAKUP)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|(total,)| total))
    }

    /// Sum of `sell` over all realized purchases (status 3)
    pub async fn realization_sum(pool: &MySqlPool) -> Result<f64, sqlx::Error> {
        let (sum,): (f64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(sell), 0) FROM transactions WHERE status = 3 AND type = ?",
        )
        .bind(TYPE_ZAKUP)
        .fetch_one(pool)
        .await?;

        Ok(sum)
    }

    /// Outstanding debt of every transaction in status 2 or 3
    pub async fn debts(pool: &MySqlPool) -> Result<Vec<TransactionDebt>, sqlx::Error> {
        sqlx::query_as::<_, TransactionDebt>(
            r#"
            SELECT t.id AS transaction_id, t.company_id, t.sell - IFNULL(SUM(tr.amount), 0) AS debt
            FROM transactions t
            LEFT JOIN tranches tr ON t.id = tr.transaction_id
            WHERE t.status = 2 OR t.status = 3
            GROUP BY t.id
            ORDER BY t.id
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Outstanding debt of one transaction
    pub async fn debt_of(
        pool: &MySqlPool,
        id: i64,
    ) -> Result<Vec<SingleTransactionDebt>, sqlx::Error> {
        sqlx::query_as::<_, SingleTransactionDebt>(
            r#"
            SELECT t.id AS transaction_id, t.sell - IFNULL(SUM(tr.amount), 0) AS debt
            FROM transactions t
            LEFT JOIN tranches tr ON t.id = tr.transaction_id
            WHERE t.id = ?
            GROUP BY t.id
            "#,
        )
        .bind(id)
        .fetch_all(pool)
        .await
    }

    /// Outstanding debt per company over transactions in status 2
    pub async fn company_debts(pool: &MySqlPool) -> Result<Vec<CompanyDebt>, sqlx::Error> {
        sqlx::query_as::<_, CompanyDebt>(
            r#"
            SELECT t.company_id, SUM(t.sell - IFNULL(tr.total_tranche_amount, 0)) AS debt
            FROM transactions t
            LEFT JOIN (
                SELECT transaction_id, SUM(amount) AS total_tranche_amount
                FROM tranches
                GROUP BY transaction_id
            ) tr ON t.id = tr.transaction_id
            WHERE t.status = 2
            GROUP BY t.company_id
            ORDER BY t.company_id
            "#,
        )
        .fetch_all(pool)
        .await
    }
}
