/// Database models for the tender bookkeeping service
///
/// Each model owns its SQL. Operations take a `&MySqlPool`, return
/// `sqlx::Error` on failure, and report missing rows as `None` (lookups,
/// updates) or `false` (deletes).
///
/// # Models
///
/// - `user`: accounts, sign-up/login, balances
/// - `company`, `permission`: counterparties and user access to them
/// - `transaction`: purchases/sales with their additional expenses and debts
/// - `payment`: tranches and changes recorded against a transaction
/// - `tender`, `extra_transaction`: the other two kinds of business
/// - `personal_expense`, `category`, `personal_debt`, `debt_tranche`: personal finance
/// - `balance`: balance categories and balance history
/// - `notify`: push tokens and delivered notifications
/// - `report`, `sums`, `history`, `counts`: read-only aggregates
/// - `date_range`: shared body of the date-range exports
///
/// # Example
///
/// ```no_run
/// use tender_shared::models::company::{Company, CompanyInput};
/// use tender_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let company = Company::create(&pool, CompanyInput {
///     name: "ОсОО Ала-Тоо".to_string(),
///     description: None,
/// }).await?;
///
/// assert!(Company::delete(&pool, company.id).await?);
/// # Ok(())
/// # }
/// ```

pub mod balance;
pub mod category;
pub mod company;
pub mod counts;
pub mod date_range;
pub mod debt_tranche;
pub mod extra_transaction;
pub mod history;
pub mod notify;
pub mod payment;
pub mod permission;
pub mod personal_debt;
pub mod personal_expense;
pub mod report;
pub mod sums;
pub mod tender;
pub mod transaction;
pub mod user;
