/// User model and database operations
///
/// Users are the accounts of the trading business: managers who own
/// transactions and tenders, and the administrator (id 1) who sees everything
/// in the date-range exports. Each user carries a running cash `balance`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
///     name VARCHAR(255) NOT NULL DEFAULT '',
///     last_name VARCHAR(255) NOT NULL DEFAULT '',
///     email VARCHAR(255) NOT NULL UNIQUE,
///     phone VARCHAR(64) NULL UNIQUE,
///     inn VARCHAR(64) NOT NULL DEFAULT '',
///     balance DOUBLE NOT NULL DEFAULT 0,
///     password VARCHAR(255) NOT NULL,
///     status INT NOT NULL DEFAULT 0,
///     created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tender_shared::models::user::{User, SignUp};
/// use tender_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::sign_up(&pool, SignUp {
///     name: "Азамат".to_string(),
///     last_name: "Осмонов".to_string(),
///     email: "azamat@example.com".to_string(),
///     phone: Some("+996555000111".to_string()),
///     inn: "12345678901234".to_string(),
///     password: "secret".to_string(),
/// }).await?;
///
/// let same = User::login(&pool, "azamat@example.com", "secret").await?;
/// assert_eq!(user.id, same.id);
/// # Ok(())
/// # }
/// ```

use crate::auth::password::{self, PasswordError};
use serde::{Deserialize, Serialize};
use sqlx::{MySql, MySqlPool, QueryBuilder};

/// Errors from account operations
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Another account already uses this email
    #[error("Пользователь с таким адресом электронной почты уже существует")]
    DuplicateEmail,

    /// Another account already uses this phone number
    #[error("Пользователь с таким номером телефона уже существует")]
    DuplicatePhone,

    /// No account matches the id, email or phone
    #[error("user not found")]
    NotFound,

    /// Password did not match the stored hash
    #[error("invalid password")]
    InvalidPassword,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// User account
///
/// The password hash is loaded for verification but never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub inn: String,
    pub balance: f64,

    /// Argon2id PHC hash
    #[serde(skip_serializing, default)]
    pub password: String,

    pub status: i32,
}

/// Registration input; `password` is plaintext and hashed before insert
#[derive(Debug, Clone, Deserialize)]
pub struct SignUp {
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub inn: String,
    pub password: String,
}

/// Profile update; only `Some` fields are written
///
/// An empty `password` is treated as "unchanged".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub inn: Option<String>,
    pub password: Option<String>,
}

impl UpdateUser {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.inn.is_none()
            && self.password.as_deref().map_or(true, str::is_empty)
    }
}

const USER_COLUMNS: &str = "id, name, last_name, email, phone, inn, balance, password, status";

/// Empty phone numbers are stored as NULL so the unique index ignores them.
fn normalize_phone(phone: Option<String>) -> Option<String> {
    phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
}

/// Maps a duplicate-key failure on `users` to the matching domain error.
fn map_unique_violation(err: sqlx::Error) -> UserError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            if db_err.message().contains("users_phone_unique") {
                return UserError::DuplicatePhone;
            }
            return UserError::DuplicateEmail;
        }
    }
    UserError::Database(err)
}

impl User {
    /// Registers a new account
    ///
    /// Email and phone uniqueness are checked up front so the caller gets a
    /// precise error; the unique indexes still catch concurrent sign-ups.
    ///
    /// # Errors
    ///
    /// - `UserError::DuplicateEmail` / `UserError::DuplicatePhone`
    /// - `UserError::Password` if hashing fails
    /// - `UserError::Database` for anything else
    pub async fn sign_up(pool: &MySqlPool, data: SignUp) -> Result<Self, UserError> {
        let phone = normalize_phone(data.phone);

        if !data.email.is_empty() {
            let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ?")
                .bind(&data.email)
                .fetch_one(pool)
                .await?;
            if count > 0 {
                return Err(UserError::DuplicateEmail);
            }
        }

        if let Some(phone) = &phone {
            let (count,): (i64,) =
                sqlx::query_as("SELECT COUNT(*) FROM users WHERE phone IS NOT NULL AND phone = ?")
                    .bind(phone)
                    .fetch_one(pool)
                    .await?;
            if count > 0 {
                return Err(UserError::DuplicatePhone);
            }
        }

        let password_hash = password::hash_password(&data.password)?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, last_name, email, phone, inn, password, balance)
            VALUES (?, ?, ?, ?, ?, ?, 0)
            "#,
        )
        .bind(data.name)
        .bind(data.last_name)
        .bind(data.email)
        .bind(phone)
        .bind(data.inn)
        .bind(password_hash)
        .execute(pool)
        .await
        .map_err(map_unique_violation)?;

        let id = result.last_insert_id() as i64;
        Self::find_by_id(pool, id).await?.ok_or(UserError::NotFound)
    }

    /// Authenticates by email, falling back to phone number
    ///
    /// # Errors
    ///
    /// `UserError::NotFound` when no account matches and
    /// `UserError::InvalidPassword` when the password is wrong. Both surface
    /// to clients as 401.
    pub async fn login(pool: &MySqlPool, login: &str, password: &str) -> Result<Self, UserError> {
        let user = match Self::find_by_email(pool, login).await? {
            Some(user) => user,
            None => Self::find_by_phone(pool, login)
                .await?
                .ok_or(UserError::NotFound)?,
        };

        if !password::verify_password(password, &user.password)? {
            return Err(UserError::InvalidPassword);
        }

        Ok(user)
    }

    /// Lists all users
    pub async fn list(pool: &MySqlPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
            .fetch_all(pool)
            .await
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &MySqlPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by email address
    pub async fn find_by_email(pool: &MySqlPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by phone number
    pub async fn find_by_phone(pool: &MySqlPool, phone: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE phone IS NOT NULL AND phone = ?"
        ))
        .bind(phone)
        .fetch_optional(pool)
        .await
    }

    /// Updates profile fields
    ///
    /// A non-empty `password` is re-hashed before it is stored.
    ///
    /// # Returns
    ///
    /// The updated user, or None if the user doesn't exist
    pub async fn update(
        pool: &MySqlPool,
        id: i64,
        data: UpdateUser,
    ) -> Result<Option<Self>, UserError> {
        if data.is_empty() {
            return Ok(Self::find_by_id(pool, id).await?);
        }

        let mut query = QueryBuilder::<MySql>::new("UPDATE users SET ");
        let mut set = query.separated(", ");

        if let Some(name) = data.name {
            set.push("name = ").push_bind_unseparated(name);
        }
        if let Some(last_name) = data.last_name {
            set.push("last_name = ").push_bind_unseparated(last_name);
        }
        if let Some(email) = data.email {
            set.push("email = ").push_bind_unseparated(email);
        }
        if data.phone.is_some() {
            set.push("phone = ").push_bind_unseparated(normalize_phone(data.phone));
        }
        if let Some(inn) = data.inn {
            set.push("inn = ").push_bind_unseparated(inn);
        }
        if let Some(plain) = data.password.filter(|p| !p.is_empty()) {
            let hash = password::hash_password(&plain)?;
            set.push("password = ").push_bind_unseparated(hash);
        }

        query.push(" WHERE id = ").push_bind(id);
        query
            .build()
            .execute(pool)
            .await
            .map_err(map_unique_violation)?;

        Ok(Self::find_by_id(pool, id).await?)
    }

    /// Replaces the password after checking the current one
    ///
    /// # Errors
    ///
    /// `UserError::NotFound` (404) or `UserError::InvalidPassword` (401)
    pub async fn change_password(
        pool: &MySqlPool,
        id: i64,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), UserError> {
        let user = Self::find_by_id(pool, id).await?.ok_or(UserError::NotFound)?;

        if !password::verify_password(old_password, &user.password)? {
            return Err(UserError::InvalidPassword);
        }

        let hash = password::hash_password(new_password)?;
        sqlx::query("UPDATE users SET password = ? WHERE id = ?")
            .bind(hash)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Deletes a user by ID
    ///
    /// # Returns
    ///
    /// True if a row was deleted
    pub async fn delete(pool: &MySqlPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Reads the current balance
    pub async fn balance(pool: &MySqlPool, id: i64) -> Result<Option<f64>, sqlx::Error> {
        let row: Option<(f64,)> = sqlx::query_as("SELECT balance FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(|(balance,)| balance))
    }

    /// Overwrites the balance and returns the stored value
    ///
    /// # Returns
    ///
    /// None if the user doesn't exist
    pub async fn set_balance(
        pool: &MySqlPool,
        id: i64,
        balance: f64,
    ) -> Result<Option<f64>, sqlx::Error> {
        sqlx::query("UPDATE users SET balance = ? WHERE id = ?")
            .bind(balance)
            .bind(id)
            .execute(pool)
            .await?;

        Self::balance(pool, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 7,
            name: "Азамат".to_string(),
            last_name: "Осмонов".to_string(),
            email: "azamat@example.com".to_string(),
            phone: None,
            inn: "123".to_string(),
            balance: 10.5,
            password: "$argon2id$v=19$m=65536,t=3,p=4$c2FsdA$aGFzaA".to_string(),
            status: 0,
        }
    }

    #[test]
    fn test_password_is_never_serialized() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "azamat@example.com");
        assert_eq!(json["balance"], 10.5);
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone(None), None);
        assert_eq!(normalize_phone(Some("".to_string())), None);
        assert_eq!(normalize_phone(Some("  ".to_string())), None);
        assert_eq!(
            normalize_phone(Some(" +996555 ".to_string())),
            Some("+996555".to_string())
        );
    }

    #[test]
    fn test_update_user_empty_password_is_no_change() {
        let update = UpdateUser {
            password: Some(String::new()),
            ..Default::default()
        };
        assert!(update.is_empty());

        let update = UpdateUser {
            inn: Some("1".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_duplicate_messages() {
        assert!(UserError::DuplicateEmail.to_string().contains("почты"));
        assert!(UserError::DuplicatePhone.to_string().contains("телефона"));
    }
}
