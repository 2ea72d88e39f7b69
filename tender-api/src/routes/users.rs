/// User account endpoints
///
/// # Endpoints
///
/// - `POST /users/signup` - Register a user
/// - `POST /users/login` - Check credentials (email or phone)
/// - `GET /users` - List users
/// - `GET /users/details/:id` - One user
/// - `PUT /users/:id` - Update profile fields
/// - `DELETE /users/:id` - Delete a user
/// - `GET /users/balance/:id` - Read balance
/// - `PUT /users/balance/update/:id` - Overwrite balance
/// - `PUT /users/password/:id` - Change password

use super::{created, deleted, Created, MessageResponse};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
};
use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tender_shared::models::user::{SignUp, UpdateUser, User, UserError};
use validator::Validate;

/// Sign-up request
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub inn: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl From<SignUpRequest> for SignUp {
    fn from(req: SignUpRequest) -> Self {
        SignUp {
            name: req.name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            inn: req.inn,
            password: req.password,
        }
    }
}

/// Login request; either `email` or `phone` identifies the account
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    pub password: String,
}

impl LoginRequest {
    fn login(&self) -> Option<&str> {
        [self.email.as_deref(), self.phone.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty())
    }
}

/// Profile update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must not be empty"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Last name must not be empty"))]
    pub last_name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    pub phone: Option<String>,
    pub inn: Option<String>,

    /// Re-hashed when non-empty
    pub password: Option<String>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        UpdateUser {
            name: req.name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            inn: req.inn,
            password: req.password,
        }
    }
}

/// `{"balance": x}` in both directions
#[derive(Debug, Serialize, Deserialize)]
pub struct Balance {
    pub balance: f64,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Register a new user
///
/// # Errors
///
/// - `409 Conflict`: Email or phone already registered
/// - `422 Unprocessable Entity`: Validation failed
pub async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> ApiResult<Created<User>> {
    req.validate()?;

    let user = User::sign_up(&state.db, req.into()).await?;
    tracing::info!(user_id = user.id, "User registered");

    Ok(created(user))
}

/// Check credentials and return the account
///
/// # Errors
///
/// - `400 Bad Request`: Neither email nor phone given
/// - `401 Unauthorized`: Unknown account or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<User>> {
    let login = req
        .login()
        .ok_or_else(|| ApiError::BadRequest("Email or phone is required".to_string()))?;

    let user = User::login(&state.db, login, &req.password)
        .await
        .map_err(|e| match e {
            UserError::NotFound | UserError::InvalidPassword => {
                ApiError::Unauthorized("Invalid login or password".to_string())
            }
            other => other.into(),
        })?;

    Ok(Json(user))
}

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(User::list(&state.db).await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    User::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User"))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;

    User::update(&state.db, id, req.into())
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User"))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    deleted(User::delete(&state.db, id).await?, "User")
}

pub async fn get_balance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Balance>> {
    User::balance(&state.db, id)
        .await?
        .map(|balance| Json(Balance { balance }))
        .ok_or_else(|| ApiError::not_found("User"))
}

pub async fn update_balance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<Balance>,
) -> ApiResult<Json<Balance>> {
    let balance = User::set_balance(&state.db, id, req.balance)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    tracing::info!(user_id = id, balance, "Balance updated");
    Ok(Json(Balance { balance }))
}

/// Change password after checking the current one
///
/// # Errors
///
/// - `401 Unauthorized`: Old password does not match
/// - `404 Not Found`: Unknown user
pub async fn change_password(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    if req.new_password.is_empty() {
        return Err(ApiError::BadRequest("New password must not be empty".to_string()));
    }

    User::change_password(&state.db, id, &req.old_password, &req.new_password).await?;
    Ok(MessageResponse::new("Пароль успешно изменён"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_request(email: Option<&str>, phone: Option<&str>) -> LoginRequest {
        LoginRequest {
            email: email.map(str::to_string),
            phone: phone.map(str::to_string),
            password: "pw".to_string(),
        }
    }

    #[test]
    fn test_login_prefers_email() {
        let req = login_request(Some("a@b.kg"), Some("+996555"));
        assert_eq!(req.login(), Some("a@b.kg"));
    }

    #[test]
    fn test_login_falls_back_to_phone() {
        assert_eq!(login_request(Some("  "), Some("+996555")).login(), Some("+996555"));
        assert_eq!(login_request(None, None).login(), None);
    }

    #[test]
    fn test_sign_up_validation() {
        let req: SignUpRequest = serde_json::from_value(serde_json::json!({
            "name": "",
            "last_name": "Садыков",
            "email": "not-an-email",
            "password": "secret"
        }))
        .unwrap();

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(!fields.contains_key("last_name"));
    }

    #[test]
    fn test_update_validation_allows_absent_fields() {
        let req: UpdateUserRequest =
            serde_json::from_value(serde_json::json!({ "inn": "123" })).unwrap();
        assert!(req.validate().is_ok());
    }
}
