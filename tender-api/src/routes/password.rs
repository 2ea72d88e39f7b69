/// Password recovery endpoints
///
/// - `POST /password/recovery` - Email a recovery link
/// - `GET /password/recovery/mail?user_id=N` - Link target; redirects into the mobile app

use super::MessageResponse;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Query},
};
use axum::{extract::State, response::Redirect};
use serde::Deserialize;
use tender_shared::{mail::recovery_email, models::user::User};
use validator::Validate;

/// Deep link the recovery page opens in the app
pub const APP_RESET_URL: &str = "tendercommunity://reset_password";

#[derive(Debug, Deserialize, Validate)]
pub struct RecoveryRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct RecoveryLinkQuery {
    pub user_id: Option<i64>,
}

pub fn app_reset_link(user_id: i64) -> String {
    format!("{}?hash={}", APP_RESET_URL, user_id)
}

/// Sends the recovery email
///
/// # Errors
///
/// - `404 Not Found`: No account with this email
/// - `422 Unprocessable Entity`: Malformed email
/// - `503 Service Unavailable`: SMTP delivery failed
pub async fn request_recovery(
    State(state): State<AppState>,
    Json(req): Json<RecoveryRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    let email = recovery_email(&state.config.api.public_base_url, &user.email, user.id);
    state.mailer.send(&email).await?;

    tracing::info!(user_id = user.id, "Password recovery email sent");
    Ok(MessageResponse::new(
        "Письмо для восстановления пароля отправлено",
    ))
}

/// Redirects the emailed link to the app's reset screen with `303 See Other`
pub async fn recovery_redirect(Query(query): Query<RecoveryLinkQuery>) -> ApiResult<Redirect> {
    let user_id = query
        .user_id
        .ok_or_else(|| ApiError::BadRequest("user_id is required".to_string()))?;

    Ok(Redirect::to(&app_reset_link(user_id)))
}
