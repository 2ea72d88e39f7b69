/// API route handlers
///
/// One module per resource. Handlers decode the request, call the model
/// layer in `tender_shared::models` and encode the result as JSON.

pub mod balance;
pub mod categories;
pub mod companies;
pub mod data;
pub mod debt_tranches;
pub mod expenses;
pub mod extra_transactions;
pub mod health;
pub mod history;
pub mod notify;
pub mod password;
pub mod payments;
pub mod permissions;
pub mod personal_debts;
pub mod reports;
pub mod sums;
pub mod tenders;
pub mod transactions;
pub mod users;

use crate::error::{ApiError, ApiResult};
use crate::extract::Json;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// `{"message": "..."}` body for operations without an entity to return
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// 201 with the created entity
pub type Created<T> = (StatusCode, Json<T>);

pub fn created<T>(entity: T) -> Created<T> {
    (StatusCode::CREATED, Json(entity))
}

/// Maps a delete outcome to 204, or 404 when nothing was removed
pub fn deleted(removed: bool, what: &str) -> ApiResult<StatusCode> {
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(what))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deleted() {
        assert_eq!(deleted(true, "Company").unwrap(), StatusCode::NO_CONTENT);
        assert!(matches!(deleted(false, "Company"), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_created_status() {
        let (status, Json(body)) = created(5);
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, 5);
    }
}
