/// Request extractors that reject with [`ApiError`]
///
/// Drop-in replacements for axum's `Path`, `Query` and `Json`. A malformed
/// id, a missing query parameter or an unparseable body answers with the
/// same `{error, message}` JSON as every other failure instead of axum's
/// plain-text rejection.
///
/// [`Json`] doubles as the response wrapper, so handlers use one type for
/// both directions.

use crate::error::ApiError;
use axum::{
    extract::{FromRequest, FromRequestParts},
    response::{IntoResponse, Response},
};

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T> IntoResponse for Json<T>
where
    axum::Json<T>: IntoResponse,
{
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}
