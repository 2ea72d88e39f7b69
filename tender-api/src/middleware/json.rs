/// JSON content type middleware
///
/// Responses that carry no `Content-Type` get `application/json`. Handlers
/// returning `Json` already set it, and an explicit type is never
/// overwritten. Empty `204 No Content` and redirect responses are left
/// untouched.

use axum::{
    extract::Request,
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};

pub async fn json_content_type(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let status = response.status();
    if status == StatusCode::NO_CONTENT || status.is_redirection() {
        return response;
    }

    response
        .headers_mut()
        .entry(header::CONTENT_TYPE)
        .or_insert(HeaderValue::from_static("application/json"));

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::get, Json, Router};
    use tower::Service as _;

    fn app() -> Router {
        Router::new()
            .route("/bare", get(|| async { "{}" }))
            .route("/json", get(|| async { Json(serde_json::json!({"ok": true})) }))
            .route("/empty", get(|| async { StatusCode::NO_CONTENT }))
            .layer(axum::middleware::from_fn(json_content_type))
    }

    async fn content_type(uri: &str) -> Option<String> {
        let response = app()
            .call(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_json_kept() {
        assert_eq!(content_type("/json").await.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn test_no_content_untouched() {
        assert_eq!(content_type("/empty").await, None);
    }

    #[tokio::test]
    async fn test_existing_type_not_overwritten() {
        // String bodies carry text/plain from axum
        assert_eq!(
            content_type("/bare").await.as_deref(),
            Some("text/plain; charset=utf-8")
        );
    }
}
