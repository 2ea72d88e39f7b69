/// Integration tests for the Tender API
///
/// These tests drive the full router against a real MySQL database:
/// - User signup, login and password change
/// - Transaction lifecycle with expenses and tranches
/// - Date-range exports and their visibility rules
/// - Notification tokens and history
///
/// Run with: cargo test -p tender-api --test integration_test -- --ignored --test-threads=1

mod common;

use axum::http::StatusCode;
use common::{unique, TestContext};
use serde_json::json;

#[tokio::test]
#[ignore = "requires MySQL (DATABASE_URL)"]
async fn test_signup_login_and_duplicates() {
    let ctx = TestContext::new().await.unwrap();
    let email = format!("login-{}@example.com", unique());

    let signup = json!({
        "name": "Нурлан",
        "last_name": "Асанов",
        "email": email,
        "phone": null,
        "inn": format!("inn-{}", unique()),
        "password": "correct horse",
    });
    let (status, user) = ctx.post("/users/signup", signup.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(user.get("password").is_none());

    let (status, body) = ctx.post("/users/signup", signup).await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);

    let (status, _) = ctx
        .post("/users/login", json!({"email": email, "password": "wrong"}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = ctx
        .post("/users/login", json!({"email": email, "password": "correct horse"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user["id"]);

    let id = user["id"].as_i64().unwrap();
    let (status, _) = ctx
        .put(
            &format!("/users/password/{}", id),
            json!({"old_password": "wrong", "new_password": "new"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx
        .put(
            &format!("/users/password/{}", id),
            json!({"old_password": "correct horse", "new_password": "new"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .post("/users/login", json!({"email": email, "password": "new"}))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires MySQL (DATABASE_URL)"]
async fn test_balance_roundtrip() {
    let ctx = TestContext::new().await.unwrap();
    let user_id = ctx.create_user().await;

    let (status, body) = ctx
        .put(
            &format!("/users/balance/update/{}", user_id),
            json!({"balance": 1250.5}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], 1250.5);

    let (_, body) = ctx.get(&format!("/users/balance/{}", user_id)).await;
    assert_eq!(body["balance"], 1250.5);

    let (status, _) = ctx.get("/users/balance/0").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires MySQL (DATABASE_URL)"]
async fn test_transaction_lifecycle() {
    let ctx = TestContext::new().await.unwrap();
    let user_id = ctx.create_user().await;
    let company_id = ctx.create_company().await;

    let (status, created) = ctx
        .post(
            "/transactions",
            json!({
                "transaction_number": "T-1",
                "type": "Закуп",
                "user_id": user_id,
                "company_id": company_id,
                "total": 900.0,
                "sell": 1000.0,
                "status": 2,
                "expenses": [
                    {"name": "Доставка", "amount": 50.0},
                    {"name": "Упаковка", "amount": 25.0}
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["expenses"].as_array().unwrap().len(), 2);
    assert!(created["company_name"].is_string());
    let id = created["id"].as_i64().unwrap();

    let (status, _) = ctx
        .post(
            "/tranches",
            json!({"transaction_id": id, "amount": 300.0, "description": null}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, debts) = ctx.get(&format!("/transactions/tranches/id/debt/{}", id)).await;
    assert_eq!(debts[0]["debt"], 700.0);

    let (_, zakup) = ctx.get(&format!("/transactions/user/zakup/{}", user_id)).await;
    assert_eq!(zakup["zakup"], 900.0);

    let (status, updated) = ctx
        .put(&format!("/transactions/{}", id), json!({"status": 3}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], 3);
    assert_eq!(updated["transaction_number"], "T-1");
    assert_eq!(updated["expenses"].as_array().unwrap().len(), 2);

    let (_, counts) = ctx
        .get(&format!("/transactions/realization/count/{}", user_id))
        .await;
    assert_eq!(counts["total"], 1);
    assert_eq!(counts["status3"], 1);

    let (status, _) = ctx.delete(&format!("/transactions/{}", id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = ctx.get(&format!("/transactions/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx.delete(&format!("/transactions/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires MySQL (DATABASE_URL)"]
async fn test_tender_type_is_checked() {
    let ctx = TestContext::new().await.unwrap();
    let user_id = ctx.create_user().await;
    let company_id = ctx.create_company().await;

    let (status, _) = ctx
        .post(
            "/tenders",
            json!({"type": "Другое", "user_id": user_id, "company_id": company_id}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, tender) = ctx
        .post(
            "/tenders",
            json!({
                "type": "ГОИК",
                "user_id": user_id,
                "company_id": company_id,
                "total": 500.0,
                "commission": 20.0
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(tender["date"].is_string());
}

#[tokio::test]
#[ignore = "requires MySQL (DATABASE_URL)"]
async fn test_date_range_visibility() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .post(
            "/data/transactions/date",
            json!({"start_date": "2024-01-01", "end_date": "2024-12-31", "user_id": 0}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = ctx
        .post(
            "/data/tenders/date",
            json!({"start_date": "2024-12-31", "end_date": "2024-01-01", "user_id": 1}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires MySQL (DATABASE_URL)"]
async fn test_notification_flow() {
    let ctx = TestContext::new().await.unwrap();
    let user_id = ctx.create_user().await;
    let token = format!("device-{}", unique());

    let (status, _) = ctx
        .post(
            "/notify/token/create",
            json!({"user_id": user_id, "token": token}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = ctx
        .post(
            "/notify",
            json!({"user_id": user_id, "title": "Новая сделка", "body": "Сделка подтверждена"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sent"], 1);

    let (_, history) = ctx
        .post("/notify/history", json!({"user_id": user_id}))
        .await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["title"], "Новая сделка");

    let (status, _) = ctx.delete(&format!("/notify/token/{}", token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = ctx.delete(&format!("/notify/token/{}", token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires MySQL (DATABASE_URL)"]
async fn test_health_reports_database() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "connected");
    assert!(ctx.db.size() >= 1);
}
