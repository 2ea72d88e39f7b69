/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tender_api::{app::AppState, config::Config};
/// use tender_shared::{db::pool::create_pool, mail::LogMailer, push::LogPushSender};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.pool_config()).await?;
/// let state = AppState::new(pool, config, Arc::new(LogPushSender), Arc::new(LogMailer));
/// let app = tender_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    error::ApiError,
    middleware::{json::json_content_type, security::SecurityHeadersLayer},
    routes,
};
use axum::{
    http::{header, HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Extension, Router,
};
use sqlx::MySqlPool;
use std::{any::Any, sync::Arc};
use tender_shared::{mail::Mailer, models::payment::PaymentTable, push::PushSender};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: MySqlPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Push notification delivery
    pub push: Arc<dyn PushSender>,

    /// Outgoing email
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(
        db: MySqlPool,
        config: Config,
        push: Arc<dyn PushSender>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            db,
            config: Arc::new(config),
            push,
            mailer,
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Middleware Stack
///
/// Applied in order (innermost first):
/// 1. JSON content type for bodies that carry none
/// 2. Panic recovery (500 JSON error)
/// 3. Response compression
/// 4. Logging (tower-http TraceLayer)
/// 5. CORS
/// 6. Security headers
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let user_routes = Router::new()
        .route("/users", get(routes::users::list_users))
        .route("/users/signup", post(routes::users::sign_up))
        .route("/users/login", post(routes::users::login))
        .route("/users/details/:id", get(routes::users::get_user))
        .route(
            "/users/:id",
            put(routes::users::update_user).delete(routes::users::delete_user),
        )
        .route("/users/balance/:id", get(routes::users::get_balance))
        .route("/users/balance/update/:id", put(routes::users::update_balance))
        .route("/users/password/:id", put(routes::users::change_password))
        .route("/password/recovery", post(routes::password::request_recovery))
        .route(
            "/password/recovery/mail",
            get(routes::password::recovery_redirect),
        );

    let company_routes = Router::new()
        .route("/permissions", post(routes::permissions::create_permission))
        .route(
            "/permissions/user/:user_id",
            get(routes::permissions::list_user_permissions),
        )
        .route(
            "/permissions/:id",
            put(routes::permissions::update_permission)
                .delete(routes::permissions::delete_permission),
        )
        .route(
            "/companies",
            post(routes::companies::create_company).get(routes::companies::list_companies),
        )
        .route(
            "/companies/:id",
            get(routes::companies::get_company)
                .put(routes::companies::update_company)
                .delete(routes::companies::delete_company),
        );

    let transaction_routes = Router::new()
        .route(
            "/transactions",
            post(routes::transactions::create_transaction).get(routes::transactions::list_all),
        )
        .route(
            "/transactions/:id",
            get(routes::transactions::get_transaction)
                .put(routes::transactions::update_transaction)
                .delete(routes::transactions::delete_transaction),
        )
        .route("/transactions/user/:id", get(routes::transactions::list_by_user))
        .route(
            "/transactions/company/:id",
            get(routes::transactions::list_by_company),
        )
        .route(
            "/transactions/user/:id/company/:company_id",
            get(routes::transactions::list_by_user_and_company),
        )
        .route(
            "/transactions/user/zakup/:id",
            get(routes::transactions::zakup_total),
        )
        .route(
            "/transactions/user/debt/:id",
            get(routes::transactions::zakup_debt),
        )
        .route(
            "/transactions/realization/sum",
            get(routes::transactions::realization_sum),
        )
        .route(
            "/transactions/realization/count/:id",
            get(routes::transactions::realization_count),
        )
        .route(
            "/transactions/tranches/debt",
            get(routes::transactions::tranche_debts),
        )
        .route(
            "/transactions/tranches/company/debt",
            get(routes::transactions::company_debts),
        )
        .route(
            "/transactions/tranches/id/debt/:id",
            get(routes::transactions::debt_of),
        )
        .route(
            "/extra_transactions",
            post(routes::extra_transactions::create_extra_transaction)
                .get(routes::extra_transactions::list_extra_transactions),
        )
        .route(
            "/extra_transactions/:id",
            get(routes::extra_transactions::get_extra_transaction)
                .put(routes::extra_transactions::update_extra_transaction)
                .delete(routes::extra_transactions::delete_extra_transaction),
        )
        .route(
            "/extra_transactions/user/:id",
            get(routes::extra_transactions::list_by_user),
        )
        .route(
            "/extra_transactions/realization/:id",
            get(routes::extra_transactions::realization_count),
        )
        .merge(payment_routes("/tranches", PaymentTable::Tranches))
        .merge(payment_routes("/changes", PaymentTable::Changes));

    let tender_routes = Router::new()
        .route(
            "/tenders",
            post(routes::tenders::create_tender).get(routes::tenders::list_tenders),
        )
        .route(
            "/tenders/:id",
            get(routes::tenders::get_tender)
                .put(routes::tenders::update_tender)
                .delete(routes::tenders::delete_tender),
        )
        .route("/tenders/user/:id", get(routes::tenders::list_by_user))
        .route("/tenders/company/:id", get(routes::tenders::list_by_company))
        .route("/tenders/debt/company", get(routes::tenders::company_totals))
        .route(
            "/tenders/realization/sum",
            get(routes::tenders::realization_sum),
        )
        .route(
            "/tenders/realization/count/:id",
            get(routes::tenders::realization_count),
        );

    let report_routes = Router::new()
        .route(
            "/reports/company/month/global",
            get(routes::reports::month_global),
        )
        .route(
            "/reports/users/month/global",
            get(routes::reports::month_global),
        )
        .route("/reports/users/month/user", get(routes::reports::month_user))
        .route("/reports/company/month/year", get(routes::reports::month_year))
        .route(
            "/reports/company/month/company",
            get(routes::reports::month_company),
        )
        .route(
            "/reports/company/month/year/company",
            get(routes::reports::month_year_company),
        )
        .route(
            "/reports/users/month/user/year",
            get(routes::reports::month_user_year),
        )
        .route(
            "/reports/users/month/user/year/company",
            get(routes::reports::month_user_year_company),
        )
        .route(
            "/reports/companies/company/global",
            get(routes::reports::company_global),
        )
        .route(
            "/reports/companies/company/year",
            get(routes::reports::company_year),
        )
        .route(
            "/reports/companies/company/month",
            get(routes::reports::company_month),
        )
        .route(
            "/reports/companies/company/year/month",
            get(routes::reports::company_year_month),
        )
        .route(
            "/reports/users/company/global",
            get(routes::reports::company_global),
        )
        .route(
            "/reports/users/company/user",
            get(routes::reports::company_user),
        )
        .route(
            "/reports/users/company/user/month",
            get(routes::reports::company_user_month),
        )
        .route(
            "/reports/users/company/user/year",
            get(routes::reports::company_user_year),
        )
        .route(
            "/reports/users/company/user/year/month",
            get(routes::reports::company_user_year_month),
        );

    let data_routes = Router::new()
        .route(
            "/data/user/:user_id/status/:status",
            post(routes::data::by_user_and_status),
        )
        .route(
            "/data/transactions/date",
            post(routes::data::transactions_by_date),
        )
        .route(
            "/data/transactions/date/company",
            post(routes::data::transactions_by_date_and_company),
        )
        .route("/data/tenders/date", post(routes::data::tenders_by_date))
        .route(
            "/data/tenders/date/company",
            post(routes::data::tenders_by_date_and_company),
        )
        .route("/data/extra/date", post(routes::data::extras_by_date))
        .route("/data/extra/date/company", post(routes::data::extras_by_date))
        .route("/sums/all/:id", get(routes::sums::user_sums))
        .route("/sums/:id", get(routes::sums::client_data))
        .route("/debts", get(routes::sums::account_debts))
        .route("/history", post(routes::history::history));

    let personal_routes = Router::new()
        .route(
            "/expenses",
            post(routes::expenses::create_expense).get(routes::expenses::list_expenses),
        )
        .route(
            "/expenses/:id",
            get(routes::expenses::get_expense)
                .put(routes::expenses::update_expense)
                .delete(routes::expenses::delete_expense),
        )
        .route(
            "/expenses/category/:id",
            get(routes::expenses::list_by_category),
        )
        .route("/expenses/summary", get(routes::expenses::summary))
        .route(
            "/expenses/summary/category/:id",
            get(routes::expenses::category_summary),
        )
        .route(
            "/expenses/summary/subcategory/:id",
            get(routes::expenses::subcategory_summary),
        )
        .route(
            "/categories",
            post(routes::categories::create_category).get(routes::categories::list_categories),
        )
        .route(
            "/categories/parent/:id",
            get(routes::categories::list_children),
        )
        .route(
            "/categories/:id",
            get(routes::categories::get_category)
                .put(routes::categories::update_category)
                .delete(routes::categories::delete_category),
        )
        .route(
            "/personal_debts",
            post(routes::personal_debts::create_debt)
                .get(routes::personal_debts::list_debts)
                .put(routes::personal_debts::update_debt),
        )
        .route(
            "/personal_debts/:id",
            get(routes::personal_debts::get_debt).delete(routes::personal_debts::delete_debt),
        )
        .route(
            "/personal_debts/status/:status",
            get(routes::personal_debts::list_by_status),
        )
        .route(
            "/debt_tranches",
            post(routes::debt_tranches::create_debt_tranche)
                .put(routes::debt_tranches::update_debt_tranche),
        )
        .route(
            "/debt_tranches/:id",
            get(routes::debt_tranches::get_debt_tranche)
                .delete(routes::debt_tranches::delete_debt_tranche),
        )
        .route(
            "/debt_tranches/debt/:debt_id",
            get(routes::debt_tranches::list_by_debt),
        );

    let balance_routes = Router::new()
        .route(
            "/balance_categories",
            post(routes::balance::create_category)
                .get(routes::balance::list_categories)
                .put(routes::balance::update_category),
        )
        .route(
            "/balance_categories/:id",
            get(routes::balance::get_category).delete(routes::balance::delete_category),
        )
        .route("/balance-history", post(routes::balance::create_history))
        .route(
            "/balance-history/:id",
            get(routes::balance::list_user_history)
                .put(routes::balance::update_history)
                .delete(routes::balance::delete_history),
        )
        .route(
            "/balance-history/category/:id",
            get(routes::balance::list_category_history),
        );

    let notify_routes = Router::new()
        .route("/notify", post(routes::notify::send_notification))
        .route("/notify/token/create", post(routes::notify::register_token))
        .route("/notify/token/:id", axum::routing::delete(routes::notify::delete_token))
        .route("/notify/history", post(routes::notify::list_history))
        .route(
            "/notify/history/:id",
            axum::routing::delete(routes::notify::delete_history),
        );

    Router::new()
        .merge(health_routes)
        .merge(user_routes)
        .merge(company_routes)
        .merge(transaction_routes)
        .merge(tender_routes)
        .merge(report_routes)
        .merge(data_routes)
        .merge(personal_routes)
        .merge(balance_routes)
        .merge(notify_routes)
        .layer(axum::middleware::from_fn(json_content_type))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config.api.cors_origins))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Tranches and changes share handlers; the table travels as an extension
fn payment_routes(prefix: &str, table: PaymentTable) -> Router<AppState> {
    Router::new()
        .route(
            prefix,
            post(routes::payments::create_payment).put(routes::payments::update_payment),
        )
        .route(
            &format!("{}/:id", prefix),
            get(routes::payments::get_payment).delete(routes::payments::delete_payment),
        )
        .route(
            &format!("{}/transaction/:transaction_id", prefix),
            get(routes::payments::list_by_transaction),
        )
        .layer(Extension(table))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::InternalError(format!("Handler panicked: {}", detail)).into_response()
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, DatabaseConfig};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use sqlx::mysql::MySqlPoolOptions;
    use tender_shared::{mail::LogMailer, push::LogPushSender};
    use tower::Service as _;

    // The pool never connects; these requests are answered before any query.
    fn test_router() -> Router {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 4000,
                cors_origins: vec!["*".to_string()],
                production: false,
                public_base_url: "http://localhost:4000".to_string(),
            },
            database: DatabaseConfig {
                url: "mysql://root@localhost:3306/tender_test".to_string(),
                max_connections: 1,
                min_connections: 0,
                connect_timeout_seconds: 1,
            },
            smtp: None,
            push: None,
        };
        let pool = MySqlPoolOptions::new()
            .connect_lazy(&config.database.url)
            .unwrap();

        build_router(AppState::new(
            pool,
            config,
            Arc::new(LogPushSender),
            Arc::new(LogMailer),
        ))
    }

    async fn get(uri: &str) -> axum::response::Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        test_router().call(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_recovery_link_redirects_to_app() {
        let response = get("/password/recovery/mail?user_id=7").await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "tendercommunity://reset_password?hash=7"
        );
    }

    #[tokio::test]
    async fn test_recovery_link_requires_user_id() {
        let response = get("/password/recovery/mail").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    async fn post(uri: &str, content_type: Option<&str>, body: &str) -> axum::response::Response {
        let mut request = Request::builder().method("POST").uri(uri);
        if let Some(content_type) = content_type {
            request = request.header(header::CONTENT_TYPE, content_type);
        }
        let request = request.body(Body::from(body.to_string())).unwrap();
        test_router().call(request).await.unwrap()
    }

    async fn error_body(response: axum::response::Response) -> serde_json::Value {
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_bad_request() {
        let response = get("/users/details/abc").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = error_body(response).await;
        assert_eq!(json["error"], "bad_request");
        assert!(json["message"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let response = post("/companies", Some("application/json"), "{\"name\":").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_body(response).await["error"], "bad_request");

        let response = post("/companies", Some("application/json"), "{\"name\": 5}").await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = error_body(response).await;
        assert_eq!(json["error"], "validation_error");
        assert_eq!(json["details"][0]["field"], "body");

        let response = post("/companies", None, "{}").await;
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(error_body(response).await["error"], "unsupported_media_type");
    }

    #[tokio::test]
    async fn test_malformed_query_is_json_error() {
        let response = get("/password/recovery/mail?user_id=abc").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_body(response).await["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_report_without_required_param() {
        let response = get("/reports/users/month/user").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "bad_request");
    }

    #[test]
    fn test_panic_becomes_json_500() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }

    #[tokio::test]
    async fn test_unknown_route_has_security_headers() {
        let response = get("/nope").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
        assert!(response.headers().get("strict-transport-security").is_none());
    }
}
