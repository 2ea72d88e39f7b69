/// Transaction amount reports
///
/// Every report sums `transactions.amount`. Routes differ only in which
/// query parameters (`user_id`, `company_id`, `year`, `month`) they filter
/// by; each route requires exactly the parameters its path names and
/// ignores the rest.
///
/// | Shape | Routes |
/// |---|---|
/// | `[{year, months: [{name, amount}]}]` | `/reports/{company,users}/month/global`, `/reports/users/month/user` |
/// | `[{name, amount}]` | `/reports/company/month/{year,company,year/company}`, `/reports/users/month/user/{year,year/company}` |
/// | `[{name, total_amount}]` | `/reports/companies/company/*`, `/reports/users/company/*` |

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Query},
};
use axum::extract::State;
use tender_shared::models::report::{
    self, CompanyTotalAmount, MonthlyAmount, ReportFilter, YearlyAmounts,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Param {
    User,
    Company,
    Year,
    Month,
}

/// Keeps only the required parameters, rejecting the request if one is missing
fn require(query: ReportFilter, params: &[Param]) -> ApiResult<ReportFilter> {
    let mut filter = ReportFilter::default();

    for param in params {
        match param {
            Param::User => {
                filter.user_id = Some(query.user_id.ok_or_else(|| missing("user_id"))?);
            }
            Param::Company => {
                filter.company_id = Some(query.company_id.ok_or_else(|| missing("company_id"))?);
            }
            Param::Year => {
                filter.year = Some(query.year.ok_or_else(|| missing("year"))?);
            }
            Param::Month => {
                let month = query.month.ok_or_else(|| missing("month"))?;
                if !(1..=12).contains(&month) {
                    return Err(ApiError::BadRequest(format!("Invalid month: {}", month)));
                }
                filter.month = Some(month);
            }
        }
    }

    Ok(filter)
}

fn missing(name: &str) -> ApiError {
    ApiError::BadRequest(format!("Query parameter '{}' is required", name))
}

async fn yearly(
    state: &AppState,
    query: ReportFilter,
    params: &[Param],
) -> ApiResult<Json<Vec<YearlyAmounts>>> {
    let filter = require(query, params)?;
    Ok(Json(report::yearly(&state.db, &filter).await?))
}

async fn monthly(
    state: &AppState,
    query: ReportFilter,
    params: &[Param],
) -> ApiResult<Json<Vec<MonthlyAmount>>> {
    let filter = require(query, params)?;
    Ok(Json(report::monthly(&state.db, &filter).await?))
}

async fn by_company(
    state: &AppState,
    query: ReportFilter,
    params: &[Param],
) -> ApiResult<Json<Vec<CompanyTotalAmount>>> {
    let filter = require(query, params)?;
    Ok(Json(report::by_company(&state.db, &filter).await?))
}

type Yearly = ApiResult<Json<Vec<YearlyAmounts>>>;
type Monthly = ApiResult<Json<Vec<MonthlyAmount>>>;
type ByCompany = ApiResult<Json<Vec<CompanyTotalAmount>>>;

// Year/month groups

/// `GET /reports/company/month/global` and `GET /reports/users/month/global`
pub async fn month_global(State(state): State<AppState>, Query(q): Query<ReportFilter>) -> Yearly {
    yearly(&state, q, &[]).await
}

pub async fn month_user(State(state): State<AppState>, Query(q): Query<ReportFilter>) -> Yearly {
    yearly(&state, q, &[Param::User]).await
}

// Months

pub async fn month_year(State(state): State<AppState>, Query(q): Query<ReportFilter>) -> Monthly {
    monthly(&state, q, &[Param::Year]).await
}

pub async fn month_company(
    State(state): State<AppState>,
    Query(q): Query<ReportFilter>,
) -> Monthly {
    monthly(&state, q, &[Param::Company]).await
}

pub async fn month_year_company(
    State(state): State<AppState>,
    Query(q): Query<ReportFilter>,
) -> Monthly {
    monthly(&state, q, &[Param::Year, Param::Company]).await
}

pub async fn month_user_year(
    State(state): State<AppState>,
    Query(q): Query<ReportFilter>,
) -> Monthly {
    monthly(&state, q, &[Param::User, Param::Year]).await
}

pub async fn month_user_year_company(
    State(state): State<AppState>,
    Query(q): Query<ReportFilter>,
) -> Monthly {
    monthly(&state, q, &[Param::User, Param::Year, Param::Company]).await
}

// Company totals

/// `GET /reports/companies/company/global` and `GET /reports/users/company/global`
pub async fn company_global(
    State(state): State<AppState>,
    Query(q): Query<ReportFilter>,
) -> ByCompany {
    by_company(&state, q, &[]).await
}

pub async fn company_year(
    State(state): State<AppState>,
    Query(q): Query<ReportFilter>,
) -> ByCompany {
    by_company(&state, q, &[Param::Year]).await
}

pub async fn company_month(
    State(state): State<AppState>,
    Query(q): Query<ReportFilter>,
) -> ByCompany {
    by_company(&state, q, &[Param::Month]).await
}

pub async fn company_year_month(
    State(state): State<AppState>,
    Query(q): Query<ReportFilter>,
) -> ByCompany {
    by_company(&state, q, &[Param::Year, Param::Month]).await
}

pub async fn company_user(
    State(state): State<AppState>,
    Query(q): Query<ReportFilter>,
) -> ByCompany {
    by_company(&state, q, &[Param::User]).await
}

pub async fn company_user_month(
    State(state): State<AppState>,
    Query(q): Query<ReportFilter>,
) -> ByCompany {
    by_company(&state, q, &[Param::User, Param::Month]).await
}

pub async fn company_user_year(
    State(state): State<AppState>,
    Query(q): Query<ReportFilter>,
) -> ByCompany {
    by_company(&state, q, &[Param::User, Param::Year]).await
}

pub async fn company_user_year_month(
    State(state): State<AppState>,
    Query(q): Query<ReportFilter>,
) -> ByCompany {
    by_company(&state, q, &[Param::User, Param::Year, Param::Month]).await
}
