/// Date-range export requests
///
/// The `/data/*/date` endpoints take the caller's user id in the body and
/// decide visibility from it: the administrator sees every row, any other
/// positive id sees only its own rows, and anything else sees nothing.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// User id of the administrator account
pub const ADMIN_USER_ID: i64 = 1;

/// Body of the date-range export endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRangeRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub user_id: i64,

    /// Only read by the `/company` variants
    #[serde(default)]
    pub company_id: Option<i64>,
}

/// Which rows a date-range request may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    All,
    Owner(i64),
    Nothing,
}

impl DateRangeRequest {
    pub fn visibility(&self) -> Visibility {
        match self.user_id {
            ADMIN_USER_ID => Visibility::All,
            id if id > ADMIN_USER_ID => Visibility::Owner(id),
            _ => Visibility::Nothing,
        }
    }

    /// Inclusive bounds for filtering a DATETIME column
    ///
    /// The end date covers the whole day.
    pub fn datetime_bounds(&self) -> (NaiveDateTime, NaiveDateTime) {
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default();
        (
            self.start_date.and_time(NaiveTime::default()),
            self.end_date.and_time(end_of_day),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(user_id: i64) -> DateRangeRequest {
        DateRangeRequest {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            user_id,
            company_id: None,
        }
    }

    #[test]
    fn test_visibility_rules() {
        assert_eq!(request(1).visibility(), Visibility::All);
        assert_eq!(request(2).visibility(), Visibility::Owner(2));
        assert_eq!(request(42).visibility(), Visibility::Owner(42));
        assert_eq!(request(0).visibility(), Visibility::Nothing);
        assert_eq!(request(-5).visibility(), Visibility::Nothing);
    }

    #[test]
    fn test_datetime_bounds_cover_end_day() {
        let (start, end) = request(1).datetime_bounds();
        assert_eq!(start.to_string(), "2024-01-01 00:00:00");
        assert_eq!(end.to_string(), "2024-01-31 23:59:59");
    }

    #[test]
    fn test_company_id_optional() {
        let body = r#"{"start_date":"2024-01-01","end_date":"2024-02-01","user_id":1}"#;
        let parsed: DateRangeRequest = serde_json::from_str(body).unwrap();
        assert!(parsed.company_id.is_none());

        let body = r#"{"start_date":"2024-01-01","end_date":"2024-02-01","user_id":1,"company_id":4}"#;
        let parsed: DateRangeRequest = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.company_id, Some(4));
    }
}
