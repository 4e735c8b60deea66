use crate::error::ServiceError;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

/// Inbound date range, parsed from `startDate`/`endDate` query parameters.
/// When `end` is present it is never earlier than `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

/// Validates the raw query map into a `DateRange`, collecting every violated
/// rule rather than stopping at the first.
pub fn validate_query(params: &BTreeMap<String, String>) -> Result<DateRange, ServiceError> {
    let mut violations = Vec::new();

    if params
        .keys()
        .any(|k| !matches!(k.as_str(), "startDate" | "endDate"))
    {
        violations.push("Only startDate and endDate are allowed".to_string());
    }

    let start = match params.get("startDate") {
        None => {
            violations.push("startDate is required".to_string());
            None
        }
        Some(raw) => match parse_ymd(raw) {
            Ok(date) => Some(date),
            Err(problem) => {
                violations.push(problem.describe("startDate"));
                None
            }
        },
    };

    let end = match params.get("endDate") {
        None => None,
        Some(raw) => match parse_ymd(raw) {
            Ok(date) => Some(date),
            Err(problem) => {
                violations.push(problem.describe("endDate"));
                None
            }
        },
    };

    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            violations.push("endDate cannot be before startDate".to_string());
        }
    }

    match (violations.is_empty(), start) {
        (true, Some(start)) => Ok(DateRange { start, end }),
        _ => Err(ServiceError::validation(violations)),
    }
}

/// The single place the default window is computed: the upstream feed's own
/// default of seven days past the start, re-derived here so the outbound call
/// and the response body always agree.
pub fn effective_end_date(start: NaiveDate, end: Option<NaiveDate>) -> NaiveDate {
    end.unwrap_or(start + Duration::days(7))
}

enum YmdProblem {
    Pattern,
    Calendar,
}

impl YmdProblem {
    fn describe(&self, field: &str) -> String {
        match self {
            Self::Pattern => format!("{field} must be in YYYY-MM-DD format"),
            Self::Calendar => format!("{field} is not a valid calendar date"),
        }
    }
}

fn parse_ymd(raw: &str) -> Result<NaiveDate, YmdProblem> {
    if !is_ymd_shaped(raw) {
        return Err(YmdProblem::Pattern);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| YmdProblem::Calendar)
}

// Strict YYYY-MM-DD: chrono alone would accept unpadded months and days.
fn is_ymd_shaped(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
