//! Fiscal period resolution for quarterly statements.
//!
//! Statements carry only a period-end date. The fiscal quarter is inferred
//! from the month of that date using a fixed table that approximates a
//! fiscal year starting in October. Only two calendar months map to each
//! quarter; the remaining months never produce an exact match.

use earnings_store::models::QuarterlyReport;
use earnings_store::schema::FIELD_FISCAL_DATE_ENDING;

use crate::metrics::MetricError;

/// Maps a calendar month to the fiscal quarter it is treated as closing.
///
/// Months 2, 5, 8 and 11 (and anything outside 1..=12) are unmapped.
#[must_use]
pub const fn map_month_to_quarter(month: u32) -> Option<u8> {
    match month {
        9 | 10 => Some(1),
        12 | 1 => Some(2),
        3 | 4 => Some(3),
        6 | 7 => Some(4),
        _ => None,
    }
}

/// A statement chosen for a requested period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportMatch<'a> {
    pub report: &'a QuarterlyReport,
    /// `false` when no statement matched and the most recent one was used.
    pub exact: bool,
}

/// Finds the statement for `fiscal_year` / `fiscal_quarter`.
///
/// Statements are scanned in the given order and the first exact match
/// wins. Without an exact match the first statement is returned, since the
/// upstream feed lists the most recent quarter first. Returns `None` only for
/// an empty slice.
///
/// Statements without a date, or with one shorter than `YYYY-MM`, are
/// skipped.
///
/// # Errors
/// Returns `MetricError` for the first scanned date whose year or month is
/// not a number.
pub fn find_report(
    reports: &[QuarterlyReport],
    fiscal_year: i32,
    fiscal_quarter: u8,
) -> Result<Option<ReportMatch<'_>>, MetricError> {
    for report in reports {
        if report_period(report)? == Some((fiscal_year, fiscal_quarter)) {
            return Ok(Some(ReportMatch {
                report,
                exact: true,
            }));
        }
    }

    Ok(reports.first().map(|report| ReportMatch {
        report,
        exact: false,
    }))
}

/// Year and inferred quarter of a statement.
fn report_period(report: &QuarterlyReport) -> Result<Option<(i32, u8)>, MetricError> {
    let Some(date) = report.fiscal_date_ending.as_deref() else {
        return Ok(None);
    };
    if date.len() < 7 {
        return Ok(None);
    }
    let invalid = || MetricError {
        field: FIELD_FISCAL_DATE_ENDING,
        value: date.to_string(),
    };
    let year = date
        .get(0..4)
        .and_then(|year| year.parse::<i32>().ok())
        .ok_or_else(invalid)?;
    let month = date
        .get(5..7)
        .and_then(|month| month.parse::<u32>().ok())
        .ok_or_else(invalid)?;
    Ok(map_month_to_quarter(month).map(|quarter| (year, quarter)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(date: &str) -> QuarterlyReport {
        QuarterlyReport::ending(date)
    }

    #[test]
    fn month_table_matches_fiscal_calendar() {
        for month in [9, 10] {
            assert_eq!(map_month_to_quarter(month), Some(1));
        }
        for month in [12, 1] {
            assert_eq!(map_month_to_quarter(month), Some(2));
        }
        for month in [3, 4] {
            assert_eq!(map_month_to_quarter(month), Some(3));
        }
        for month in [6, 7] {
            assert_eq!(map_month_to_quarter(month), Some(4));
        }
        for month in [2, 5, 8, 11, 0, 13] {
            assert_eq!(map_month_to_quarter(month), None, "month {month}");
        }
    }

    #[test]
    fn first_exact_match_wins() {
        let reports = vec![
            report("2024-09-30"),
            report("2024-06-30").with_total_revenue("1"),
            report("2024-07-31").with_total_revenue("2"),
        ];

        let matched = find_report(&reports, 2024, 4).expect("dates parse").expect("should match");
        assert!(matched.exact);
        assert_eq!(matched.report.total_revenue.as_deref(), Some("1"));
    }

    #[test]
    fn year_must_match() {
        let reports = vec![report("2024-09-30"), report("2023-06-30")];

        let matched = find_report(&reports, 2024, 4).expect("dates parse").expect("should fall back");
        assert!(!matched.exact);
        assert_eq!(
            matched.report.fiscal_date_ending.as_deref(),
            Some("2024-09-30")
        );

        let matched = find_report(&reports, 2023, 4).expect("dates parse").expect("should match");
        assert!(matched.exact);
        assert_eq!(
            matched.report.fiscal_date_ending.as_deref(),
            Some("2023-06-30")
        );
    }

    #[test]
    fn unmapped_month_falls_back_to_first_report() {
        let reports = vec![report("2024-11-30"), report("2024-08-31")];

        let matched = find_report(&reports, 2024, 1).expect("dates parse").expect("should fall back");
        assert!(!matched.exact);
        assert_eq!(
            matched.report.fiscal_date_ending.as_deref(),
            Some("2024-11-30")
        );
    }

    #[test]
    fn short_or_missing_dates_are_skipped() {
        let reports = vec![
            QuarterlyReport::default().with_total_revenue("first"),
            report("2024-6").with_total_revenue("short"),
            report("2024-06-30").with_total_revenue("valid"),
        ];

        let matched = find_report(&reports, 2024, 4).expect("dates parse").expect("should match");
        assert!(matched.exact);
        assert_eq!(matched.report.total_revenue.as_deref(), Some("valid"));
    }

    #[test]
    fn fallback_ignores_date_validity() {
        let reports = vec![
            QuarterlyReport::default().with_total_revenue("undated"),
            report("2022-03-31"),
        ];

        let matched = find_report(&reports, 2024, 4).expect("dates parse").expect("should fall back");
        assert!(!matched.exact);
        assert_eq!(matched.report.total_revenue.as_deref(), Some("undated"));
    }

    #[test]
    fn non_numeric_date_is_an_error() {
        let reports = vec![report("2024-xx-30"), report("2024-06-30")];

        let err = find_report(&reports, 2024, 4).expect_err("month is not a number");
        assert_eq!(err.field, "fiscalDateEnding");
        assert_eq!(err.value, "2024-xx-30");

        let err = find_report(&[report("FY24-06-30")], 2024, 4).expect_err("year is not a number");
        assert_eq!(err.value, "FY24-06-30");
    }

    #[test]
    fn dates_after_the_match_are_not_read() {
        let reports = vec![report("2024-06-30"), report("2024-xx-30")];

        let matched = find_report(&reports, 2024, 4).expect("dates parse").expect("should match");
        assert!(matched.exact);
    }

    #[test]
    fn empty_input_yields_none() {
        assert!(find_report(&[], 2024, 4).expect("no dates to parse").is_none());
    }
}
