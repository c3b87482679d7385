//! Summary input and output types.

use chrono::{Days, Months, NaiveDate};
use commission_shared::types::{
    CommissionProjectId, CompanyId, DepartmentId, EmployeeId, PositionId, ReportId,
};
use rust_decimal::Decimal;
use serde::Serialize;

use super::error::SummaryError;

/// Storage format of report dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First day.
    pub start: NaiveDate,
    /// Last day.
    pub end: NaiveDate,
}

impl DateRange {
    /// First day as `YYYY-MM-DD`.
    #[must_use]
    pub fn start_string(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    /// Last day as `YYYY-MM-DD`.
    #[must_use]
    pub fn end_string(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

/// A calendar month given as `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearMonth {
    label: String,
    range: DateRange,
}

impl YearMonth {
    /// Parses `YYYY-MM` into the month's first and last day.
    ///
    /// The month must be written exactly as `YYYY-MM`; a one-digit month,
    /// surrounding whitespace or a sign is rejected.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::InvalidMonth` if `month` is not a valid month.
    pub fn parse(month: &str) -> Result<Self, SummaryError> {
        let invalid = || SummaryError::InvalidMonth(month.to_string());

        let start = NaiveDate::parse_from_str(&format!("{month}-01"), DATE_FORMAT)
            .ok()
            .filter(|start| start.format("%Y-%m").to_string() == month)
            .ok_or_else(invalid)?;
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.checked_sub_days(Days::new(1)))
            .ok_or_else(invalid)?;

        Ok(Self {
            label: month.to_string(),
            range: DateRange { start, end },
        })
    }

    /// The month as supplied.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The inclusive day range of the month.
    #[must_use]
    pub const fn range(&self) -> DateRange {
        self.range
    }
}

/// One active report with the display names of its joined rows.
///
/// Names are `None` when the joined row no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    /// Report id, used to pick the latest line of a group.
    pub report_id: ReportId,
    /// Report date, `YYYY-MM-DD`.
    pub date: String,
    /// Employee id.
    pub employee_id: EmployeeId,
    /// Employee name cached on the report.
    pub employee_name: String,
    /// Company id cached on the report.
    pub company_id: CompanyId,
    /// Joined company name.
    pub company_name: Option<String>,
    /// Department id cached on the report.
    pub department_id: DepartmentId,
    /// Joined department name.
    pub department_name: Option<String>,
    /// Position id cached on the report.
    pub position_id: PositionId,
    /// Joined position name.
    pub position_name: Option<String>,
    /// Commission project id.
    pub commission_project_id: CommissionProjectId,
    /// Joined commission project field name.
    pub project_name: Option<String>,
    /// Signed commission value.
    pub commission_value: Decimal,
}

/// Aggregated monthly total for one (employee, commission project) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    /// Employee id.
    pub employee_id: EmployeeId,
    /// Employee name from the latest report of the group.
    pub employee_name: String,
    /// Company id from the latest report of the group.
    pub company_id: CompanyId,
    /// Company name, `None` if the company is gone.
    pub company_name: Option<String>,
    /// Department id from the latest report of the group.
    pub department_id: DepartmentId,
    /// Department name, `None` if the department is gone.
    pub department_name: Option<String>,
    /// Position id from the latest report of the group.
    pub position_id: PositionId,
    /// Position name, `None` if the position is gone.
    pub position_name: Option<String>,
    /// Commission project id.
    pub commission_project_id: CommissionProjectId,
    /// Commission project field name.
    pub project_name: Option<String>,
    /// Sum of the group's commission values.
    pub total_value: Decimal,
}

/// Summary response for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    /// Rows ordered by employee name then project name.
    pub summaries: Vec<SummaryRow>,
    /// The month as requested.
    pub month: String,
    /// First day of the month.
    pub start_date: String,
    /// Last day of the month.
    pub end_date: String,
}

impl MonthlySummary {
    /// A summary of `month` with the given rows.
    #[must_use]
    pub fn new(month: &YearMonth, summaries: Vec<SummaryRow>) -> Self {
        let range = month.range();
        Self {
            summaries,
            month: month.label().to_string(),
            start_date: range.start_string(),
            end_date: range.end_string(),
        }
    }
}
