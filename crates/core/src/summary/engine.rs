//! Monthly aggregation over report lines.

use std::collections::BTreeMap;

use commission_shared::types::{CommissionProjectId, EmployeeId, ReportId};

use super::error::SummaryError;
use super::types::{MonthlySummary, ReportLine, SummaryRow, YearMonth};
use crate::scope::Visibility;
use crate::store::EntityStore;

/// Computes monthly summaries from an [`EntityStore`].
#[derive(Debug)]
pub struct SummaryEngine<'a, S: EntityStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: EntityStore + ?Sized> SummaryEngine<'a, S> {
    /// Creates an engine reading from `store`.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Summarizes the active reports of `month` visible under `visibility`.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::MonthRequired` when `month` is missing or empty,
    /// `SummaryError::InvalidMonth` when it is not `YYYY-MM`, and
    /// `SummaryError::Store` when the report lines cannot be read.
    pub async fn monthly_summary(
        &self,
        month: Option<&str>,
        visibility: &Visibility,
    ) -> Result<MonthlySummary, SummaryError> {
        let month = match month {
            Some(m) if !m.is_empty() => YearMonth::parse(m)?,
            _ => return Err(SummaryError::MonthRequired),
        };

        if visibility.is_empty() {
            return Ok(MonthlySummary::new(&month, Vec::new()));
        }

        let mut lines = self
            .store
            .report_lines(&month.range(), visibility.employee_ids())
            .await?;

        // The store pre-filters; never trust it alone.
        lines.retain(|line| visibility.allows(line.employee_id));

        Ok(MonthlySummary::new(&month, summarize(lines)))
    }
}

struct Group {
    row: SummaryRow,
    latest: (String, ReportId),
}

/// Groups lines per (employee, project), sums their values and orders the
/// rows by employee name, project name, employee id and project id.
///
/// Display fields of a row come from its latest line (greatest date, then
/// greatest report id).
#[must_use]
pub fn summarize(lines: Vec<ReportLine>) -> Vec<SummaryRow> {
    let mut groups: BTreeMap<(EmployeeId, CommissionProjectId), Group> = BTreeMap::new();

    for line in lines {
        let key = (line.employee_id, line.commission_project_id);
        let stamp = (line.date.clone(), line.report_id);

        match groups.get_mut(&key) {
            Some(group) => {
                group.row.total_value += line.commission_value;
                if stamp > group.latest {
                    let total = group.row.total_value;
                    group.row = row_from(line);
                    group.row.total_value = total;
                    group.latest = stamp;
                }
            }
            None => {
                groups.insert(
                    key,
                    Group {
                        row: row_from(line),
                        latest: stamp,
                    },
                );
            }
        }
    }

    let mut rows: Vec<SummaryRow> = groups.into_values().map(|g| g.row).collect();
    rows.sort_by(|a, b| {
        a.employee_name
            .cmp(&b.employee_name)
            .then_with(|| {
                let a_project = a.project_name.as_deref().unwrap_or_default();
                let b_project = b.project_name.as_deref().unwrap_or_default();
                a_project.cmp(b_project)
            })
            .then_with(|| a.employee_id.cmp(&b.employee_id))
            .then_with(|| a.commission_project_id.cmp(&b.commission_project_id))
    });
    rows
}

fn row_from(line: ReportLine) -> SummaryRow {
    SummaryRow {
        employee_id: line.employee_id,
        employee_name: line.employee_name,
        company_id: line.company_id,
        company_name: line.company_name,
        department_id: line.department_id,
        department_name: line.department_name,
        position_id: line.position_id,
        position_name: line.position_name,
        commission_project_id: line.commission_project_id,
        project_name: line.project_name,
        total_value: line.commission_value,
    }
}
