// src/aggregation.rs
use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::ReportError;
use crate::time_entries::TimeEntry;

/// Label of the single group that collects entries without an employee name.
pub const UNNAMED_EMPLOYEE: &str = "NULL";

const MICROS_PER_HOUR: f64 = 3_600_000_000.0;
const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Total worked hours for one employee.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeTotal {
    pub name: String,
    pub total_hours: f64,
}

/// Employee totals ordered by hours, largest first. Ties keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedSummary(Vec<EmployeeTotal>);

impl RankedSummary {
    pub fn iter(&self) -> std::slice::Iter<'_, EmployeeTotal> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn grand_total_hours(&self) -> f64 {
        self.0.iter().map(|t| t.total_hours).sum()
    }

    pub fn get(&self, name: &str) -> Option<&EmployeeTotal> {
        self.0.iter().find(|t| t.name == name)
    }

    pub fn as_slice(&self) -> &[EmployeeTotal] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a RankedSummary {
    type Item = &'a EmployeeTotal;
    type IntoIter = std::slice::Iter<'a, EmployeeTotal>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Group key for an entry; empty and missing names share the sentinel group.
pub fn group_name(entry: &TimeEntry) -> &str {
    match entry.employee_name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => UNNAMED_EMPLOYEE,
    }
}

/// Signed length of the entry's interval in hours. End before start gives a
/// negative value, which is passed through unchanged.
pub fn entry_hours(entry: &TimeEntry) -> Result<f64, ReportError> {
    let (start, end) = entry.parse_interval()?;
    let elapsed = end - start;
    // Microsecond precision; only spans beyond ~292k years fall back to milliseconds.
    Ok(match elapsed.num_microseconds() {
        Some(micros) => micros as f64 / MICROS_PER_HOUR,
        None => elapsed.num_milliseconds() as f64 / MILLIS_PER_HOUR,
    })
}

/// Groups entries by employee, sums their hours and ranks the groups.
///
/// Fails on the first entry whose timestamps cannot be parsed; no partial
/// summary is returned in that case.
pub fn aggregate(entries: &[TimeEntry]) -> Result<RankedSummary, ReportError> {
    let mut totals: Vec<EmployeeTotal> = Vec::new();
    let mut index_by_name: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        let hours = entry_hours(entry)?;
        let name = group_name(entry);
        let idx = *index_by_name.entry(name).or_insert_with(|| {
            totals.push(EmployeeTotal {
                name: name.to_string(),
                total_hours: 0.0,
            });
            totals.len() - 1
        });
        totals[idx].total_hours += hours;
    }

    // Vec::sort_by is stable, so equal totals stay in first-seen order.
    totals.sort_by(|a, b| b.total_hours.total_cmp(&a.total_hours));

    for total in &totals {
        debug!("{}: {:.2} h", total.name, total.total_hours);
    }
    info!(
        "Aggregated {} entries into {} employee totals",
        entries.len(),
        totals.len()
    );
    Ok(RankedSummary(totals))
}

#[cfg(test)]
impl RankedSummary {
    pub(crate) fn from_totals(totals: Vec<EmployeeTotal>) -> Self {
        RankedSummary(totals)
    }
}
