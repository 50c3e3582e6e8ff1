// src/time_entries.rs
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ReportError;

// Naive layouts the time-entries API has been seen to emit. All are read as UTC.
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// One time-tracking record as delivered by the time-entries API.
///
/// Every field is optional on the wire; nothing is validated until the
/// interval is actually needed by the aggregation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeEntry {
    pub id: Option<String>,
    pub employee_name: Option<String>,
    pub start_time_utc: Option<String>,
    pub end_time_utc: Option<String>,
    pub entry_notes: Option<String>,
    pub deleted_on: Option<String>,
}

impl TimeEntry {
    /// Identifier used in error messages. Entries without one are reported as `<no id>`.
    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or("<no id>")
    }

    /// Soft-delete marker is present and non-blank.
    pub fn is_deleted(&self) -> bool {
        self.deleted_on
            .as_deref()
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    }

    /// Parses start and end into UTC instants.
    pub fn parse_interval(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), ReportError> {
        let start = self.parse_field("StarTimeUtc", self.start_time_utc.as_deref())?;
        let end = self.parse_field("EndTimeUtc", self.end_time_utc.as_deref())?;
        Ok((start, end))
    }

    fn parse_field(
        &self,
        field: &'static str,
        value: Option<&str>,
    ) -> Result<DateTime<Utc>, ReportError> {
        value
            .and_then(parse_utc_timestamp)
            .ok_or_else(|| ReportError::BadTimestamp {
                entry_id: self.display_id().to_string(),
                field,
                value: value.map(str::to_string),
            })
    }
}

/// Accepts RFC 3339 (any offset, normalized to UTC) or a naive date-time taken as UTC.
pub fn parse_utc_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Parses the raw payload into entries. All-or-nothing: any structural
/// problem rejects the whole payload.
pub fn parse_time_entries(raw: &str) -> Result<Vec<TimeEntry>, ReportError> {
    let root: Value = serde_json::from_str(raw)
        .map_err(|e| ReportError::MalformedPayload(format!("invalid JSON: {}", e)))?;

    let records = match root {
        Value::Array(records) => records,
        other => {
            return Err(ReportError::MalformedPayload(format!(
                "expected an array of entries, found {}",
                json_kind(&other)
            )))
        }
    };

    let entries = records
        .iter()
        .enumerate()
        .map(|(index, record)| match record {
            Value::Object(fields) => entry_from_fields(index, fields),
            other => Err(ReportError::MalformedPayload(format!(
                "record {} is {}, expected an object",
                index,
                json_kind(other)
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Parsed {} time entries from payload", entries.len());
    Ok(entries)
}

fn entry_from_fields(index: usize, fields: &Map<String, Value>) -> Result<TimeEntry, ReportError> {
    let mut entry = TimeEntry::default();
    for (key, value) in fields {
        let slot = match key.to_ascii_lowercase().as_str() {
            "id" => &mut entry.id,
            "employeename" => &mut entry.employee_name,
            "startimeutc" | "starttimeutc" => &mut entry.start_time_utc,
            "endtimeutc" => &mut entry.end_time_utc,
            "entrynotes" => &mut entry.entry_notes,
            "deletedon" => &mut entry.deleted_on,
            _ => continue,
        };
        *slot = match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => {
                return Err(ReportError::MalformedPayload(format!(
                    "record {} field {} is {}, expected a string",
                    index,
                    key,
                    json_kind(other)
                )))
            }
        };
    }
    Ok(entry)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
