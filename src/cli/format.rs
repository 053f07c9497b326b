//! Output formatting for CLI display.

use crate::model::ProbeRecord;

/// Format a record as aligned `label: value` lines.
pub(super) fn format_record(record: &ProbeRecord) -> String {
    [
        ("Student Name", record.student_name.clone()),
        ("Student ID", record.student_id.clone()),
        ("Task", record.task.clone()),
        ("Action", record.action.clone()),
        ("Timestamp", record.timestamp.to_string()),
        ("Status", record.status.clone()),
    ]
    .iter()
    .map(|(label, value)| format!("{:<13} {value}", format!("{label}:")))
    .collect::<Vec<_>>()
    .join("\n")
}

pub(super) fn format_count(n: u64, collection: &str, student_id: Option<&str>) -> String {
    let noun = if n == 1 { "record" } else { "records" };
    match student_id {
        Some(id) => format!("{n} {noun} with student ID {id} in {collection}"),
        None => format!("{n} {noun} in {collection}"),
    }
}
