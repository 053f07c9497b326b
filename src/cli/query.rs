//! Read-only commands: find and count.

use std::io::{self, Write};

use crate::error;
use crate::probe;
use crate::storage::{DocumentStore, MongoStore};
use crate::target::Target;

use super::format::{format_count, format_record};

pub(super) fn cmd_find(target: &Target, student_id: &str, json: bool) -> Result<(), String> {
    find_with(
        MongoStore::connect,
        target,
        student_id,
        json,
        &mut io::stdout().lock(),
    )
}

pub(super) fn cmd_count(target: &Target, student_id: Option<&str>) -> Result<(), String> {
    count_with(MongoStore::connect, target, student_id, &mut io::stdout().lock())
}

fn find_with<S: DocumentStore>(
    connect: impl FnOnce(&Target) -> error::Result<S>,
    target: &Target,
    student_id: &str,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), String> {
    let found = probe::with_session(connect, target, |store| {
        probe::lookup(store, &target.collection, student_id)
    })
    .map_err(|e| format!("failed to find record: {e}"))?;

    let text = match found {
        None => format!("No record found for student ID {student_id}"),
        Some(record) if json => serde_json::to_string_pretty(&record)
            .map_err(|e| format!("failed to serialize record: {e}"))?,
        Some(record) => format_record(&record),
    };
    writeln!(out, "{text}").map_err(|e| format!("failed to write output: {e}"))
}

fn count_with<S: DocumentStore>(
    connect: impl FnOnce(&Target) -> error::Result<S>,
    target: &Target,
    student_id: Option<&str>,
    out: &mut dyn Write,
) -> Result<(), String> {
    let n = probe::with_session(connect, target, |store| {
        probe::count(store, &target.collection, student_id)
    })
    .map_err(|e| format!("failed to count records: {e}"))?;

    writeln!(out, "{}", format_count(n, &target.collection, student_id))
        .map_err(|e| format!("failed to write output: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::ProbeError;
    use crate::model::ProbeRecord;
    use crate::storage::memory::{FailPoint, MemoryStore};

    fn target() -> Target {
        Target {
            uri: "mongodb://localhost:27017".into(),
            database: "sample_mflix".into(),
            collection: "environment_test".into(),
        }
    }

    fn seeded() -> MemoryStore {
        MemoryStore::new().with_documents(
            "environment_test",
            vec![ProbeRecord::sample().to_document()],
        )
    }

    #[test]
    fn find_miss_is_reported_not_failed() {
        let store = MemoryStore::new();
        let disconnects = store.disconnects();
        let mut out = Vec::new();

        find_with(|_| Ok(store), &target(), "never-inserted", false, &mut out).unwrap();

        let output = String::from_utf8(out).unwrap();
        assert_eq!(output, "No record found for student ID never-inserted\n");
        assert_eq!(disconnects.get(), 1);
    }

    #[test]
    fn find_hit_prints_record() {
        let mut out = Vec::new();
        find_with(|_| Ok(seeded()), &target(), "027258554", false, &mut out).unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.starts_with("Student Name: David"));
    }

    #[test]
    fn find_hit_prints_json() {
        let mut out = Vec::new();
        find_with(|_| Ok(seeded()), &target(), "027258554", true, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["student_name"], "David");
        assert_eq!(value["status"], "Success");
    }

    #[test]
    fn find_failure_is_an_error() {
        let store = MemoryStore::failing(FailPoint::Find);
        let disconnects = store.disconnects();
        let mut out = Vec::new();

        let err = find_with(|_| Ok(store), &target(), "027258554", false, &mut out).unwrap_err();

        assert!(err.starts_with("failed to find record: query error"));
        assert!(out.is_empty());
        assert_eq!(disconnects.get(), 1);
    }

    #[test]
    fn find_on_unreachable_store_is_an_error() {
        let mut out = Vec::new();
        let err = find_with::<MemoryStore>(
            |_| Err(ProbeError::Connection("no servers available".into())),
            &target(),
            "027258554",
            false,
            &mut out,
        )
        .unwrap_err();

        assert!(err.contains("connection error"));
    }

    #[test]
    fn count_prints_filtered_total() {
        let mut out = Vec::new();
        count_with(|_| Ok(seeded()), &target(), Some("027258554"), &mut out).unwrap();

        let output = String::from_utf8(out).unwrap();
        assert_eq!(
            output,
            "1 record with student ID 027258554 in environment_test\n"
        );
    }
}
