//! The connectivity probe: connect, write one record, read it back, count,
//! disconnect.
//!
//! The sequence is strictly linear. Any failure aborts the remaining steps
//! except disconnect, which the [`Session`] runs on every path.

use std::fmt;
use std::io::Write;

use mongodb::bson::Document;

use crate::error::{ProbeError, Result};
use crate::model::{ProbeRecord, student_id_filter};
use crate::storage::{DocumentStore, Session};
use crate::target::Target;

/// What a successful probe observed.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// Identifier the store generated for the inserted record.
    pub inserted_id: String,

    /// The record as read back by its `student_id`.
    pub retrieved: ProbeRecord,

    /// Documents in the collection before the insert.
    pub count_before: u64,

    /// Documents in the collection after the insert.
    pub count_after: u64,
}

/// Human-readable progress lines. Best effort: a closed stdout must not
/// abort the probe. The first write failure is logged, later ones are not.
struct Progress<'a> {
    out: &'a mut dyn Write,
    write_failed: bool,
}

impl<'a> Progress<'a> {
    fn new(out: &'a mut dyn Write) -> Self {
        Self {
            out,
            write_failed: false,
        }
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{args}")
            && !self.write_failed
        {
            self.write_failed = true;
            tracing::debug!(error = %e, "progress output failed");
        }
    }
}

/// Connects, runs `f` against the store, and disconnects whatever happens.
pub fn with_session<S, T>(
    connect: impl FnOnce(&Target) -> Result<S>,
    target: &Target,
    f: impl FnOnce(&mut S) -> Result<T>,
) -> Result<T>
where
    S: DocumentStore,
{
    let mut session = Session::new(connect(target)?);
    let result = f(session.store()?);
    session.close();
    result
}

/// Runs the full probe against `target`, writing progress to `out`.
///
/// On failure the error is printed to `out` before the closing line and is
/// also returned so the caller can pick an exit status.
pub fn execute<S: DocumentStore>(
    connect: impl FnOnce(&Target) -> Result<S>,
    target: &Target,
    record: &ProbeRecord,
    out: &mut dyn Write,
) -> Result<ProbeReport> {
    let mut progress = Progress::new(out);
    progress.line(format_args!("Connecting to document store..."));

    let result = with_session(connect, target, |store| {
        sequence(store, target, record, &mut progress)
    });

    match &result {
        Ok(report) => tracing::info!(
            inserted_id = %report.inserted_id,
            student_id = %report.retrieved.student_id,
            count_before = report.count_before,
            count_after = report.count_after,
            "probe succeeded"
        ),
        Err(e) => {
            tracing::warn!(error = %e, "probe failed");
            progress.line(format_args!("Error: {e}"));
        }
    }
    progress.line(format_args!("\nConnection closed."));
    result
}

fn sequence<S: DocumentStore>(
    store: &mut S,
    target: &Target,
    record: &ProbeRecord,
    progress: &mut Progress<'_>,
) -> Result<ProbeReport> {
    let collection = target.collection.as_str();
    progress.line(format_args!("Connected."));
    progress.line(format_args!("Using database: {}", target.database));

    let count_before = store.count(collection, Document::new())?;

    // ── Save ──

    progress.line(format_args!("\n--- Saving record to {collection} ---"));
    tracing::debug!(student_id = %record.student_id, "saving record");
    let inserted_id = store.insert(collection, record.to_document())?;
    progress.line(format_args!("Record saved. Document ID: {inserted_id}"));

    // ── Retrieve ──

    progress.line(format_args!("\n--- Retrieving record ---"));
    let retrieved = lookup(store, collection, &record.student_id)?.ok_or_else(|| {
        ProbeError::Query(format!(
            "record {} not found after insert (document {inserted_id})",
            record.student_id
        ))
    })?;
    if retrieved != record.normalized() {
        // Expected when earlier runs left records with the same key.
        tracing::warn!(
            student_id = %record.student_id,
            "read-back differs from the record just written"
        );
    }
    progress.line(format_args!("Record retrieved."));
    progress.line(format_args!("Student Name: {}", retrieved.student_name));
    progress.line(format_args!("Student ID: {}", retrieved.student_id));
    progress.line(format_args!("Task: {}", retrieved.task));
    progress.line(format_args!("Action: {}", retrieved.action));
    progress.line(format_args!("Timestamp: {}", retrieved.timestamp));
    progress.line(format_args!("Status: {}", retrieved.status));

    // ── Count ──

    let count_after = store.count(collection, Document::new())?;
    progress.line(format_args!(
        "\n--- Total documents in collection: {count_after} ---"
    ));
    progress.line(format_args!("\nProbe complete."));

    Ok(ProbeReport {
        inserted_id,
        retrieved,
        count_before,
        count_after,
    })
}

/// Looks up a record by `student_id`. A miss is `Ok(None)`, not an error.
pub fn lookup<S: DocumentStore>(
    store: &S,
    collection: &str,
    student_id: &str,
) -> Result<Option<ProbeRecord>> {
    let found = store.find_one(collection, student_id_filter(student_id))?;
    tracing::debug!(student_id, found = found.is_some(), "lookup");
    found.as_ref().map(ProbeRecord::from_document).transpose()
}

/// Counts records, optionally only those with the given `student_id`.
pub fn count<S: DocumentStore>(
    store: &S,
    collection: &str,
    student_id: Option<&str>,
) -> Result<u64> {
    let filter = student_id.map(student_id_filter).unwrap_or_default();
    let n = store.count(collection, filter)?;
    tracing::debug!(collection, count = n, "count");
    Ok(n)
}
