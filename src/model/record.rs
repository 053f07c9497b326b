//! Probe record: the document written to and read back from the store.

use jiff::Timestamp;
use mongodb::bson::{self, Document, doc};
use serde::{Deserialize, Serialize};

use crate::error::{ProbeError, Result};

/// The single flat record a probe writes.
///
/// `student_id` is the lookup key for the read-back. Uniqueness is not
/// enforced; the store accepts duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeRecord {
    pub student_name: String,
    pub student_id: String,
    pub task: String,
    pub action: String,
    pub timestamp: Timestamp,
    pub status: String,
}

impl ProbeRecord {
    /// Builds a record stamped with the current time.
    pub fn new(
        student_name: impl Into<String>,
        student_id: impl Into<String>,
        task: impl Into<String>,
        action: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            student_name: student_name.into(),
            student_id: student_id.into(),
            task: task.into(),
            action: action.into(),
            timestamp: Timestamp::now(),
            status: status.into(),
        }
    }

    /// The default record written by `docprobe run`.
    pub fn sample() -> Self {
        Self::new(
            "David",
            "027258554",
            "Environment Setup - Task 4",
            "Save and Retrieve Data Test",
            "Success",
        )
    }

    /// Encodes the record as a BSON document.
    ///
    /// The timestamp is stored as a BSON datetime, which keeps millisecond
    /// precision only.
    pub fn to_document(&self) -> Document {
        doc! {
            "student_name": self.student_name.as_str(),
            "student_id": self.student_id.as_str(),
            "task": self.task.as_str(),
            "action": self.action.as_str(),
            "timestamp": bson::DateTime::from_millis(self.timestamp.as_millisecond()),
            "status": self.status.as_str(),
        }
    }

    /// Decodes a record from a stored document. Unknown fields such as `_id`
    /// are ignored.
    pub fn from_document(document: &Document) -> Result<Self> {
        let text = |key: &str| {
            document
                .get_str(key)
                .map(String::from)
                .map_err(|e| ProbeError::Other(format!("invalid field `{key}`: {e}")))
        };

        let millis = document
            .get_datetime("timestamp")
            .map_err(|e| ProbeError::Other(format!("invalid field `timestamp`: {e}")))?
            .timestamp_millis();
        let timestamp = Timestamp::from_millisecond(millis)
            .map_err(|e| ProbeError::Other(format!("timestamp out of range: {e}")))?;

        Ok(Self {
            student_name: text("student_name")?,
            student_id: text("student_id")?,
            task: text("task")?,
            action: text("action")?,
            timestamp,
            status: text("status")?,
        })
    }

    /// The record with its timestamp truncated to what the store keeps.
    pub fn normalized(&self) -> Self {
        let mut record = self.clone();
        if let Ok(ts) = Timestamp::from_millisecond(self.timestamp.as_millisecond()) {
            record.timestamp = ts;
        }
        record
    }
}

/// Filter matching records by their `student_id` field.
pub fn student_id_filter(student_id: &str) -> Document {
    doc! { "student_id": student_id }
}
