//! Core data model for docprobe.
//!
//! A single flat record type, written once and read back once per probe.

mod record;

pub use record::{ProbeRecord, student_id_filter};
