//! The probe command: write, read back, count.

use std::io::{self, Write};

use clap::Args;

use crate::error::Result;
use crate::model::ProbeRecord;
use crate::probe;
use crate::storage::{DocumentStore, MongoStore};
use crate::target::Target;

use super::Outcome;

/// Overrides for the probe record. Unset fields keep the sample values.
#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// Display name written to `student_name`.
    #[arg(long)]
    student_name: Option<String>,

    /// Lookup key written to `student_id`.
    #[arg(long)]
    student_id: Option<String>,

    /// Free-text `task` label.
    #[arg(long)]
    task: Option<String>,

    /// Free-text `action` label.
    #[arg(long)]
    action: Option<String>,

    /// Value written to `status`.
    #[arg(long)]
    status: Option<String>,

    /// Exit with a failing status when the probe fails.
    ///
    /// Without it, a failed probe is reported and the exit status is zero.
    #[arg(long)]
    pub strict: bool,
}

impl RunArgs {
    /// The record to write, stamped now.
    pub fn record(&self) -> ProbeRecord {
        let mut record = ProbeRecord::sample();
        let overrides = [
            (&mut record.student_name, &self.student_name),
            (&mut record.student_id, &self.student_id),
            (&mut record.task, &self.task),
            (&mut record.action, &self.action),
            (&mut record.status, &self.status),
        ];
        for (field, value) in overrides {
            if let Some(v) = value {
                field.clone_from(v);
            }
        }
        record
    }
}

pub(super) fn cmd_run(target: &Target, args: &RunArgs) -> Outcome {
    run_with(MongoStore::connect, target, args, &mut io::stdout().lock())
}

fn run_with<S: DocumentStore>(
    connect: impl FnOnce(&Target) -> Result<S>,
    target: &Target,
    args: &RunArgs,
    out: &mut dyn Write,
) -> Outcome {
    let record = args.record();

    match probe::execute(connect, target, &record, out) {
        Ok(_) => Outcome::Done,
        Err(_) if args.strict => Outcome::ProbeFailed,
        Err(_) => Outcome::Done,
    }
}
