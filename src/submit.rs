//! Job submission.
//!
//! Generated scripts are handed to the cluster scheduler through the
//! [`JobSubmitter`] trait so the batch loop sees an explicit result for
//! every submission.

use log::{debug, info};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Scheduler program used when none is configured
pub const DEFAULT_SCHEDULER: &str = "sbatch";

/// Errors that can occur while submitting a job script
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Failed to run scheduler '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Scheduler '{program}' rejected {script:?} ({status}): {stderr}")]
    Rejected {
        program: String,
        script: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
}

/// Outcome of a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub script: PathBuf,
    /// Trimmed scheduler output, e.g. "Submitted batch job 4711"
    pub output: String,
    /// Job id, when the scheduler reported one
    pub job_id: Option<u64>,
    pub dry_run: bool,
}

/// Hands a job script to a scheduler
pub trait JobSubmitter {
    fn submit(&self, script: &Path) -> Result<Submission, SubmitError>;
}

/// Submits scripts by invoking a scheduler binary such as `sbatch`
#[derive(Debug, Clone)]
pub struct SchedulerCli {
    pub program: String,
    /// Extra arguments placed before the script path
    pub args: Vec<String>,
}

impl Default for SchedulerCli {
    fn default() -> Self {
        Self {
            program: DEFAULT_SCHEDULER.to_string(),
            args: Vec::new(),
        }
    }
}

impl SchedulerCli {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl JobSubmitter for SchedulerCli {
    fn submit(&self, script: &Path) -> Result<Submission, SubmitError> {
        debug!("Running {} {:?} {:?}", self.program, self.args, script);
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(script)
            .output()
            .map_err(|source| SubmitError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SubmitError::Rejected {
                program: self.program.clone(),
                script: script.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let job_id = parse_job_id(&stdout);
        info!("Submitted {:?}: {}", script, stdout);

        Ok(Submission {
            script: script.to_path_buf(),
            output: stdout,
            job_id,
            dry_run: false,
        })
    }
}

/// Logs the script that would be submitted and submits nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRun;

impl JobSubmitter for DryRun {
    fn submit(&self, script: &Path) -> Result<Submission, SubmitError> {
        info!("Dry run: not submitting {:?}", script);
        Ok(Submission {
            script: script.to_path_buf(),
            output: String::new(),
            job_id: None,
            dry_run: true,
        })
    }
}

/// Job id from scheduler output whose last word is numeric
/// ("Submitted batch job 4711", or "4711" with `--parsable`, which may add
/// ";cluster").
pub fn parse_job_id(output: &str) -> Option<u64> {
    let last = output.split_whitespace().last()?;
    last.split(';').next()?.parse().ok()
}
