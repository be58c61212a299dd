//! Batch orchestrator.
//!
//! Drives every requested ring size through build, render, write and
//! submit, applying the configured [`FailurePolicy`] when a step fails.

use crate::config::{Config, FailurePolicy};
use crate::template::{RingJob, TemplateRenderer};
use crate::topology::{RingLinkConfig, RingSize};
use crate::submit::{JobSubmitter, Submission};
use crate::utils::script::{script_file_name, write_job_script};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Where and how scripts are produced
#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub output_dir: PathBuf,
    pub script_name: String,
    pub on_failure: FailurePolicy,
}

impl From<&Config> for BatchSettings {
    fn from(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            script_name: config.script_name.clone(),
            on_failure: config.on_failure,
        }
    }
}

/// Result of processing one ring size
#[derive(Debug)]
pub struct SizeOutcome {
    pub size: RingSize,
    /// Path of the written script, if it got that far
    pub script: Option<PathBuf>,
    pub result: Result<Submission>,
}

impl SizeOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a whole batch, in request order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<SizeOutcome>,
}

impl BatchReport {
    pub fn submitted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.submitted()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Build, render, persist and submit the job for a single ring size.
/// Returns the script path alongside the submission result so a failed
/// submission still reports which file was written.
fn process_size(
    size: RingSize,
    renderer: &dyn TemplateRenderer,
    submitter: &dyn JobSubmitter,
    settings: &BatchSettings,
) -> (Option<PathBuf>, Result<Submission>) {
    let ring = RingLinkConfig::new(size);
    debug!("Ring {} link configuration: {}", size, ring);

    let job = RingJob::from_config(&ring);
    let script = match renderer
        .render(&job)
        .wrap_err_with(|| format!("Failed to render job script for ring size {}", size))
    {
        Ok(script) => script,
        Err(e) => return (None, Err(e)),
    };

    let name = script_file_name(&settings.script_name, size.get());
    let path = match write_job_script(&settings.output_dir, &name, &script) {
        Ok(path) => path,
        Err(e) => return (None, Err(e)),
    };
    info!("Wrote {:?} ({} endpoints on {} nodes)", path, size, ring.node_count());

    let result = submitter
        .submit(&path)
        .wrap_err_with(|| format!("Failed to submit job for ring size {}", size));
    (Some(path), result)
}

/// Process every ring size in order.
///
/// With [`FailurePolicy::Abort`] the first failure is returned as the
/// error and the remaining sizes are skipped. With
/// [`FailurePolicy::Continue`] failures are logged and recorded in the
/// report.
pub fn run_batch(
    sizes: &[RingSize],
    renderer: &dyn TemplateRenderer,
    submitter: &dyn JobSubmitter,
    settings: &BatchSettings,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();

    for &size in sizes {
        info!("Generating ring of size {}", size);
        let (script, result) = process_size(size, renderer, submitter, settings);

        if let Err(e) = &result {
            match settings.on_failure {
                FailurePolicy::Abort => {
                    return Err(eyre!("Aborting batch at ring size {}: {:#}", size, e));
                }
                FailurePolicy::Continue => {
                    warn!("Ring size {} failed, continuing: {:#}", size, e);
                }
            }
        }

        report.outcomes.push(SizeOutcome { size, script, result });
    }

    info!(
        "Batch finished: {} submitted, {} failed",
        report.submitted(),
        report.failed()
    );
    Ok(report)
}

/// Paths of all scripts written by a batch
pub fn written_scripts(report: &BatchReport) -> Vec<&Path> {
    report
        .outcomes
        .iter()
        .filter_map(|o| o.script.as_deref())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submit::{DryRun, SubmitError};
    use crate::template::FormatTemplate;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Records submitted paths and fails for scripts whose name contains
    /// one of `fail_on`
    #[derive(Default)]
    struct RecordingSubmitter {
        submitted: RefCell<Vec<PathBuf>>,
        fail_on: Vec<String>,
    }

    impl JobSubmitter for RecordingSubmitter {
        fn submit(&self, script: &Path) -> std::result::Result<Submission, SubmitError> {
            self.submitted.borrow_mut().push(script.to_path_buf());
            let name = script.file_name().unwrap().to_string_lossy().to_string();
            if self.fail_on.iter().any(|f| name.contains(f.as_str())) {
                return Err(SubmitError::Spawn {
                    program: "test".to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "refused"),
                });
            }
            Ok(Submission {
                script: script.to_path_buf(),
                output: format!("Submitted batch job {}", self.submitted.borrow().len()),
                job_id: Some(self.submitted.borrow().len() as u64),
                dry_run: false,
            })
        }
    }

    fn settings(dir: &Path, on_failure: FailurePolicy) -> BatchSettings {
        BatchSettings {
            output_dir: dir.to_path_buf(),
            script_name: "run_ring_n{}.sh".to_string(),
            on_failure,
        }
    }

    fn sizes(values: &[i64]) -> Vec<RingSize> {
        values.iter().map(|&n| RingSize::new(n).unwrap()).collect()
    }

    #[test]
    fn test_batch_writes_and_submits_each_size() {
        let temp = TempDir::new().unwrap();
        let template = FormatTemplate::parse("N={0} nodes={1}\n{2}\n").unwrap();
        let submitter = RecordingSubmitter::default();

        let report = run_batch(
            &sizes(&[3, 6, 9]),
            &template,
            &submitter,
            &settings(temp.path(), FailurePolicy::Abort),
        )
        .unwrap();

        assert!(report.is_success());
        assert_eq!(report.submitted(), 3);
        assert_eq!(
            *submitter.submitted.borrow(),
            vec![
                temp.path().join("run_ring_n3.sh"),
                temp.path().join("run_ring_n6.sh"),
                temp.path().join("run_ring_n9.sh"),
            ]
        );

        let content = std::fs::read_to_string(temp.path().join("run_ring_n6.sh")).unwrap();
        assert!(content.starts_with("N=6 nodes=2\n--fpgalink=n00:acl0:ch0-n01:acl2:ch1 "));
        assert_eq!(report.outcomes[2].result.as_ref().unwrap().job_id, Some(3));
    }

    #[test]
    fn test_abort_stops_at_first_failure() {
        let temp = TempDir::new().unwrap();
        let template = FormatTemplate::parse("{}").unwrap();
        let submitter = RecordingSubmitter {
            fail_on: vec!["n6.".to_string()],
            ..Default::default()
        };

        let err = run_batch(
            &sizes(&[3, 6, 9]),
            &template,
            &submitter,
            &settings(temp.path(), FailurePolicy::Abort),
        )
        .unwrap_err();

        assert!(err.to_string().contains("ring size 6"));
        assert_eq!(submitter.submitted.borrow().len(), 2);
        assert!(!temp.path().join("run_ring_n9.sh").exists());
    }

    #[test]
    fn test_continue_reports_failures() {
        let temp = TempDir::new().unwrap();
        let template = FormatTemplate::parse("{}").unwrap();
        let submitter = RecordingSubmitter {
            fail_on: vec!["n6.".to_string()],
            ..Default::default()
        };

        let report = run_batch(
            &sizes(&[3, 6, 9]),
            &template,
            &submitter,
            &settings(temp.path(), FailurePolicy::Continue),
        )
        .unwrap();

        assert_eq!(report.submitted(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());
        assert!(!report.outcomes[1].is_success());
        assert_eq!(written_scripts(&report).len(), 3);
        assert!(temp.path().join("run_ring_n9.sh").exists());
    }

    #[test]
    fn test_dry_run_still_writes_scripts() {
        let temp = TempDir::new().unwrap();
        let template = FormatTemplate::parse("{3}").unwrap();

        let report = run_batch(
            &sizes(&[1]),
            &template,
            &DryRun,
            &settings(temp.path(), FailurePolicy::Abort),
        )
        .unwrap();

        assert!(report.outcomes[0].result.as_ref().unwrap().dry_run);
        let content = std::fs::read_to_string(temp.path().join("run_ring_n1.sh")).unwrap();
        assert_eq!(content, "--fpgalink%3Dn00%3Aacl0%3Ach0-n00%3Aacl0%3Ach1%20");
    }
}
