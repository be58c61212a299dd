use crate::sizes::RangeDefaults;
use crate::submit::DEFAULT_SCHEDULER;
use crate::utils::script::SIZE_PLACEHOLDER;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default template location, relative to the working directory
pub const DEFAULT_TEMPLATE: &str = "scripts/run_ring_template.sh";

/// Default directory for generated scripts
pub const DEFAULT_OUTPUT_DIR: &str = "scripts";

/// Default script name pattern; `{}` is replaced by the ring size
pub const DEFAULT_SCRIPT_NAME: &str = "run_ring_n{}.sh";

/// What the batch does when one ring size fails
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first failing size
    #[default]
    Abort,
    /// Report the failure and carry on with the remaining sizes
    Continue,
}

/// Top-level configuration structure that mirrors the YAML configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Job script template with four positional slots
    pub template: PathBuf,
    /// Directory receiving the generated scripts
    pub output_dir: PathBuf,
    /// Script file name pattern, `{}` is replaced by the ring size
    pub script_name: String,
    pub scheduler: SchedulerConfig,
    /// Range used when no sizes are given on the command line
    pub defaults: RangeDefaults,
    pub on_failure: FailurePolicy,
}

/// Scheduler invocation settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Program that accepts a job script path (e.g. "sbatch")
    pub program: String,
    /// (Optional) Arguments placed before the script path
    pub args: Vec<String>,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid scheduler configuration: {0}")]
    InvalidScheduler(String),
    #[error("Invalid script name: {0}")]
    InvalidScriptName(String),
    #[error("Invalid default range: {0}")]
    InvalidDefaults(String),
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.scheduler.program.trim().is_empty() {
            return Err(ValidationError::InvalidScheduler(
                "program cannot be empty".to_string(),
            ));
        }

        if self.script_name.is_empty() {
            return Err(ValidationError::InvalidScriptName(
                "script_name cannot be empty".to_string(),
            ));
        }
        if !self.script_name.contains(SIZE_PLACEHOLDER) {
            return Err(ValidationError::InvalidScriptName(format!(
                "'{}' must contain '{}' so every ring size gets its own script",
                self.script_name, SIZE_PLACEHOLDER
            )));
        }
        if self.script_name.contains('/') || self.script_name.contains('\\') {
            return Err(ValidationError::InvalidScriptName(format!(
                "'{}' must be a file name, not a path (use output_dir for the directory)",
                self.script_name
            )));
        }

        if self.defaults.start < 1 {
            return Err(ValidationError::InvalidDefaults(format!(
                "start must be at least 1, got {}",
                self.defaults.start
            )));
        }
        if self.defaults.step < 1 {
            return Err(ValidationError::InvalidDefaults(format!(
                "step must be at least 1, got {}",
                self.defaults.step
            )));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template: PathBuf::from(DEFAULT_TEMPLATE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            script_name: DEFAULT_SCRIPT_NAME.to_string(),
            scheduler: SchedulerConfig::default(),
            defaults: RangeDefaults::default(),
            on_failure: FailurePolicy::default(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_SCHEDULER.to_string(),
            args: Vec::new(),
        }
    }
}
