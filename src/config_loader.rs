use crate::config::{Config, FailurePolicy};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration '{}'", config_path.display()))?;

    config.validate()?;

    Ok(config)
}

/// CLI arguments that override YAML settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub template: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub scheduler: Option<String>,
    pub keep_going: bool,
}

/// Apply CLI overrides to a configuration
pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) -> Result<()> {
    if let Some(template) = &overrides.template {
        config.template = template.clone();
    }

    if let Some(output_dir) = &overrides.output_dir {
        config.output_dir = output_dir.clone();
    }

    if let Some(program) = &overrides.scheduler {
        config.scheduler.program = program.clone();
    }

    if overrides.keep_going {
        config.on_failure = FailurePolicy::Continue;
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}

/// Load the configuration file if one was given, otherwise use defaults,
/// then apply CLI overrides
pub fn resolve_config(config_path: Option<&Path>, overrides: &CliOverrides) -> Result<Config> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    apply_overrides(&mut config, overrides)?;
    Ok(config)
}
