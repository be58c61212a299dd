use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use ringsub::config_loader::{resolve_config, CliOverrides};
use ringsub::orchestrator::{run_batch, BatchSettings};
use ringsub::sizes::SizeRequest;
use ringsub::submit::{DryRun, JobSubmitter, SchedulerCli};
use ringsub::template::FormatTemplate;

/// Generate and submit batch jobs for ring-topology FPGA link configurations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ring sizes: N, or START END [STEP]. Defaults to the configured range
    #[arg(value_name = "SIZE", num_args = 0..=3, allow_negative_numbers = true)]
    sizes: Vec<i64>,

    /// Path to an optional YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Job script template (overrides the configuration)
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Directory for generated scripts (overrides the configuration)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Scheduler program used to submit scripts (overrides the configuration)
    #[arg(long)]
    scheduler: Option<String>,

    /// Write scripts without submitting them
    #[arg(long)]
    dry_run: bool,

    /// Keep processing remaining sizes after a failure
    #[arg(long)]
    keep_going: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let overrides = CliOverrides {
        template: args.template.clone(),
        output_dir: args.output_dir.clone(),
        scheduler: args.scheduler.clone(),
        keep_going: args.keep_going,
    };
    let config = resolve_config(args.config.as_deref(), &overrides)?;

    // Validate everything before the first script is written
    let sizes = SizeRequest::from_args(&args.sizes, &config.defaults)
        .and_then(|request| request.sizes())
        .wrap_err("Invalid ring size arguments")?;
    info!(
        "Requested ring sizes: {:?}",
        sizes.iter().map(|s| s.get()).collect::<Vec<_>>()
    );

    let template = FormatTemplate::load(&config.template)?;
    info!("Template: {:?}", config.template);
    info!("Output directory: {:?}", config.output_dir);

    let submitter: Box<dyn JobSubmitter> = if args.dry_run {
        Box::new(DryRun)
    } else {
        Box::new(SchedulerCli::new(
            config.scheduler.program.clone(),
            config.scheduler.args.clone(),
        ))
    };

    let report = run_batch(&sizes, &template, submitter.as_ref(), &BatchSettings::from(&config))?;

    if !report.is_success() {
        return Err(eyre!(
            "{} of {} ring sizes failed",
            report.failed(),
            report.outcomes.len()
        ));
    }

    info!("All {} jobs handled successfully", report.outcomes.len());
    Ok(())
}
