//! # ringsub - batch jobs for ring-topology FPGA link configurations
//!
//! This library generates job scripts for rings of FPGA link endpoints and
//! hands them to a cluster scheduler.
//!
//! ## Overview
//!
//! For every requested ring size `N` the link configuration connects each
//! endpoint's outgoing channel to its predecessor's incoming channel, closing
//! one cycle over all `N` endpoints. Endpoints are packed three per node,
//! one per device slot:
//!
//! ```text
//! N = 4:
//! --fpgalink=n00:acl0:ch0-n01:acl0:ch1 --fpgalink=n00:acl1:ch0-n00:acl0:ch1
//! --fpgalink=n00:acl2:ch0-n00:acl1:ch1 --fpgalink=n01:acl0:ch0-n00:acl2:ch1
//! ```
//!
//! ## Architecture
//!
//! - `topology`: ring sizes, endpoints and the link configuration builder
//! - `sizes`: single sizes and inclusive ranges requested on the command line
//! - `template`: job script templates with four positional slots
//! - `submit`: scheduler submission (`sbatch` by default, or a dry run)
//! - `orchestrator`: build, render, write and submit for a batch of sizes
//! - `config` / `config_loader`: YAML configuration and CLI overrides
//! - `utils`: URL path escaping and script persistence
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use ringsub::config::Config;
//! use ringsub::orchestrator::{run_batch, BatchSettings};
//! use ringsub::sizes::{RangeDefaults, SizeRequest};
//! use ringsub::submit::DryRun;
//! use ringsub::template::FormatTemplate;
//!
//! let config = Config::default();
//! let sizes = SizeRequest::from_args(&[3, 9, 3], &RangeDefaults::default())?.sizes()?;
//! let template = FormatTemplate::load(&config.template)?;
//!
//! // Writes scripts/run_ring_n3.sh, run_ring_n6.sh and run_ring_n9.sh
//! let report = run_batch(&sizes, &template, &DryRun, &BatchSettings::from(&config))?;
//! assert!(report.is_success());
//! # Ok::<(), color_eyre::Report>(())
//! ```
//!
//! ## Error Handling
//!
//! Each module reports its own failures with a `thiserror` enum; the batch
//! and configuration layers wrap them in `color_eyre` reports with context.

pub mod config;
pub mod config_loader;
pub mod orchestrator;
pub mod sizes;
pub mod submit;
pub mod template;
pub mod topology;
pub mod utils;
