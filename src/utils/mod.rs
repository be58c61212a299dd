//! Shared utilities: URL path escaping and job script persistence.

pub mod escape;
pub mod script;

pub use escape::escape_path;
pub use script::{script_file_name, write_job_script};
