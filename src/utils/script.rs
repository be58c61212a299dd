//! Job script persistence.
//!
//! Writes a rendered job script to disk, replacing any previous script of
//! the same name, and marks it executable.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use std::path::{Path, PathBuf};

/// Placeholder in a script name pattern that is replaced by the ring size
pub const SIZE_PLACEHOLDER: &str = "{}";

/// Derive the script file name for a ring size from a pattern such as
/// `run_ring_n{}.sh`
pub fn script_file_name(pattern: &str, size: usize) -> String {
    pattern.replace(SIZE_PLACEHOLDER, &size.to_string())
}

/// Write a job script into `scripts_dir` and return its path.
///
/// # Parameters
/// - `scripts_dir`: Directory where scripts are written, created if missing
/// - `script_name`: Filename for the script (e.g., "run_ring_n6.sh")
/// - `content`: The rendered script
pub fn write_job_script(scripts_dir: &Path, script_name: &str, content: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(scripts_dir)
        .wrap_err_with(|| format!("Failed to create script directory '{}'", scripts_dir.display()))?;

    let script_path = scripts_dir.join(script_name);
    std::fs::write(&script_path, content)
        .wrap_err_with(|| format!("Failed to write script '{}'", script_path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(&script_path)?.permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script_path, perms)?;
    }

    Ok(script_path)
}
