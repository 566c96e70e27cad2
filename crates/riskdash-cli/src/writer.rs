use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

/// Where to write a report.
///
/// An existing directory, or a path ending in a separator, receives a
/// timestamped `riskdash_<timestamp>.<extension>` file. Anything else is
/// used as the file path, creating parent directories as needed.
pub fn resolve_file_path(base_path: &str, timestamp: &str, extension: &str) -> Result<PathBuf> {
    let path = Path::new(base_path);
    let filename = format!("riskdash_{}.{}", timestamp, extension);

    let output_path = if path.exists() {
        if path.is_dir() {
            path.join(&filename)
        } else {
            path.to_path_buf()
        }
    } else if base_path.ends_with('/') || base_path.ends_with('\\') {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        path.join(filename)
    } else {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }
        path.to_path_buf()
    };
    Ok(output_path)
}

pub fn write_report(base_path: &str, timestamp: &str, extension: &str, body: &str) -> Result<PathBuf> {
    let path = resolve_file_path(base_path, timestamp, extension)?;
    fs::write(&path, body).with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(path)
}
