//! Glob-based file discovery.

use std::path::PathBuf;

use glob::MatchOptions;

use crate::error::DocumentError;

/// Find files matching `pattern`, sorted by path.
///
/// Directories are skipped. `**` matches any number of directories.
/// Wildcards never match a leading `.`, so hidden files and directories
/// are only found when the pattern names them literally. Paths that cannot
/// be read are logged and skipped.
///
/// # Errors
///
/// Returns [`DocumentError::Pattern`] if the pattern is malformed.
pub fn discover(pattern: &str) -> Result<Vec<PathBuf>, DocumentError> {
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::default()
    };
    let mut files = Vec::new();
    for entry in glob::glob_with(pattern, options)? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => tracing::warn!(path = %e.path().display(), error = %e.error(), "Skipping unreadable path"),
        }
    }
    files.sort();
    tracing::debug!(pattern, count = files.len(), "Discovered markdown files");
    Ok(files)
}
