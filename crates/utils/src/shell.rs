//! Helpers for locating external executables.

use std::path::PathBuf;

/// Resolve an executable by name on `PATH`.
///
/// Names that already contain a path separator are checked as given.
pub fn resolve_executable_path_blocking(name: &str) -> Option<PathBuf> {
    match which::which(name) {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::debug!("Could not resolve executable {}: {}", name, e);
            None
        }
    }
}

/// Check whether an executable can be found on `PATH`
pub fn is_executable_available(name: &str) -> bool {
    resolve_executable_path_blocking(name).is_some()
}
