//! Work out which VCS a checkout or remote belongs to.

use std::path::Path;

use crate::error::VcsError;
use crate::types::VcsType;

/// Detect the VCS of a local checkout from its metadata directory.
///
/// Only `path` itself is inspected; parent directories are not searched. A marker
/// file counts as well as a directory, which covers `.git` files in linked worktrees.
pub fn detect_vcs_from_fs(path: &Path) -> Result<VcsType, VcsError> {
    VcsType::all()
        .into_iter()
        .find(|vcs| path.join(vcs.marker_dir()).exists())
        .ok_or_else(|| VcsError::cannot_detect(path))
}

/// Guess the VCS of a remote from the shape of its URL
pub fn detect_vcs_from_remote(remote: &str) -> Result<VcsType, VcsError> {
    let remote = remote.trim();
    let lower = remote.to_ascii_lowercase();

    if lower.starts_with("git://") || lower.starts_with("git@") || lower.ends_with(".git") {
        return Ok(VcsType::Git);
    }
    if lower.starts_with("svn://") || lower.starts_with("svn+ssh://") {
        return Ok(VcsType::Svn);
    }
    if lower.starts_with("bzr://") || lower.starts_with("bzr+ssh://") || lower.starts_with("lp:") {
        return Ok(VcsType::Bzr);
    }

    let host_and_path = lower.split_once("://").map(|(_, rest)| rest).unwrap_or(&lower);
    if host_and_path.starts_with("hg.") || host_and_path.contains("/hg/") {
        return Ok(VcsType::Hg);
    }

    Err(VcsError::CannotDetectVcs(remote.to_string()))
}
