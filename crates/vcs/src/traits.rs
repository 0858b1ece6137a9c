use chrono::{DateTime, Utc};
use std::path::Path;

use crate::error::VcsError;
use crate::types::VcsType;

/// Core checkout operations
///
/// A handle pairs a remote location with a local path. The local path may not
/// hold a checkout yet; [`VcsRepository::get`] creates one.
///
/// Handles do not lock anything. Callers running operations against the same
/// local path from several threads must serialize them.
pub trait VcsRepository: Send + Sync {
    /// Which VCS this handle drives
    fn vcs_type(&self) -> VcsType;

    /// Remote location (may be empty when none was given or discovered)
    fn remote(&self) -> &str;

    /// Local checkout path
    fn local_path(&self) -> &Path;

    /// Check whether the local path holds a checkout of this VCS.
    ///
    /// Filesystem errors count as "not present".
    fn check_local(&self) -> bool;

    /// Create the local checkout from the remote
    fn get(&self) -> Result<(), VcsError>;

    /// Identifier of the currently checked out revision
    fn version(&self) -> Result<String, VcsError>;

    /// Commit time of the currently checked out revision
    fn date(&self) -> Result<DateTime<Utc>, VcsError>;

    /// Check for uncommitted changes in the working copy
    fn is_dirty(&self) -> Result<bool, VcsError>;

    /// Check whether the remote answers. Failures read as `false`.
    fn ping(&self) -> bool;
}

/// Operations that move the checkout
pub trait VcsSync: VcsRepository {
    /// Bring the checkout up to date with its remote
    fn update(&self) -> Result<(), VcsError>;

    /// Switch the checkout to a branch, tag or revision.
    ///
    /// The identifier is passed through as-is; the tool decides whether it is valid.
    fn update_version(&self, version: &str) -> Result<(), VcsError>;
}

/// Branch and tag queries
pub trait VcsReferences: VcsRepository {
    /// Branch names known for the tracked remote, in tool output order
    fn branches(&self) -> Result<Vec<String>, VcsError>;

    /// Tag names, in tool output order
    fn tags(&self) -> Result<Vec<String>, VcsError>;

    /// Check whether `reference` names something the tool can resolve
    fn is_reference(&self, reference: &str) -> bool;
}

/// Combined trait representing a full VCS backend
///
/// This is the main trait that users will interact with, combining all
/// VCS capabilities into a single interface.
pub trait VcsBackend: VcsRepository + VcsSync + VcsReferences {
    /// Get a human-readable description of this backend
    fn description(&self) -> String {
        if self.remote().is_empty() {
            format!("{} checkout at {}", self.vcs_type(), self.local_path().display())
        } else {
            format!(
                "{} checkout of {} at {}",
                self.vcs_type(),
                self.remote(),
                self.local_path().display()
            )
        }
    }
}
