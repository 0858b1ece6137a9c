//! Per-VCS backends driving the command-line tools.

pub mod bzr;
pub mod git;
pub mod hg;
pub mod svn;

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::{DateTime, Utc};

use crate::command::{to_args, CommandRunner, SystemRunner};
use crate::detect::detect_vcs_from_fs;
use crate::error::VcsError;
use crate::types::VcsType;

/// State shared by every backend: where the checkout lives and how to run the tool
#[derive(Clone)]
pub(crate) struct RepoBase {
    vcs: VcsType,
    remote: String,
    local_path: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl RepoBase {
    pub(crate) fn new(
        vcs: VcsType,
        remote: String,
        local_path: PathBuf,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            vcs,
            remote,
            local_path,
            runner,
        }
    }

    pub(crate) fn remote(&self) -> &str {
        &self.remote
    }

    pub(crate) fn set_remote(&mut self, remote: String) {
        self.remote = remote;
    }

    pub(crate) fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// Whether the local path holds this VCS's metadata marker
    pub(crate) fn has_marker(&self) -> bool {
        self.local_path.join(self.vcs.marker_dir()).exists()
    }

    /// Run the tool without a working directory (clone, ping)
    pub(crate) fn run<I, S>(&self, args: I) -> Result<String, VcsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.runner.run(self.vcs.program(), &to_args(args), None)
    }

    /// Run the tool inside the local checkout
    pub(crate) fn run_from_dir<I, S>(&self, args: I) -> Result<String, VcsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.run_program_from_dir(self.vcs.program(), args)
    }

    /// Run a companion program (e.g. `svnversion`) inside the local checkout
    pub(crate) fn run_program_from_dir<I, S>(&self, program: &str, args: I) -> Result<String, VcsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.runner
            .run(program, &to_args(args), Some(self.local_path.as_path()))
    }
}

pub(crate) fn default_runner() -> Arc<dyn CommandRunner> {
    Arc::new(SystemRunner::new())
}

/// Refuse a local path that already belongs to another VCS.
///
/// Returns whether a checkout of `expected` was detected at `local`.
pub(crate) fn ensure_local_vcs(expected: VcsType, local: &Path) -> Result<bool, VcsError> {
    match detect_vcs_from_fs(local) {
        Ok(found) if found != expected => Err(VcsError::WrongVcs {
            expected,
            found,
            path: local.display().to_string(),
        }),
        Ok(_) => Ok(true),
        Err(_) => Ok(false),
    }
}

/// Compare the requested remote with the one a checkout is configured for.
///
/// `None` means the checkout names no remote at all and the requested one is
/// kept. A configured empty value is still a value and conflicts with any
/// non-empty request. Returns the remote the handle should use.
pub(crate) fn reconcile_remote(requested: &str, configured: Option<&str>) -> Result<String, VcsError> {
    match configured.map(str::trim) {
        Some(configured) if !requested.is_empty() && configured != requested => {
            Err(VcsError::WrongRemote {
                requested: requested.to_string(),
                configured: configured.to_string(),
            })
        }
        Some(configured) if requested.is_empty() && !configured.is_empty() => {
            tracing::debug!("Adopting remote {} from local checkout", configured);
            Ok(configured.to_string())
        }
        _ => Ok(requested.to_string()),
    }
}

/// Parse `YYYY-MM-DD HH:MM:SS +ZZZZ`, the ISO-like form git, hg and bzr print
pub(crate) fn parse_iso_seconds(raw: &str) -> Result<DateTime<Utc>, VcsError> {
    let raw = raw.trim();
    DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %z")
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| VcsError::InvalidOutput(format!("cannot parse date {raw:?}: {e}")))
}
