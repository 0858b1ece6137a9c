//! Subversion backend driving the `svn` and `svnversion` tools.
//!
//! Subversion keeps branches and tags as directories by convention, so there
//! is no reference namespace to list.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{default_runner, ensure_local_vcs, reconcile_remote, RepoBase};
use crate::command::CommandRunner;
use crate::error::VcsError;
use crate::traits::*;
use crate::types::VcsType;

/// Subversion implementation of VCS backend
#[derive(Clone)]
pub struct SvnRepository {
    base: RepoBase,
}

impl SvnRepository {
    /// Create a handle for `remote` checked out at `local`.
    ///
    /// An existing working copy's repository URL must match `remote`; it is
    /// adopted when `remote` is empty.
    pub fn new(remote: impl Into<String>, local: impl Into<PathBuf>) -> Result<Self, VcsError> {
        Self::with_runner(remote, local, default_runner())
    }

    pub fn with_runner(
        remote: impl Into<String>,
        local: impl Into<PathBuf>,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Self, VcsError> {
        let local = local.into();
        let detected = ensure_local_vcs(VcsType::Svn, &local)?;

        let mut repo = Self {
            base: RepoBase::new(VcsType::Svn, remote.into(), local, runner),
        };

        if detected && repo.check_local() {
            let out = repo.base.run_from_dir(["info"])?;
            let configured = parse_info_url(&out);
            // svn info reports the URL the checkout was made from
            let requested = to_svn_url(repo.base.remote());
            let remote = reconcile_remote(&requested, configured.as_deref())?;
            if remote != requested {
                repo.base.set_remote(remote);
            }
        }

        Ok(repo)
    }

    fn checkout_url(&self) -> String {
        to_svn_url(self.base.remote())
    }
}

/// Remote as svn expects it; bare absolute paths become `file://` URLs
fn to_svn_url(remote: &str) -> String {
    if remote.starts_with('/') {
        format!("file://{remote}")
    } else {
        remote.to_string()
    }
}

/// Pull the `URL: <url>` line out of `svn info`
fn parse_info_url(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| line.strip_prefix("URL: "))
        .map(|url| url.trim().to_string())
}

impl VcsRepository for SvnRepository {
    fn vcs_type(&self) -> VcsType {
        VcsType::Svn
    }

    fn remote(&self) -> &str {
        self.base.remote()
    }

    fn local_path(&self) -> &Path {
        self.base.local_path()
    }

    fn check_local(&self) -> bool {
        self.base.has_marker()
    }

    fn get(&self) -> Result<(), VcsError> {
        let url = self.checkout_url();
        let args: [&OsStr; 4] = [
            OsStr::new("checkout"),
            OsStr::new("--"),
            OsStr::new(&url),
            self.base.local_path().as_os_str(),
        ];
        self.base.run(args)?;
        Ok(())
    }

    fn version(&self) -> Result<String, VcsError> {
        let out = self.base.run_program_from_dir("svnversion", ["."])?;
        Ok(out.trim().to_string())
    }

    fn date(&self) -> Result<DateTime<Utc>, VcsError> {
        let out = self
            .base
            .run_from_dir(["info", "--show-item", "last-changed-date"])?;
        let raw = out.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|d| d.with_timezone(&Utc))
            .map_err(|e| VcsError::InvalidOutput(format!("cannot parse date {raw:?}: {e}")))
    }

    fn is_dirty(&self) -> Result<bool, VcsError> {
        let out = self.base.run_from_dir(["diff"])?;
        Ok(!out.trim().is_empty())
    }

    fn ping(&self) -> bool {
        let url = self.checkout_url();
        self.base
            .run(["--non-interactive", "info", "--", url.as_str()])
            .is_ok()
    }
}

impl VcsSync for SvnRepository {
    fn update(&self) -> Result<(), VcsError> {
        self.base.run_from_dir(["update"])?;
        Ok(())
    }

    fn update_version(&self, version: &str) -> Result<(), VcsError> {
        self.base.run_from_dir(["update", "-r", version])?;
        Ok(())
    }
}

impl VcsReferences for SvnRepository {
    fn branches(&self) -> Result<Vec<String>, VcsError> {
        Ok(Vec::new())
    }

    fn tags(&self) -> Result<Vec<String>, VcsError> {
        Ok(Vec::new())
    }

    fn is_reference(&self, reference: &str) -> bool {
        self.base.run_from_dir(["log", "-r", reference]).is_ok()
    }
}

impl VcsBackend for SvnRepository {}
