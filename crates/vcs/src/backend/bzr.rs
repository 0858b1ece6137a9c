//! Bazaar backend driving the `bzr` command-line tool.
//!
//! Bazaar branches live in separate directories, so only tags are listed.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{default_runner, ensure_local_vcs, parse_iso_seconds, reconcile_remote, RepoBase};
use crate::command::CommandRunner;
use crate::error::VcsError;
use crate::refs::{first_word_pattern, reference_list};
use crate::traits::*;
use crate::types::VcsType;

/// Bazaar implementation of VCS backend
#[derive(Clone)]
pub struct BzrRepository {
    base: RepoBase,
}

impl BzrRepository {
    /// Create a handle for `remote` branched at `local`.
    ///
    /// An existing branch's parent location must match `remote`; it is adopted
    /// when `remote` is empty.
    pub fn new(remote: impl Into<String>, local: impl Into<PathBuf>) -> Result<Self, VcsError> {
        Self::with_runner(remote, local, default_runner())
    }

    pub fn with_runner(
        remote: impl Into<String>,
        local: impl Into<PathBuf>,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Self, VcsError> {
        let local = local.into();
        let detected = ensure_local_vcs(VcsType::Bzr, &local)?;

        let mut repo = Self {
            base: RepoBase::new(VcsType::Bzr, remote.into(), local, runner),
        };

        if detected && repo.check_local() {
            let out = repo.base.run_from_dir(["info"])?;
            let configured = parse_parent_branch(&out);
            let remote = reconcile_remote(repo.base.remote(), configured.as_deref())?;
            repo.base.set_remote(remote);
        }

        Ok(repo)
    }
}

/// Pull the `parent branch: <url>` line out of `bzr info`
fn parse_parent_branch(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| line.trim().strip_prefix("parent branch: "))
        .map(|url| url.trim().to_string())
}

impl VcsRepository for BzrRepository {
    fn vcs_type(&self) -> VcsType {
        VcsType::Bzr
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
        // bzr branch does not create missing parent directories
        if let Some(parent) = self.base.local_path().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let args: [&OsStr; 4] = [
            OsStr::new("branch"),
            OsStr::new("--"),
            OsStr::new(self.base.remote()),
            self.base.local_path().as_os_str(),
        ];
        self.base.run(args)?;
        Ok(())
    }

    fn version(&self) -> Result<String, VcsError> {
        let out = self.base.run_from_dir(["revno", "--tree"])?;
        Ok(out.trim().to_string())
    }

    fn date(&self) -> Result<DateTime<Utc>, VcsError> {
        let out = self
            .base
            .run_from_dir(["version-info", "--custom", "--template={date}"])?;
        parse_iso_seconds(&out)
    }

    fn is_dirty(&self) -> Result<bool, VcsError> {
        // bzr diff exits non-zero when there are differences
        match self.base.run_from_dir(["diff"]) {
            Ok(out) => Ok(!out.trim().is_empty()),
            Err(VcsError::CommandFailed { .. }) => Ok(true),
            Err(e) => Err(e),
        }
    }

    fn ping(&self) -> bool {
        self.base.run(["info", "--", self.base.remote()]).is_ok()
    }
}

impl VcsSync for BzrRepository {
    fn update(&self) -> Result<(), VcsError> {
        self.base.run_from_dir(["pull"])?;
        self.base.run_from_dir(["update"])?;
        Ok(())
    }

    fn update_version(&self, version: &str) -> Result<(), VcsError> {
        self.base.run_from_dir(["update", "-r", version])?;
        Ok(())
    }
}

impl VcsReferences for BzrRepository {
    fn branches(&self) -> Result<Vec<String>, VcsError> {
        Ok(Vec::new())
    }

    fn tags(&self) -> Result<Vec<String>, VcsError> {
        let out = self.base.run_from_dir(["tags"])?;
        Ok(reference_list(&out, first_word_pattern()))
    }

    fn is_reference(&self, reference: &str) -> bool {
        self.base.run_from_dir(["revno", "-r", reference]).is_ok()
    }
}

impl VcsBackend for BzrRepository {}
