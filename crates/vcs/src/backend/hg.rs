//! Mercurial backend driving the `hg` command-line tool.

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

/// Mercurial implementation of VCS backend
#[derive(Clone)]
pub struct HgRepository {
    base: RepoBase,
}

impl HgRepository {
    /// Create a handle for `remote` checked out at `local`.
    ///
    /// An existing checkout's `default` path must match `remote`; it is adopted
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
        let detected = ensure_local_vcs(VcsType::Hg, &local)?;

        let mut repo = Self {
            base: RepoBase::new(VcsType::Hg, remote.into(), local, runner),
        };

        if detected && repo.check_local() {
            let out = repo.base.run_from_dir(["paths"])?;
            let configured = parse_default_path(&out);
            let remote = reconcile_remote(repo.base.remote(), configured.as_deref())?;
            repo.base.set_remote(remote);
        }

        Ok(repo)
    }
}

/// Pull the `default = <url>` entry out of `hg paths`
fn parse_default_path(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| line.trim().strip_prefix("default = "))
        .map(|url| url.trim().to_string())
}

impl VcsRepository for HgRepository {
    fn vcs_type(&self) -> VcsType {
        VcsType::Hg
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
        let args: [&OsStr; 4] = [
            OsStr::new("clone"),
            OsStr::new("--"),
            OsStr::new(self.base.remote()),
            self.base.local_path().as_os_str(),
        ];
        self.base.run(args)?;
        Ok(())
    }

    fn version(&self) -> Result<String, VcsError> {
        // --debug makes identify print the full changeset hash
        let out = self.base.run_from_dir(["--debug", "identify"])?;
        out.split_whitespace()
            .next()
            .map(str::to_string)
            .ok_or_else(|| VcsError::InvalidOutput("empty hg identify output".into()))
    }

    fn date(&self) -> Result<DateTime<Utc>, VcsError> {
        let out = self
            .base
            .run_from_dir(["log", "-r", ".", "--template", "{date|isodatesec}"])?;
        parse_iso_seconds(&out)
    }

    fn is_dirty(&self) -> Result<bool, VcsError> {
        let out = self.base.run_from_dir(["diff"])?;
        Ok(!out.trim().is_empty())
    }

    fn ping(&self) -> bool {
        self.base.run(["identify", "--", self.base.remote()]).is_ok()
    }
}

impl VcsSync for HgRepository {
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

impl VcsReferences for HgRepository {
    fn branches(&self) -> Result<Vec<String>, VcsError> {
        let out = self.base.run_from_dir(["branches"])?;
        Ok(reference_list(&out, first_word_pattern()))
    }

    fn tags(&self) -> Result<Vec<String>, VcsError> {
        let out = self.base.run_from_dir(["tags"])?;
        Ok(reference_list(&out, first_word_pattern()))
    }

    fn is_reference(&self, reference: &str) -> bool {
        self.base.run_from_dir(["log", "-r", reference]).is_ok()
    }
}

impl VcsBackend for HgRepository {}
