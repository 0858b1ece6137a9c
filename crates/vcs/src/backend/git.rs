//! Git backend implementation for VCS abstraction layer
//!
//! This module drives the `git` command-line tool to implement the VCS traits.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{default_runner, ensure_local_vcs, parse_iso_seconds, reconcile_remote, RepoBase};
use crate::command::CommandRunner;
use crate::error::VcsError;
use crate::refs::{branch_pattern, reference_list, tag_pattern};
use crate::traits::*;
use crate::types::VcsType;

/// Remote tracking name used unless overridden
pub const DEFAULT_REMOTE_NAME: &str = "origin";

/// Git implementation of VCS backend
#[derive(Clone)]
pub struct GitRepository {
    base: RepoBase,
    remote_name: String,
}

impl GitRepository {
    /// Create a handle for `remote` checked out at `local`.
    ///
    /// When `local` already holds a Git checkout its configured remote is
    /// checked against `remote`, or adopted when `remote` is empty.
    pub fn new(remote: impl Into<String>, local: impl Into<PathBuf>) -> Result<Self, VcsError> {
        Self::with_runner(remote, local, default_runner())
    }

    /// Like [`GitRepository::new`], running commands through `runner`
    pub fn with_runner(
        remote: impl Into<String>,
        local: impl Into<PathBuf>,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Self, VcsError> {
        let local = local.into();
        let detected = ensure_local_vcs(VcsType::Git, &local)?;

        let mut repo = Self {
            base: RepoBase::new(VcsType::Git, remote.into(), local, runner),
            remote_name: DEFAULT_REMOTE_NAME.to_string(),
        };

        if detected && repo.check_local() {
            let key = format!("remote.{}.url", repo.remote_name);
            let configured = repo.base.run_from_dir(["config", "--get", key.as_str()])?;
            let remote = reconcile_remote(repo.base.remote(), Some(&configured))?;
            repo.base.set_remote(remote);
        }

        Ok(repo)
    }

    /// Track branches under a remote other than `origin`
    pub fn with_remote_name(mut self, remote_name: impl Into<String>) -> Self {
        self.remote_name = remote_name.into();
        self
    }

    /// Local alias of the tracked remote
    pub fn remote_name(&self) -> &str {
        &self.remote_name
    }

    fn show_ref(&self) -> Result<String, VcsError> {
        self.base.run_from_dir(["show-ref"])
    }
}

// ============================================================================
// VcsRepository Implementation
// ============================================================================

impl VcsRepository for GitRepository {
    fn vcs_type(&self) -> VcsType {
        VcsType::Git
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
        let out = self.base.run_from_dir(["rev-parse", "HEAD"])?;
        Ok(out.trim().to_string())
    }

    fn date(&self) -> Result<DateTime<Utc>, VcsError> {
        let out = self
            .base
            .run_from_dir(["log", "-1", "--date=iso", "--pretty=format:%cd"])?;
        parse_iso_seconds(&out)
    }

    fn is_dirty(&self) -> Result<bool, VcsError> {
        let out = self.base.run_from_dir(["diff"])?;
        Ok(!out.trim().is_empty())
    }

    fn ping(&self) -> bool {
        self.base.run(["ls-remote", "--", self.base.remote()]).is_ok()
    }
}

// ============================================================================
// VcsSync Implementation
// ============================================================================

impl VcsSync for GitRepository {
    fn update(&self) -> Result<(), VcsError> {
        // Fetch first so the pull works against current remote refs
        self.base.run_from_dir(["fetch", self.remote_name.as_str()])?;
        self.base.run_from_dir(["pull"])?;
        Ok(())
    }

    fn update_version(&self, version: &str) -> Result<(), VcsError> {
        self.base
            .run_from_dir(["checkout", "--end-of-options", version])?;
        Ok(())
    }
}

// ============================================================================
// VcsReferences Implementation
// ============================================================================

impl VcsReferences for GitRepository {
    fn branches(&self) -> Result<Vec<String>, VcsError> {
        let out = self.show_ref()?;
        Ok(reference_list(&out, &branch_pattern(&self.remote_name)?))
    }

    fn tags(&self) -> Result<Vec<String>, VcsError> {
        let out = self.show_ref()?;
        Ok(reference_list(&out, tag_pattern()))
    }

    fn is_reference(&self, reference: &str) -> bool {
        if self
            .base
            .run_from_dir(["rev-parse", "--verify", "--end-of-options", reference])
            .is_ok()
        {
            return true;
        }

        // Branches that only exist on the remote so far
        let remote_ref = format!("{}/{}", self.remote_name, reference);
        self.base
            .run_from_dir(["rev-parse", "--verify", "--end-of-options", remote_ref.as_str()])
            .is_ok()
    }
}

impl VcsBackend for GitRepository {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::fake::FakeRunner;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn setup_checkout() -> TempDir {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(".git")).unwrap();
        temp
    }

    fn handle(runner: &FakeRunner, remote: &str, local: &Path) -> Result<GitRepository, VcsError> {
        GitRepository::with_runner(remote, local, Arc::new(runner.clone()))
    }

    #[test]
    fn test_new_without_checkout_runs_nothing() {
        let temp = TempDir::new().unwrap();
        let runner = FakeRunner::new();
        let repo = handle(&runner, "https://example.com/r.git", &temp.path().join("r")).unwrap();

        assert_eq!(repo.remote(), "https://example.com/r.git");
        assert_eq!(repo.remote_name(), "origin");
        assert!(!repo.check_local());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_new_rejects_other_vcs() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(".hg")).unwrap();
        let runner = FakeRunner::new();

        let err = handle(&runner, "", temp.path()).err().unwrap();
        assert!(matches!(
            err,
            VcsError::WrongVcs {
                expected: VcsType::Git,
                found: VcsType::Hg,
                ..
            }
        ));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_new_adopts_configured_remote() {
        let temp = setup_checkout();
        let runner = FakeRunner::new().reply_ok("https://example.com/adopted.git\n");

        let repo = handle(&runner, "", temp.path()).unwrap();
        assert_eq!(repo.remote(), "https://example.com/adopted.git");

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].line(), "git config --get remote.origin.url");
        assert_eq!(calls[0].dir.as_deref(), Some(temp.path()));
    }

    #[test]
    fn test_new_rejects_mismatched_remote() {
        let temp = setup_checkout();
        let runner = FakeRunner::new().reply_ok("https://example.com/other.git\n");

        let err = handle(&runner, "https://example.com/mine.git", temp.path())
            .err()
            .unwrap();
        match err {
            VcsError::WrongRemote {
                requested,
                configured,
            } => {
                assert_eq!(requested, "https://example.com/mine.git");
                assert_eq!(configured, "https://example.com/other.git");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_new_rejects_remote_when_configured_url_is_empty() {
        let temp = setup_checkout();
        let runner = FakeRunner::new().reply_ok("\n");

        let err = handle(&runner, "https://example.com/mine.git", temp.path())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            VcsError::WrongRemote { ref configured, .. } if configured.is_empty()
        ));
    }

    #[test]
    fn test_option_like_identifiers_stay_arguments() {
        let temp = TempDir::new().unwrap();
        let runner = FakeRunner::new().reply_ok("").reply_err("").reply_err("");
        let repo = handle(&runner, "--upload-pack=touch /tmp/x", temp.path()).unwrap();

        repo.update_version("--orphan=evil").unwrap();
        assert!(!repo.is_reference("--all"));
        assert_eq!(
            runner.lines(),
            vec![
                "git checkout --end-of-options --orphan=evil",
                "git rev-parse --verify --end-of-options --all",
                "git rev-parse --verify --end-of-options origin/--all",
            ]
        );

        repo.ping();
        assert_eq!(
            runner.calls()[3].args,
            vec!["ls-remote", "--", "--upload-pack=touch /tmp/x"]
        );
    }

    #[test]
    fn test_new_propagates_config_failure() {
        let temp = setup_checkout();
        let runner = FakeRunner::new().reply_err("");

        let err = handle(&runner, "", temp.path()).err().unwrap();
        assert!(err.is_command_failure());
    }

    #[test]
    fn test_get_clones_remote_into_local() {
        let temp = TempDir::new().unwrap();
        let local = temp.path().join("checkout");
        let runner = FakeRunner::new();
        let repo = handle(&runner, "https://example.com/r.git", &local).unwrap();

        repo.get().unwrap();

        let calls = runner.calls();
        assert_eq!(
            calls[0].args,
            vec![
                "clone".to_string(),
                "--".to_string(),
                "https://example.com/r.git".to_string(),
                local.display().to_string()
            ]
        );
        assert_eq!(calls[0].dir, None);
    }

    #[test]
    fn test_update_fetches_then_pulls() {
        let temp = TempDir::new().unwrap();
        let runner = FakeRunner::new();
        let repo = handle(&runner, "r", temp.path())
            .unwrap()
            .with_remote_name("upstream");

        repo.update().unwrap();
        assert_eq!(runner.lines(), vec!["git fetch upstream", "git pull"]);
    }

    #[test]
    fn test_update_stops_after_failed_fetch() {
        let temp = TempDir::new().unwrap();
        let runner = FakeRunner::new().reply_err("fatal: unable to access remote");
        let repo = handle(&runner, "r", temp.path()).unwrap();

        let err = repo.update().unwrap_err();
        match err {
            VcsError::CommandFailed { command, output } => {
                assert_eq!(command, "git fetch origin");
                assert_eq!(output, "fatal: unable to access remote");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(runner.lines(), vec!["git fetch origin"]);
    }

    #[test]
    fn test_update_returns_pull_error() {
        let temp = TempDir::new().unwrap();
        let runner = FakeRunner::new().reply_ok("").reply_err("merge conflict");
        let repo = handle(&runner, "r", temp.path()).unwrap();

        let err = repo.update().unwrap_err();
        assert!(matches!(err, VcsError::CommandFailed { ref command, .. } if command == "git pull"));
    }

    #[test]
    fn test_update_version_passes_identifier_through() {
        let temp = TempDir::new().unwrap();
        let runner = FakeRunner::new();
        let repo = handle(&runner, "r", temp.path()).unwrap();

        repo.update_version("v1.2.3").unwrap();
        assert_eq!(runner.lines(), vec!["git checkout --end-of-options v1.2.3"]);
    }

    #[test]
    fn test_version_is_trimmed() {
        let temp = TempDir::new().unwrap();
        let runner =
            FakeRunner::new().reply_ok("  0123456789abcdef0123456789abcdef01234567\n");
        let repo = handle(&runner, "r", temp.path()).unwrap();

        assert_eq!(
            repo.version().unwrap(),
            "0123456789abcdef0123456789abcdef01234567"
        );
        assert_eq!(runner.lines(), vec!["git rev-parse HEAD"]);
    }

    #[test]
    fn test_version_propagates_failure() {
        let temp = TempDir::new().unwrap();
        let runner = FakeRunner::new().reply_err("fatal: not a git repository");
        let repo = handle(&runner, "r", temp.path()).unwrap();

        assert!(repo.version().is_err());
    }

    #[test]
    fn test_branches_and_tags() {
        let show_ref = "abc123 refs/remotes/origin/main\n\
                        def456 refs/remotes/origin/feature/x\n\
                        abc123 refs/tags/v1.0.0\n";
        let temp = TempDir::new().unwrap();
        let runner = FakeRunner::new().reply_ok(show_ref).reply_ok(show_ref);
        let repo = handle(&runner, "r", temp.path()).unwrap();

        assert_eq!(repo.branches().unwrap(), vec!["main", "feature/x"]);
        assert_eq!(repo.tags().unwrap(), vec!["v1.0.0"]);
        assert_eq!(runner.lines(), vec!["git show-ref", "git show-ref"]);
    }

    #[test]
    fn test_branches_error_is_returned() {
        let temp = TempDir::new().unwrap();
        let runner = FakeRunner::new().reply_err("boom");
        let repo = handle(&runner, "r", temp.path()).unwrap();

        assert!(repo.branches().is_err());
    }

    #[test]
    fn test_date() {
        let temp = TempDir::new().unwrap();
        let runner = FakeRunner::new().reply_ok("2023-11-14 22:13:20 +0000");
        let repo = handle(&runner, "r", temp.path()).unwrap();

        assert_eq!(
            repo.date().unwrap(),
            Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap()
        );
    }

    #[test]
    fn test_is_dirty() {
        let temp = TempDir::new().unwrap();
        let runner = FakeRunner::new()
            .reply_ok("")
            .reply_ok("diff --git a/f b/f\n");
        let repo = handle(&runner, "r", temp.path()).unwrap();

        assert!(!repo.is_dirty().unwrap());
        assert!(repo.is_dirty().unwrap());
    }

    #[test]
    fn test_is_reference_falls_back_to_remote_branch() {
        let temp = TempDir::new().unwrap();
        let runner = FakeRunner::new()
            .reply_err("fatal: Needed a single revision")
            .reply_ok("abc123\n");
        let repo = handle(&runner, "r", temp.path()).unwrap();

        assert!(repo.is_reference("feature"));
        assert_eq!(
            runner.lines(),
            vec![
                "git rev-parse --verify --end-of-options feature",
                "git rev-parse --verify --end-of-options origin/feature"
            ]
        );
    }

    #[test]
    fn test_ping() {
        let temp = TempDir::new().unwrap();
        let runner = FakeRunner::new().reply_ok("").reply_err("not found");
        let repo = handle(&runner, "https://example.com/r.git", temp.path()).unwrap();

        assert!(repo.ping());
        assert!(!repo.ping());
        assert_eq!(
            runner.calls()[0].line(),
            "git ls-remote -- https://example.com/r.git"
        );
    }

    #[test]
    fn test_description() {
        let temp = TempDir::new().unwrap();
        let repo = handle(&FakeRunner::new(), "", temp.path()).unwrap();
        assert!(repo.description().starts_with("git checkout at "));
    }
}
