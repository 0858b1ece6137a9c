use crate::backend::bzr::BzrRepository;
use crate::backend::git::{GitRepository, DEFAULT_REMOTE_NAME};
use crate::backend::hg::HgRepository;
use crate::backend::svn::SvnRepository;
use crate::backend::default_runner;
use crate::command::CommandRunner;
use crate::detect::{detect_vcs_from_fs, detect_vcs_from_remote};
use crate::error::VcsError;
use crate::traits::VcsBackend;
use crate::types::VcsType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Configuration for a VCS checkout
///
/// Usually read from TOML:
///
/// ```toml
/// vcs = "git"
/// remote = "https://github.com/example/project.git"
/// local = "/srv/checkouts/project"
/// remote_name = "origin"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcsConfig {
    /// Backend to use; detected from the checkout or remote when absent
    #[serde(default)]
    pub vcs: Option<VcsType>,
    /// Remote location; empty means "use whatever the checkout is configured for"
    #[serde(default)]
    pub remote: String,
    /// Local checkout path
    pub local: PathBuf,
    /// Remote tracking name (Git only)
    #[serde(default = "default_remote_name")]
    pub remote_name: String,
}

fn default_remote_name() -> String {
    DEFAULT_REMOTE_NAME.to_string()
}

impl VcsConfig {
    pub fn new(vcs: Option<VcsType>, remote: impl Into<String>, local: impl Into<PathBuf>) -> Self {
        Self {
            vcs,
            remote: remote.into(),
            local: local.into(),
            remote_name: default_remote_name(),
        }
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, VcsError> {
        toml::from_str(content).map_err(|e| VcsError::Config(e.to_string()))
    }

    /// Read a TOML configuration file
    pub fn load(path: &Path) -> Result<Self, VcsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// Factory for creating VCS backends
pub struct VcsFactory;

impl VcsFactory {
    /// Create a backend of the given type
    pub fn create(
        vcs: VcsType,
        remote: &str,
        local: &Path,
    ) -> Result<Box<dyn VcsBackend>, VcsError> {
        Self::create_with_runner(vcs, remote, local, default_runner())
    }

    /// Create a backend that runs its commands through `runner`
    pub fn create_with_runner(
        vcs: VcsType,
        remote: &str,
        local: &Path,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Box<dyn VcsBackend>, VcsError> {
        Self::build(vcs, remote, local, DEFAULT_REMOTE_NAME, runner)
    }

    /// Create a backend from configuration, detecting the type when unset
    pub fn from_config(config: &VcsConfig) -> Result<Box<dyn VcsBackend>, VcsError> {
        let vcs = match config.vcs {
            Some(vcs) => vcs,
            None => Self::detect_with_remote(&config.remote, &config.local)?,
        };
        Self::build(
            vcs,
            &config.remote,
            &config.local,
            &config.remote_name,
            default_runner(),
        )
    }

    /// Auto-detect backend from existing checkout
    pub fn detect(path: &Path) -> Result<VcsType, VcsError> {
        detect_vcs_from_fs(path)
    }

    /// Create a backend by auto-detecting the type.
    ///
    /// The local checkout decides when present, otherwise the remote URL.
    pub fn auto_detect(remote: &str, local: &Path) -> Result<Box<dyn VcsBackend>, VcsError> {
        let vcs = Self::detect_with_remote(remote, local)?;
        Self::create(vcs, remote, local)
    }

    fn detect_with_remote(remote: &str, local: &Path) -> Result<VcsType, VcsError> {
        match detect_vcs_from_fs(local) {
            Ok(vcs) => Ok(vcs),
            Err(_) if !remote.is_empty() => detect_vcs_from_remote(remote),
            Err(e) => Err(e),
        }
    }

    fn build(
        vcs: VcsType,
        remote: &str,
        local: &Path,
        remote_name: &str,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Box<dyn VcsBackend>, VcsError> {
        tracing::debug!("Creating {} backend for {}", vcs, local.display());

        match vcs {
            VcsType::Git => {
                let repo = GitRepository::with_runner(remote, local, runner)?
                    .with_remote_name(remote_name);
                Ok(Box::new(repo))
            }
            VcsType::Hg => Ok(Box::new(HgRepository::with_runner(remote, local, runner)?)),
            VcsType::Svn => Ok(Box::new(SvnRepository::with_runner(remote, local, runner)?)),
            VcsType::Bzr => Ok(Box::new(BzrRepository::with_runner(remote, local, runner)?)),
        }
    }
}
