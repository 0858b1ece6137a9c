use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::VcsError;

/// Version control systems with a backend in this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsType {
    Git,
    Hg,
    Svn,
    Bzr,
}

impl VcsType {
    /// All known types, in filesystem detection order
    pub fn all() -> [VcsType; 4] {
        [VcsType::Git, VcsType::Svn, VcsType::Hg, VcsType::Bzr]
    }

    /// Name of the command-line tool
    pub fn program(&self) -> &'static str {
        match self {
            VcsType::Git => "git",
            VcsType::Hg => "hg",
            VcsType::Svn => "svn",
            VcsType::Bzr => "bzr",
        }
    }

    /// Metadata directory that marks a local checkout
    pub fn marker_dir(&self) -> &'static str {
        match self {
            VcsType::Git => ".git",
            VcsType::Hg => ".hg",
            VcsType::Svn => ".svn",
            VcsType::Bzr => ".bzr",
        }
    }
}

impl fmt::Display for VcsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

impl FromStr for VcsType {
    type Err = VcsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "git" => Ok(VcsType::Git),
            "hg" | "mercurial" => Ok(VcsType::Hg),
            "svn" | "subversion" => Ok(VcsType::Svn),
            "bzr" | "bazaar" => Ok(VcsType::Bzr),
            other => Err(VcsError::Config(format!("unknown VCS type: {other}"))),
        }
    }
}
