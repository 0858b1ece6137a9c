//! VCS Abstraction Layer
//!
//! This crate provides a trait-based abstraction over version control systems,
//! supporting Git, Mercurial, Subversion and Bazaar by driving their
//! command-line tools.
//!
//! # Design Goals
//!
//! - **Clean trait interface**: Operations are grouped by concern
//! - **Explicit working directories**: Commands never change the process cwd
//! - **Testable parsing**: Output scraping is separate from process handling
//!
//! # Example
//!
//! ```no_run
//! use vcs::{VcsFactory, VcsRepository, VcsSync, VcsType};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = VcsFactory::create(
//!     VcsType::Git,
//!     "https://github.com/example/project.git",
//!     Path::new("/path/to/checkout"),
//! )?;
//!
//! if repo.check_local() {
//!     repo.update()?;
//! } else {
//!     repo.get()?;
//! }
//! println!("Checked out: {}", repo.version()?);
//! # Ok(())
//! # }
//! ```

mod backend;
mod command;
mod detect;
mod error;
mod factory;
mod refs;
mod traits;
mod types;

pub use backend::bzr::BzrRepository;
pub use backend::git::{GitRepository, DEFAULT_REMOTE_NAME};
pub use backend::hg::HgRepository;
pub use backend::svn::SvnRepository;
pub use command::{CommandRunner, SystemRunner};
pub use detect::{detect_vcs_from_fs, detect_vcs_from_remote};
pub use error::VcsError;
pub use factory::{VcsConfig, VcsFactory};
pub use refs::{branch_pattern, first_word_pattern, reference_list, tag_pattern};
pub use traits::{VcsBackend, VcsReferences, VcsRepository, VcsSync};
pub use types::VcsType;
