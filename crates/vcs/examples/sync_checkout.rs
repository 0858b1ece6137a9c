//! Example: keep a checkout in sync with its remote
//!
//! Run with: cargo run --example sync_checkout -- repo.toml
//!
//! `repo.toml` holds a [`vcs::VcsConfig`], for example:
//!
//! ```toml
//! remote = "https://github.com/example/project.git"
//! local = "/tmp/project"
//! ```

use std::path::PathBuf;

use vcs::{VcsBackend, VcsConfig, VcsFactory, VcsReferences, VcsRepository, VcsSync};

/// Clone the checkout if missing, otherwise bring it up to date
fn sync(repo: &dyn VcsBackend) -> Result<(), Box<dyn std::error::Error>> {
    if repo.check_local() {
        tracing::info!("Updating {}", repo.description());
        repo.update()?;
    } else {
        tracing::info!("Fetching {}", repo.description());
        repo.get()?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or("usage: sync_checkout <config.toml>")?;

    let config = VcsConfig::load(&config_path)?;
    let repo = VcsFactory::from_config(&config)?;
    sync(repo.as_ref())?;

    println!("{} at {}", repo.vcs_type(), repo.version()?);
    println!("branches: {}", repo.branches()?.join(", "));
    println!("tags: {}", repo.tags()?.join(", "));
    Ok(())
}
