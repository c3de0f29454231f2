use anyhow::{Context, Result, bail};
use git2::Repository;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Trait defining the Git operations required by the configuration importer.
/// This abstraction allows the importer to be tested against canned output.
pub trait GitClient {
    /// Returns the effective configuration as `key=value` lines, the way
    /// `git config --list` prints it.
    fn list_config(&self) -> Result<String>;

    /// Returns the short name of the checked out branch, if HEAD is on one.
    fn head_branch(&self) -> Option<String>;

    /// Returns the .git directory path
    fn git_dir(&self) -> Option<PathBuf>;
}

/// Concrete implementation of GitClient using the git2 crate for repository
/// discovery and the `git` executable for the configuration listing.
pub struct Git2Client {
    repo: Option<Repository>,
}

impl Git2Client {
    /// Discovers the repository containing `path`. Outside of a repository
    /// the client still lists the global and system configuration.
    pub fn discover<P: AsRef<Path>>(path: P) -> Self {
        let repo = Repository::discover(path).ok();
        Self { repo }
    }
}

impl GitClient for Git2Client {
    fn list_config(&self) -> Result<String> {
        let output = Command::new("git")
            .args(["config", "--list"])
            .output()
            .context("Failed to run git config --list")?;

        if !output.status.success() {
            bail!(
                "git config --list failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        String::from_utf8(output.stdout).context("git config --list printed invalid UTF-8")
    }

    fn head_branch(&self) -> Option<String> {
        let head = self.repo.as_ref()?.head().ok()?;
        if !head.is_branch() {
            return None;
        }
        head.shorthand().map(str::to_string)
    }

    fn git_dir(&self) -> Option<PathBuf> {
        self.repo.as_ref().map(|repo| repo.path().to_path_buf())
    }
}

/// What the importer learned about the repository while reading its
/// configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepoInfo {
    pub git_dir: Option<PathBuf>,
    pub work_tree: Option<PathBuf>,
    /// Branch checked out at HEAD.
    pub head: String,
    /// Upstream of `head` as `remote/branch`.
    pub remote: String,
    pub editor: String,
    pub encoding: String,
}
