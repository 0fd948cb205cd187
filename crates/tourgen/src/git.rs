//! Git integration: revision lookup and diff text

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use thiserror::Error;
use tourgen_core::RevisionInfo;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository: {0}")]
    NotARepo(PathBuf),
    #[error("Unknown revision '{0}'")]
    UnknownRevision(String),
    #[error("Git command failed: {0}")]
    CommandFailed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn git(repo_path: &Path) -> Command {
    let mut command = Command::new("git");
    command.arg("-C").arg(repo_path);
    command
}

fn stdout_of(output: Output) -> Result<String, GitError> {
    if !output.status.success() {
        return Err(GitError::CommandFailed(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Check if a directory is a git repository
pub fn is_git_repo(path: &Path) -> bool {
    git(path)
        .arg("rev-parse")
        .arg("--git-dir")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Get the root of the git repository
pub fn get_repo_root(path: &Path) -> Result<PathBuf, GitError> {
    let output = git(path).arg("rev-parse").arg("--show-toplevel").output()?;

    if !output.status.success() {
        return Err(GitError::NotARepo(path.to_path_buf()));
    }

    let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(PathBuf::from(root))
}

/// Resolve a revision to its short hash and subject line
pub fn resolve_revision(repo_path: &Path, revision: &str) -> Result<RevisionInfo, GitError> {
    let exists = git(repo_path)
        .arg("rev-parse")
        .arg("--verify")
        .arg("--quiet")
        .arg(format!("{}^{{commit}}", revision))
        .output()?;

    if !exists.status.success() {
        return Err(GitError::UnknownRevision(revision.to_string()));
    }

    let output = git(repo_path)
        .arg("log")
        .arg("-1")
        .arg("--format=%h%n%s")
        .arg(revision)
        .arg("--")
        .output()?;

    parse_revision_info(&stdout_of(output)?)
        .ok_or_else(|| GitError::CommandFailed(format!("no log entry for '{}'", revision)))
}

/// Unified diff between two revisions, exactly as git prints it
pub fn get_diff_between(repo_path: &Path, from: &str, to: &str) -> Result<String, GitError> {
    let output = git(repo_path)
        .arg("diff")
        .arg("--no-color")
        .arg("--no-ext-diff")
        .arg(from)
        .arg(to)
        .arg("--")
        .output()?;

    stdout_of(output)
}

/// `%h%n%s` output: short hash on the first line, subject on the second
fn parse_revision_info(output: &str) -> Option<RevisionInfo> {
    let mut lines = output.lines();
    let short_hash = lines.next()?.trim();
    if short_hash.is_empty() {
        return None;
    }
    let message = lines.next().unwrap_or("").trim();
    Some(RevisionInfo::new(short_hash, message))
}
