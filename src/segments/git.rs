use crate::segments::pr::{pr_status, PrStatus};
use crate::utils::run_command;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::debug;

pub const GIT_COMMAND_TIMEOUT: Duration = Duration::from_millis(500);

const HEAD_REF_PREFIX: &str = "ref: refs/heads/";
const GITDIR_PREFIX: &str = "gitdir: ";
const DETACHED_HEAD_HASH_LENGTH: usize = 7;

/// Working tree state relative to HEAD and its upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitStatus {
    pub dirty: bool,
    /// `(ahead, behind)`; `None` when the branch has no upstream.
    pub ahead_behind: Option<(u32, u32)>,
}

impl GitStatus {
    /// `*` for uncommitted changes, `↑n`/`↓n` for divergence. Empty when clean
    /// and in sync.
    pub fn annotation(&self) -> String {
        let mut out = String::new();
        if self.dirty {
            out.push('*');
        }
        if let Some((ahead, behind)) = self.ahead_behind {
            if ahead > 0 {
                out.push_str(&format!("↑{}", ahead));
            }
            if behind > 0 {
                out.push_str(&format!("↓{}", behind));
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitInfo {
    pub branch: String,
    pub status: Option<GitStatus>,
    pub pr: Option<PrStatus>,
}

impl GitInfo {
    /// Branch name followed by status and PR annotations, space separated.
    pub fn summary(&self) -> String {
        let mut parts = vec![self.branch.clone()];
        if let Some(annotation) = self.status.as_ref().map(GitStatus::annotation) {
            if !annotation.is_empty() {
                parts.push(annotation);
            }
        }
        if let Some(pr) = &self.pr {
            parts.push(pr.to_string());
        }
        parts.join(" ")
    }
}

/// Branch, status and PR for `dir`. `None` outside a repository.
pub async fn git_info(dir: &Path, with_pr: bool) -> Option<GitInfo> {
    let branch = branch(dir).await?;
    let status = status(dir).await;
    let pr = if with_pr { pr_status(dir).await } else { None };

    debug!("Git info for {}: branch={}, status={:?}, pr={:?}", dir.display(), branch, status, pr);

    Some(GitInfo { branch, status, pr })
}

/// Current branch, or a short hash when HEAD is detached.
///
/// Reads `.git/HEAD` directly and only falls back to the git binary when
/// that fails.
pub async fn branch(dir: &Path) -> Option<String> {
    match read_head_branch(dir).await {
        Ok(Some(branch)) => return Some(branch),
        Ok(None) => {}
        Err(e) => debug!("Could not read HEAD under {}: {}", dir.display(), e),
    }

    let name = run_command("git", &["rev-parse", "--abbrev-ref", "HEAD"], Some(dir), GIT_COMMAND_TIMEOUT)
        .await
        .filter(|name| !name.is_empty())?;

    if name == "HEAD" {
        return run_command("git", &["rev-parse", "--short=7", "HEAD"], Some(dir), GIT_COMMAND_TIMEOUT)
            .await
            .filter(|hash| !hash.is_empty());
    }
    Some(name)
}

/// Reads HEAD from the repository metadata, following the `gitdir:`
/// indirection used by linked worktrees and submodules.
pub async fn read_head_branch(dir: &Path) -> std::io::Result<Option<String>> {
    let git_dir = resolve_git_dir(dir).await?;
    let head = fs::read_to_string(git_dir.join("HEAD")).await?;
    Ok(parse_head(&head))
}

async fn resolve_git_dir(dir: &Path) -> std::io::Result<PathBuf> {
    let dot_git = dir.join(".git");
    let metadata = fs::metadata(&dot_git).await?;
    if metadata.is_dir() {
        return Ok(dot_git);
    }

    let pointer = fs::read_to_string(&dot_git).await?;
    let target = pointer
        .trim()
        .strip_prefix(GITDIR_PREFIX)
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidData, "malformed .git file"))?;

    let target = Path::new(target.trim());
    Ok(if target.is_absolute() {
        target.to_path_buf()
    } else {
        dir.join(target)
    })
}

/// `ref: refs/heads/<name>` gives the branch; anything else is a detached
/// commit id and yields its short prefix.
pub fn parse_head(content: &str) -> Option<String> {
    let content = content.trim();
    if content.is_empty() {
        return None;
    }
    if let Some(branch) = content.strip_prefix(HEAD_REF_PREFIX) {
        return Some(branch.to_string());
    }
    Some(content.chars().take(DETACHED_HEAD_HASH_LENGTH).collect())
}

/// Dirty flag plus ahead/behind counts. A missing upstream only drops the
/// counts.
pub async fn status(dir: &Path) -> Option<GitStatus> {
    let porcelain = run_command("git", &["status", "--porcelain"], Some(dir), GIT_COMMAND_TIMEOUT).await?;
    let counts = run_command(
        "git",
        &["rev-list", "--left-right", "--count", "HEAD...@{upstream}"],
        Some(dir),
        GIT_COMMAND_TIMEOUT,
    )
    .await;

    Some(GitStatus {
        dirty: !porcelain.is_empty(),
        ahead_behind: counts.as_deref().and_then(parse_ahead_behind),
    })
}

/// Parses `git rev-list --left-right --count HEAD...@{upstream}` output.
pub fn parse_ahead_behind(output: &str) -> Option<(u32, u32)> {
    let mut parts = output.split_whitespace();
    let ahead = parts.next()?.parse().ok()?;
    let behind = parts.next()?.parse().ok()?;
    Some((ahead, behind))
}
