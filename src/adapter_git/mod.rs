use std::path::PathBuf;

use anyhow::Context;

/// Length of a full SHA-1 commit hash.
const SHA_LENGTH: usize = 40;

/// Resolves tags with the system `git` binary inside the build directory.
#[derive(Clone, Debug)]
pub struct SystemGit {
    work_dir: PathBuf,
}

impl SystemGit {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    fn git_cmd(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new("git");
        cmd.current_dir(&self.work_dir)
            .stdin(std::process::Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

/// Validate the output of `git rev-list -n 1` and extract the commit hash.
fn parse_commit(stdout: &str) -> anyhow::Result<String> {
    let sha = stdout.trim();
    if sha.len() != SHA_LENGTH {
        anyhow::bail!("git sha had unexpected length: {sha:?}");
    }
    Ok(sha.to_string())
}

impl crate::domain::prelude::CommitResolver for SystemGit {
    #[tracing::instrument(skip(self), fields(work_dir = ?self.work_dir), err(Debug))]
    async fn resolve_commit(&self, tag: &str) -> anyhow::Result<String> {
        let output = self
            .git_cmd()
            .args(["rev-list", "-n", "1", tag])
            .output()
            .await
            .context("unable to execute git rev-list")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "error getting git sha @{tag:?} ({}): {}",
                output.status,
                stderr.trim()
            );
        }

        let sha = parse_commit(&String::from_utf8_lossy(&output.stdout))?;
        tracing::debug!(sha = %sha, "resolved tag");
        Ok(sha)
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{SystemGit, parse_commit};
    use crate::domain::prelude::CommitResolver;

    const SHA: &str = "0123456789abcdef0123456789abcdef01234567";

    fn git(dir: &Path, args: &[&str]) -> String {
        let output = std::process::Command::new("git")
            .current_dir(dir)
            .args(["-c", "user.name=shipbot", "-c", "user.email=shipbot@localhost"])
            .args(["-c", "commit.gpgsign=false", "-c", "tag.gpgsign=false"])
            .args(args)
            .output()
            .unwrap();
        assert!(output.status.success(), "git {args:?} failed: {output:?}");
        String::from_utf8(output.stdout).unwrap().trim().to_string()
    }

    /// Repository with a single commit tagged `v1.0.0`, returns its path and
    /// the commit hash.
    fn tagged_repository() -> (temp_file::TempFile, PathBuf, String) {
        let marker = temp_file::empty();
        let root = marker.path().with_extension("git");
        std::fs::create_dir_all(&root).unwrap();
        git(&root, &["init", "--quiet"]);
        git(&root, &["commit", "--quiet", "--allow-empty", "-m", "init"]);
        git(&root, &["tag", "-a", "v1.0.0", "-m", "v1.0.0"]);
        let head = git(&root, &["rev-parse", "HEAD"]);
        (marker, root, head)
    }

    #[tokio::test]
    async fn should_resolve_annotated_tag_to_commit() {
        let (_marker, root, head) = tagged_repository();

        let sha = SystemGit::new(&root).resolve_commit("v1.0.0").await.unwrap();

        assert_eq!(sha, head);
        assert_eq!(sha.len(), 40);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn should_report_git_stderr_for_unknown_tag() {
        let (_marker, root, _) = tagged_repository();

        let err = SystemGit::new(&root)
            .resolve_commit("v9.9.9")
            .await
            .unwrap_err();

        let message = format!("{err:#}");
        assert!(message.starts_with("error getting git sha @\"v9.9.9\""), "{message}");
        let (_, stderr) = message.split_once("): ").unwrap();
        assert!(stderr.contains("v9.9.9"), "{message}");
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn should_accept_full_sha() {
        assert_eq!(parse_commit(SHA).unwrap(), SHA);
    }

    #[test]
    fn should_trim_trailing_newline() {
        assert_eq!(parse_commit(&format!("{SHA}\n")).unwrap(), SHA);
    }

    #[test]
    fn should_reject_empty_output() {
        assert!(parse_commit("").is_err());
        assert!(parse_commit("\n").is_err());
    }

    #[test]
    fn should_reject_wrong_length() {
        assert!(parse_commit(&SHA[..39]).is_err());
        assert!(parse_commit(&format!("{SHA}8")).is_err());
    }
}
