//! Download or refresh the poetry repository

use std::path::Path;
use std::process::Command;
use tracing::{info, warn};

/// Outcome of a fetch, shown to the user as-is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchStatus {
    pub ok: bool,
    pub message: String,
}

impl FetchStatus {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

pub trait CorpusFetcher {
    /// Clone `url` into `local_path`, or update it when it already exists
    fn fetch(&self, url: &str, local_path: &Path) -> FetchStatus;
}

/// Fetcher backed by the `git` command line
#[derive(Debug, Clone)]
pub struct GitFetcher {
    program: String,
}

impl Default for GitFetcher {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
        }
    }
}

impl GitFetcher {
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[&str], done: &str) -> FetchStatus {
        match Command::new(&self.program).args(args).output() {
            Ok(output) if output.status.success() => {
                info!(program = %self.program, ?args, "{}", done);
                FetchStatus::success(done)
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                warn!(program = %self.program, ?args, %stderr, "git command failed");
                FetchStatus::failure(format!("git failed: {}", stderr))
            }
            Err(err) => {
                warn!(program = %self.program, error = %err, "git unavailable");
                FetchStatus::failure(format!("could not run {}: {}", self.program, err))
            }
        }
    }
}

impl CorpusFetcher for GitFetcher {
    fn fetch(&self, url: &str, local_path: &Path) -> FetchStatus {
        let target = local_path.to_string_lossy();
        if local_path.exists() {
            self.run(&["-C", &target, "pull"], "repository updated")
        } else {
            self.run(&["clone", "--depth", "1", url, &target], "repository cloned")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_failed_status() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = GitFetcher::with_program("definitely-not-a-real-git-binary");
        let status = fetcher.fetch("https://example.invalid/repo.git", &dir.path().join("repo"));
        assert!(!status.ok);
        assert!(status.message.contains("definitely-not-a-real-git-binary"));
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_dir_is_pulled_missing_dir_is_cloned() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = GitFetcher::with_program("true");
        assert_eq!(fetcher.fetch("u", dir.path()).message, "repository updated");
        let status = fetcher.fetch("u", &dir.path().join("fresh"));
        assert!(status.ok);
        assert_eq!(status.message, "repository cloned");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_failed_status() {
        let dir = tempfile::tempdir().unwrap();
        let status = GitFetcher::with_program("false").fetch("u", dir.path());
        assert!(!status.ok);
        assert!(status.message.starts_with("git failed"));
    }
}
