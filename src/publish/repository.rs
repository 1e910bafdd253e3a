use crate::config::validate_repository_id;
use crate::error::{QuizSheetError, Result};
use git2::{ErrorCode, Repository};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// What the publish tool and the image URLs need to know about the
/// enclosing git working tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub root: PathBuf,
    /// `None` on a detached or unborn HEAD.
    pub branch: Option<String>,
    pub origin_url: Option<String>,
    /// `owner/name` when `origin` points at GitHub.
    pub github_id: Option<String>,
}

impl RepositoryInfo {
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::discover(path).map_err(|e| match e.code() {
            ErrorCode::NotFound => QuizSheetError::NotARepository {
                path: path.display().to_string(),
            },
            _ => QuizSheetError::from(e),
        })?;

        Ok(Self::from_repository(&repo))
    }

    pub fn from_repository(repo: &Repository) -> Self {
        let root = repo
            .workdir()
            .unwrap_or_else(|| repo.path())
            .to_path_buf();

        let branch = repo
            .head()
            .ok()
            .filter(|head| head.is_branch())
            .and_then(|head| head.shorthand().map(str::to_string));

        let origin_url = repo
            .find_remote("origin")
            .ok()
            .and_then(|remote| remote.url().map(str::to_string));

        let github_id = origin_url.as_deref().and_then(parse_github_remote);

        Self {
            root,
            branch,
            origin_url,
            github_id,
        }
    }

    pub fn display_summary(&self) -> String {
        format!(
            "Repository: {}\nBranch: {}\nOrigin: {}",
            self.root.display(),
            self.branch.as_deref().unwrap_or("(detached)"),
            self.origin_url.as_deref().unwrap_or("(none)")
        )
    }
}

/// `owner/name` from a GitHub remote in HTTPS, `ssh://` or scp-like form.
pub fn parse_github_remote(remote: &str) -> Option<String> {
    let remote = remote.trim();

    let path = match remote.strip_prefix("git@github.com:") {
        Some(path) => path.to_string(),
        None => {
            let url = Url::parse(remote).ok()?;
            if !matches!(url.scheme(), "https" | "http" | "ssh" | "git") {
                return None;
            }
            if url.host_str()? != "github.com" {
                return None;
            }
            url.path().to_string()
        }
    };

    let mut segments = path.trim_matches('/').split('/');
    let owner = segments.next()?;
    let name = segments.next()?;
    if segments.next().is_some() {
        return None;
    }

    let name = name.strip_suffix(".git").unwrap_or(name);
    let id = format!("{}/{}", owner, name);

    validate_repository_id(&id).ok().map(|_| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_github_remote() {
        let cases = [
            ("https://github.com/octocat/quiz-images", Some("octocat/quiz-images")),
            ("https://github.com/octocat/quiz-images.git", Some("octocat/quiz-images")),
            ("git@github.com:octocat/quiz.git", Some("octocat/quiz")),
            ("ssh://git@github.com/octocat/quiz.git", Some("octocat/quiz")),
            ("https://gitlab.com/octocat/quiz", None),
            ("https://github.com/octocat", None),
            ("https://github.com/octocat/quiz/tree/main", None),
            ("not a url", None),
        ];

        for (remote, expected) in cases {
            assert_eq!(parse_github_remote(remote).as_deref(), expected, "remote: {}", remote);
        }
    }

    #[test]
    fn test_discover_reads_origin() {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::init(temp_dir.path()).unwrap();
        repo.remote("origin", "git@github.com:octocat/quiz.git").unwrap();

        let nested = temp_dir.path().join("pdfs");
        std::fs::create_dir(&nested).unwrap();

        let info = RepositoryInfo::discover(&nested).unwrap();
        assert_eq!(info.github_id.as_deref(), Some("octocat/quiz"));
        assert_eq!(info.origin_url.as_deref(), Some("git@github.com:octocat/quiz.git"));
        assert!(info.display_summary().contains("Origin: git@github.com:octocat/quiz.git"));
    }

    #[test]
    fn test_discover_outside_repository() {
        let temp_dir = TempDir::new().unwrap();
        let result = RepositoryInfo::discover(temp_dir.path());

        // Skipped when the temp dir itself sits inside a working tree.
        if Repository::discover(temp_dir.path()).is_err() {
            assert!(matches!(result, Err(QuizSheetError::NotARepository { .. })));
        }
    }
}
