//! Session and issue records the modals operate on.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::modals::session_actions::MergeMethod;

/// Lifecycle of a worktree session as shown in the session list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Idle,
    Running,
    InReview,
}

impl SessionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::InReview => "in review",
        }
    }
}

/// A git worktree with an agent task attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub name: String,
    pub repo: String,
    pub base: String,
    /// Branch created for the worktree; `None` while the agent picks one.
    pub branch: Option<String>,
    pub autonomous: bool,
    pub container: bool,
    pub status: SessionStatus,
    pub pull_request: Option<MergeMethod>,
    pub linked_issues: Vec<u64>,
    pub last_prompt: Option<String>,
}

/// Tracker issue offered by the issue picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Read the issue list from a JSON file (an array of issues).
pub fn load_issues(path: &Path) -> Result<Vec<Issue>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read issues from {}", path.display()))?;
    let issues: Vec<Issue> = serde_json::from_str(&contents)
        .with_context(|| format!("invalid issue file {}", path.display()))?;
    Ok(issues)
}

/// Derive a session name from a repo path and branch.
pub fn session_name(repo: &str, branch: Option<&str>) -> String {
    let repo_name = repo
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(repo);
    match branch {
        Some(branch) => format!("{repo_name}:{branch}"),
        None => format!("{repo_name}:auto"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_session_name_uses_last_path_component() {
        assert_eq!(
            session_name("~/code/arbor/", Some("fix-scroll")),
            "arbor:fix-scroll"
        );
        assert_eq!(session_name("widgets", None), "widgets:auto");
    }

    #[test]
    fn test_load_issues_parses_json_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"number": 12, "title": "Scroll jumps"}}, {{"number": 7, "title": "Tab skips", "labels": ["ui"]}}]"#
        )
        .unwrap();

        let issues = load_issues(file.path()).unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].number, 12);
        assert!(issues[0].labels.is_empty());
        assert_eq!(issues[1].labels, vec!["ui".to_string()]);
    }

    #[test]
    fn test_load_issues_reports_missing_file() {
        let err = load_issues(Path::new("/nonexistent/issues.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read issues"));
    }

    #[test]
    fn test_load_issues_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let err = load_issues(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid issue file"));
    }
}
