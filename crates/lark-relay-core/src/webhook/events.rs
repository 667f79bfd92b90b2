//! Typed views of the GitHub webhook payloads the relay understands.
//!
//! Only the fields used to build cards are modelled. Fields GitHub always
//! sends for an event are required so that a truncated or hand-crafted
//! payload fails deserialization and is answered with `400 Bad Request`.

use serde::Deserialize;

/// Repository the event belongs to
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub full_name: String,
}

/// A GitHub user reference (`sender`, release `author`)
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub login: String,
}

/// Git identity attached to a push
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitIdentity {
    #[serde(default)]
    pub name: Option<String>,
}

/// Commit summary inside a push payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Commit {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub author: Option<GitIdentity>,
}

impl Commit {
    /// Author name, if GitHub supplied one
    pub fn author_name(&self) -> Option<&str> {
        self.author
            .as_ref()
            .and_then(|a| a.name.as_deref())
            .filter(|name| !name.is_empty())
    }
}

/// `push` event
#[derive(Debug, Clone, Deserialize)]
pub struct PushEvent {
    #[serde(rename = "ref", default)]
    pub git_ref: Option<String>,

    pub repository: Repository,

    pub pusher: GitIdentity,

    #[serde(default)]
    pub commits: Vec<Commit>,

    #[serde(default)]
    pub head_commit: Option<Commit>,

    #[serde(default)]
    pub compare: Option<String>,
}

/// Issue summary inside an `issues` payload
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub html_url: String,

    #[serde(default)]
    pub body: Option<String>,
}

/// `issues` event
#[derive(Debug, Clone, Deserialize)]
pub struct IssuesEvent {
    pub action: String,
    pub issue: Issue,
    pub repository: Repository,
    pub sender: Account,
}

/// Branch pointer on either side of a pull request
#[derive(Debug, Clone, Deserialize)]
pub struct BranchRef {
    #[serde(rename = "ref")]
    pub name: String,
}

/// Pull request summary inside a `pull_request` payload
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub html_url: String,

    #[serde(default)]
    pub body: Option<String>,

    pub head: BranchRef,
    pub base: BranchRef,

    #[serde(default)]
    pub merged: Option<bool>,
}

/// `pull_request` event
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    pub action: String,
    pub pull_request: PullRequest,
    pub repository: Repository,
    pub sender: Account,
}

/// Release summary inside a `release` payload
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    pub html_url: String,
    pub author: Account,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub body: Option<String>,
}

/// `release` event
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseEvent {
    pub action: String,
    pub release: Release,
    pub repository: Repository,
}
