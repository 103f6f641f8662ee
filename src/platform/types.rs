/// An open pull request as seen by the reaper.
#[derive(Debug, Clone)]
pub struct PullRequestSummary {
    pub number: u64,
    pub title: String,
    pub head_branch: String,
}

/// A pull request this bot just opened.
#[derive(Debug, Clone)]
pub struct PullRequest {
    pub number: u64,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct CreatePullRequest {
    pub title: String,
    pub body: String,
    pub head_branch: String,
    pub base_branch: String,
}

/// State of a path on a branch. Lookup failures other than "not found"
/// travel in the surrounding `Result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteFile {
    Absent,
    Present {
        content: String,
        /// Blob SHA; must accompany any update of this path.
        revision: String,
    },
}

/// A single-file commit onto a branch.
#[derive(Debug, Clone)]
pub struct WriteFile {
    pub path: String,
    pub content: String,
    pub branch: String,
    pub message: String,
    /// `None` creates the file; `Some` updates it only if it still has this revision.
    pub revision: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchDeletion {
    Deleted,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestClosure {
    Closed,
    NotFound,
}
