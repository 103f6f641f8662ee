pub mod github;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;

use crate::error::Result;
use types::*;

/// Branch, file and pull request operations against a single repository.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Commit SHA at the tip of `branch`, or `None` if the branch does not exist.
    async fn get_branch_tip(&self, branch: &str) -> Result<Option<String>>;

    /// Create `branch` pointing at `revision`. Fails with `BranchExists` on collision.
    async fn create_branch(&self, branch: &str, revision: &str) -> Result<()>;

    async fn delete_branch(&self, branch: &str) -> Result<BranchDeletion>;

    /// List every open pull request, across all pages.
    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequestSummary>>;

    async fn close_pull_request(&self, number: u64) -> Result<PullRequestClosure>;

    /// Look up a file on a branch. "Not found" is `RemoteFile::Absent`, not an error.
    async fn get_file(&self, path: &str, branch: &str) -> Result<RemoteFile>;

    /// Commit a single file.
    async fn write_file(&self, write: &WriteFile) -> Result<()>;

    async fn open_pull_request(&self, pr: &CreatePullRequest) -> Result<PullRequest>;
}
