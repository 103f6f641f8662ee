use crate::error::Result;
use crate::platform::types::{BranchDeletion, PullRequestClosure};
use crate::platform::Platform;

/// Close every open pull request whose title starts with `marker` and delete
/// its head branch. Returns the numbers of the pull requests closed.
///
/// Listing and closing failures abort the run: leaving a stale automated PR
/// open would break the one-open-PR invariant for the next run. Branch
/// deletion failures are only logged.
pub async fn reap_stale_runs(platform: &dyn Platform, marker: &str) -> Result<Vec<u64>> {
    let open = platform.list_open_pull_requests().await?;
    let stale: Vec<_> = open
        .into_iter()
        .filter(|pr| pr.title.starts_with(marker))
        .collect();

    if stale.is_empty() {
        tracing::info!("No stale automated pull requests");
        return Ok(Vec::new());
    }

    let mut closed = Vec::with_capacity(stale.len());
    for pr in stale {
        match platform.close_pull_request(pr.number).await? {
            PullRequestClosure::Closed => {
                tracing::info!(pr = pr.number, title = %pr.title, "Closed stale pull request");
                closed.push(pr.number);
            }
            PullRequestClosure::NotFound => {
                tracing::warn!(pr = pr.number, "Stale pull request vanished before it could be closed");
                continue;
            }
        }

        match platform.delete_branch(&pr.head_branch).await {
            Ok(BranchDeletion::Deleted) => {
                tracing::info!(branch = %pr.head_branch, "Deleted stale branch");
            }
            Ok(BranchDeletion::NotFound) => {
                tracing::warn!(branch = %pr.head_branch, "Stale branch already removed");
            }
            Err(e) => {
                tracing::warn!(
                    branch = %pr.head_branch,
                    error = %e,
                    "Failed to delete stale branch"
                );
            }
        }
    }

    Ok(closed)
}
