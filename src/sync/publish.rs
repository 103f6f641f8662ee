use crate::error::Result;
use crate::platform::types::{BranchDeletion, CreatePullRequest, PullRequest};
use crate::platform::Platform;

use super::branch::RunStamp;
use super::reconcile::ReconcileReport;
use super::AUTOMATION_MARKER;

pub fn pull_request_title(stamp: &RunStamp) -> String {
    format!("{AUTOMATION_MARKER} Content release {}", stamp.timestamp())
}

pub fn pull_request_body(report: &ReconcileReport) -> String {
    let mut body = String::from(
        "Automated content release: the latest English and French articles from the CMS.\n\n\
         Opening a new release closes this pull request, so merge it or let the next run replace it.\n",
    );

    for (heading, paths) in [("Added", &report.created), ("Updated", &report.updated)] {
        if paths.is_empty() {
            continue;
        }
        body.push_str(&format!("\n### {heading}\n\n"));
        for path in paths {
            body.push_str(&format!("- `{path}`\n"));
        }
    }

    body
}

/// Open a pull request for `branch` if reconciliation changed anything,
/// otherwise delete the branch. Returns the opened pull request.
pub async fn publish(
    platform: &dyn Platform,
    base_branch: &str,
    branch: &str,
    report: &ReconcileReport,
    stamp: &RunStamp,
) -> Result<Option<PullRequest>> {
    if !report.changed() {
        match platform.delete_branch(branch).await? {
            BranchDeletion::Deleted => {
                tracing::info!(branch = %branch, "No content changes; deleted branch");
            }
            BranchDeletion::NotFound => {
                tracing::warn!(branch = %branch, "No content changes; branch was already gone");
            }
        }
        return Ok(None);
    }

    let pr = platform
        .open_pull_request(&CreatePullRequest {
            title: pull_request_title(stamp),
            body: pull_request_body(report),
            head_branch: branch.to_string(),
            base_branch: base_branch.to_string(),
        })
        .await?;

    tracing::info!(pr = pr.number, url = %pr.url, branch = %branch, "Opened pull request");
    Ok(Some(pr))
}
