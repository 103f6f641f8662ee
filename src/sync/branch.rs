use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{AppError, Result};
use crate::platform::Platform;

pub const BRANCH_PREFIX: &str = "update-content-";

/// Wall-clock start of a run; names both the branch and the pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStamp(DateTime<Utc>);

impl RunStamp {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self(started_at)
    }

    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// RFC 3339 with millisecond precision, e.g. `2026-10-19T08:30:00.123Z`.
    pub fn timestamp(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// `update-content-2026-10-19T08-30-00-123Z`; `:` and `.` are not allowed in refs.
    pub fn branch_name(&self) -> String {
        let safe = self.timestamp().replace([':', '.'], "-");
        format!("{BRANCH_PREFIX}{safe}")
    }
}

/// Cut a fresh branch from the tip of `base_branch`.
///
/// A name collision is reported as `BranchExists` and not retried.
pub async fn provision_branch(
    platform: &dyn Platform,
    base_branch: &str,
    stamp: &RunStamp,
) -> Result<String> {
    let tip = platform
        .get_branch_tip(base_branch)
        .await?
        .ok_or_else(|| AppError::BaseBranchMissing(base_branch.to_string()))?;

    let branch = stamp.branch_name();
    platform.create_branch(&branch, &tip).await?;

    tracing::info!(branch = %branch, base = base_branch, revision = %tip, "Created branch");
    Ok(branch)
}
