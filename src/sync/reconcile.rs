use crate::content::ContentItem;
use crate::error::Result;
use crate::platform::types::{RemoteFile, WriteFile};
use crate::platform::Platform;

/// What reconciling one item did to the branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    Created,
    Updated,
    Unchanged,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub unchanged: usize,
}

impl ReconcileReport {
    /// Whether any item produced a commit. The publisher's only input.
    pub fn changed(&self) -> bool {
        !self.created.is_empty() || !self.updated.is_empty()
    }

    fn record(&mut self, item: &ContentItem, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Created => self.created.push(item.path.clone()),
            ItemOutcome::Updated => self.updated.push(item.path.clone()),
            ItemOutcome::Unchanged => self.unchanged += 1,
        }
    }
}

/// Bring one path on `branch` in line with `item`.
///
/// The revision passed to an update is the one returned by the lookup just
/// above it, so a file changed by someone else in between makes the write
/// fail instead of silently overwriting their change. Identical content
/// issues no write at all.
pub async fn reconcile_item(
    platform: &dyn Platform,
    branch: &str,
    item: &ContentItem,
) -> Result<ItemOutcome> {
    let (revision, outcome, verb) = match platform.get_file(&item.path, branch).await? {
        RemoteFile::Absent => (None, ItemOutcome::Created, "Add"),
        RemoteFile::Present { content, .. } if content == item.body => {
            tracing::debug!(path = %item.path, "Unchanged");
            return Ok(ItemOutcome::Unchanged);
        }
        RemoteFile::Present { revision, .. } => (Some(revision), ItemOutcome::Updated, "Update"),
    };

    let write = WriteFile {
        path: item.path.clone(),
        content: item.body.clone(),
        branch: branch.to_string(),
        message: format!("{verb} {}", item.file_name()),
        revision,
    };
    platform.write_file(&write).await?;

    tracing::info!(path = %item.path, outcome = ?outcome, "Wrote file");
    Ok(outcome)
}

/// Reconcile every item against `branch`, one at a time.
///
/// Writes must stay sequential: each commit moves the branch tip, and
/// concurrent commits to one branch race each other.
pub async fn reconcile(
    platform: &dyn Platform,
    branch: &str,
    items: &[ContentItem],
) -> Result<ReconcileReport> {
    let mut report = ReconcileReport::default();

    for item in items {
        let outcome = reconcile_item(platform, branch, item).await?;
        report.record(item, outcome);
    }

    tracing::info!(
        branch = %branch,
        created = report.created.len(),
        updated = report.updated.len(),
        unchanged = report.unchanged,
        "Reconciliation finished"
    );
    Ok(report)
}
