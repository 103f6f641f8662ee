//! One content sync run: reap, fetch, provision, reconcile, publish, dispatch.

pub mod branch;
pub mod publish;
pub mod reaper;
pub mod reconcile;

use crate::config::AppConfig;
use crate::content::{self, ContentItem};
use crate::dispatch::Dispatcher;
use crate::error::{Phase, Result};
use crate::platform::types::PullRequest;
use crate::platform::Platform;
use crate::source::ContentSource;

use branch::RunStamp;
use reconcile::ReconcileReport;

/// Title prefix marking pull requests opened by this bot. It is the only
/// record of provenance the reaper has.
pub const AUTOMATION_MARKER: &str = "[AUTO-PR]";

#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub base_branch: String,
    /// Repository directory the source's relative paths land under.
    pub content_dir: String,
}

impl SyncSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            base_branch: config.github.base_branch.clone(),
            content_dir: config.content.base_dir.clone(),
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    /// Branch behind the opened pull request; `None` when nothing changed.
    pub branch_name: Option<String>,
    pub pull_request: Option<PullRequest>,
    pub report: ReconcileReport,
    /// Automated pull requests closed by the reaper.
    pub closed_stale: Vec<u64>,
}

async fn fetch_items(source: &dyn ContentSource, content_dir: &str) -> Result<Vec<ContentItem>> {
    let items: Vec<ContentItem> = source
        .fetch_items()
        .await?
        .into_iter()
        .map(|item| item.rebased(content_dir))
        .collect();
    content::ensure_unique_paths(&items)?;
    Ok(items)
}

/// Run one sync to completion. Any error aborts the run tagged with its
/// phase; remote state already written stays as it is.
pub async fn run_sync(
    platform: &dyn Platform,
    source: &dyn ContentSource,
    dispatcher: &dyn Dispatcher,
    settings: &SyncSettings,
    stamp: RunStamp,
) -> Result<RunOutcome> {
    tracing::info!(base = %settings.base_branch, started = %stamp.timestamp(), "Starting content sync");

    // Reaping only touches pull requests, so it can overlap the fetch. A
    // failed fetch must not cut the reaper off between closing a pull
    // request and deleting its branch.
    let (reaped, fetched) = tokio::join!(
        reaper::reap_stale_runs(platform, AUTOMATION_MARKER),
        fetch_items(source, &settings.content_dir),
    );
    let closed_stale = reaped.map_err(|e| e.in_phase(Phase::Reap))?;
    let items = fetched.map_err(|e| e.in_phase(Phase::Fetch))?;

    if items.is_empty() {
        tracing::info!("Source returned no content; skipping branch");
        dispatcher
            .on_run_complete(None, &items)
            .await
            .map_err(|e| e.in_phase(Phase::Dispatch))?;
        return Ok(RunOutcome {
            closed_stale,
            ..Default::default()
        });
    }

    let branch = branch::provision_branch(platform, &settings.base_branch, &stamp)
        .await
        .map_err(|e| e.in_phase(Phase::Provision))?;

    let report = reconcile::reconcile(platform, &branch, &items)
        .await
        .map_err(|e| e.in_phase(Phase::Reconcile))?;

    let pull_request = publish::publish(platform, &settings.base_branch, &branch, &report, &stamp)
        .await
        .map_err(|e| e.in_phase(Phase::Publish))?;

    let branch_name = pull_request.as_ref().map(|_| branch);

    dispatcher
        .on_run_complete(branch_name.as_deref(), &items)
        .await
        .map_err(|e| e.in_phase(Phase::Dispatch))?;

    Ok(RunOutcome {
        branch_name,
        pull_request,
        report,
        closed_stale,
    })
}
