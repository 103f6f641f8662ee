use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pr_bot::config::AppConfig;
use pr_bot::dispatch::{Dispatcher, LocalMaterializer, NoopDispatcher};
use pr_bot::platform::github::GitHubPlatform;
use pr_bot::source::BilingualSource;
use pr_bot::sync::branch::RunStamp;
use pr_bot::sync::{run_sync, SyncSettings};

#[derive(Parser)]
#[command(name = "pr-bot", about = "Open a pull request with the latest CMS content")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Write the published content into this local checkout after a PR opens
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;

    tracing::info!(
        repo = %config.github.repo_full_name(),
        base = %config.github.base_branch,
        content_dir = %config.content.base_dir,
        "Configuration loaded"
    );

    let platform = GitHubPlatform::new(&config.github).await?;
    let source = BilingualSource::new(&config.source);
    let dispatcher: Box<dyn Dispatcher> = match cli.output_dir.or(config.dispatch.output_dir.clone()) {
        Some(dir) => Box::new(LocalMaterializer::new(dir)),
        None => Box::new(NoopDispatcher),
    };
    let settings = SyncSettings::from_config(&config);

    let outcome = run_sync(
        &platform,
        &source,
        dispatcher.as_ref(),
        &settings,
        RunStamp::now(),
    )
    .await?;

    match (&outcome.branch_name, &outcome.pull_request) {
        (Some(branch), Some(pr)) => tracing::info!(
            branch = %branch,
            pr = pr.number,
            url = %pr.url,
            created = outcome.report.created.len(),
            updated = outcome.report.updated.len(),
            "Content sync complete"
        ),
        _ => tracing::info!(
            unchanged = outcome.report.unchanged,
            "Content sync complete; nothing changed"
        ),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Content sync failed");
            ExitCode::FAILURE
        }
    }
}
