use std::fmt;

use thiserror::Error;

/// Pipeline phase an error escaped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Reap,
    Fetch,
    Provision,
    Reconcile,
    Publish,
    Dispatch,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Reap => "reap",
            Phase::Fetch => "fetch",
            Phase::Provision => "provision",
            Phase::Reconcile => "reconcile",
            Phase::Publish => "publish",
            Phase::Dispatch => "dispatch",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    #[error("Base branch not found: {0}")]
    BaseBranchMissing(String),

    #[error("Branch already exists: {0}")]
    BranchExists(String),

    #[error("Duplicate content path: {0}")]
    DuplicatePath(String),

    #[error("Content source error: {0}")]
    Source(String),

    #[error("Dispatch error: {0}")]
    Dispatch(String),

    #[error("{phase} phase failed: {source}")]
    Phase {
        phase: Phase,
        #[source]
        source: Box<AppError>,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl AppError {
    /// Tag the error with the phase it escaped from.
    pub fn in_phase(self, phase: Phase) -> Self {
        match self {
            already @ AppError::Phase { .. } => already,
            other => AppError::Phase {
                phase,
                source: Box::new(other),
            },
        }
    }

    /// The phase this error was tagged with, if any.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            AppError::Phase { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

impl From<octocrab::Error> for AppError {
    fn from(e: octocrab::Error) -> Self {
        AppError::GitHubApi(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
