use base64::Engine;
use octocrab::models::repos::{Content, Object, Ref};

use crate::error::{AppError, Result};
use crate::platform::types;

pub fn map_pull_request_summary(pr: octocrab::models::pulls::PullRequest) -> types::PullRequestSummary {
    types::PullRequestSummary {
        number: pr.number,
        title: pr.title.unwrap_or_default(),
        head_branch: pr.head.ref_field,
    }
}

pub fn map_pull_request(pr: octocrab::models::pulls::PullRequest) -> types::PullRequest {
    types::PullRequest {
        number: pr.number,
        url: pr.html_url.map(|u| u.to_string()).unwrap_or_default(),
    }
}

/// Commit SHA a branch reference points at.
pub fn ref_sha(reference: Ref) -> Result<String> {
    match reference.object {
        Object::Commit { sha, .. } | Object::Tag { sha, .. } => Ok(sha),
        #[allow(unreachable_patterns)]
        _ => Err(AppError::GitHubApi(format!(
            "Unexpected object type behind {}",
            reference.ref_field
        ))),
    }
}

/// Map a contents API response for a single path to our file state.
pub fn map_file(path: &str, mut items: Vec<Content>) -> Result<types::RemoteFile> {
    if items.len() != 1 {
        return Err(AppError::GitHubApi(format!(
            "Expected a file at {path}, found a directory with {} entries",
            items.len()
        )));
    }
    let item = items.remove(0);

    if item.r#type != "file" {
        return Err(AppError::GitHubApi(format!(
            "Expected a file at {path}, found {}",
            item.r#type
        )));
    }

    let encoded = item.content.ok_or_else(|| {
        AppError::GitHubApi(format!(
            "No inline content for {path} (files over 1 MB are not supported)"
        ))
    })?;

    Ok(types::RemoteFile::Present {
        content: decode_content(path, &encoded)?,
        revision: item.sha,
    })
}

/// GitHub wraps base64 payloads at 60 columns.
fn decode_content(path: &str, encoded: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| AppError::GitHubApi(format!("Invalid base64 content for {path}: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| AppError::GitHubApi(format!("Content of {path} is not UTF-8: {e}")))
}
