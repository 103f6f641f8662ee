use async_trait::async_trait;
use octocrab::params::repos::Reference;
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;

use crate::config::{Credential, GitHubConfig};
use crate::error::{AppError, Result};
use crate::platform::types::*;
use crate::platform::Platform;

use super::auth::installation_token;
use super::mapper;

pub struct GitHubPlatform {
    client: Octocrab,
    owner: String,
    repo: String,
}

impl GitHubPlatform {
    pub async fn new(config: &GitHubConfig) -> Result<Self> {
        let token = match config.credential()? {
            Credential::Token(token) => token.to_string(),
            Credential::App {
                app_id,
                private_key_path,
                installation_id,
            } => {
                if !private_key_path.exists() {
                    return Err(AppError::Config(format!(
                        "GitHub App private key not found at: {}",
                        private_key_path.display()
                    )));
                }
                installation_token(
                    config.api_url.as_deref(),
                    app_id,
                    private_key_path,
                    installation_id,
                )
                .await?
            }
        };

        // Failed calls surface immediately; a rerun is the recovery path.
        let mut builder = Octocrab::builder()
            .personal_token(token)
            .add_retry_config(RetryConfig::None);
        if let Some(api) = config.api_url.as_deref() {
            builder = builder
                .base_uri(api)
                .map_err(|e| AppError::Config(format!("Invalid github.api_url: {e}")))?;
        }
        let client = builder
            .build()
            .map_err(|e| AppError::GitHubApi(format!("Failed to build octocrab client: {e}")))?;

        Ok(Self {
            client,
            owner: config.owner.clone(),
            repo: config.repo.clone(),
        })
    }
}

/// HTTP status GitHub answered with, when the failure came from the API itself.
fn status_of(err: &octocrab::Error) -> Option<u16> {
    match err {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code.as_u16()),
        _ => None,
    }
}

fn is_not_found(err: &octocrab::Error) -> bool {
    status_of(err) == Some(404)
}

#[async_trait]
impl Platform for GitHubPlatform {
    async fn get_branch_tip(&self, branch: &str) -> Result<Option<String>> {
        let result = self
            .client
            .repos(&self.owner, &self.repo)
            .get_ref(&Reference::Branch(branch.to_string()))
            .await;

        match result {
            Ok(reference) => mapper::ref_sha(reference).map(Some),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_branch(&self, branch: &str, revision: &str) -> Result<()> {
        let result = self
            .client
            .repos(&self.owner, &self.repo)
            .create_ref(&Reference::Branch(branch.to_string()), revision)
            .await;

        match result {
            Ok(_) => Ok(()),
            // GitHub answers "Reference already exists" with 422
            Err(e) if status_of(&e) == Some(422) => {
                Err(AppError::BranchExists(branch.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_branch(&self, branch: &str) -> Result<BranchDeletion> {
        // The delete endpoint answers 204 with no body, so skip JSON decoding.
        let route = format!(
            "/repos/{}/{}/git/refs/heads/{branch}",
            self.owner, self.repo
        );
        let response = self.client._delete(route, None::<&()>).await?;

        match octocrab::map_github_error(response).await {
            Ok(_) => Ok(BranchDeletion::Deleted),
            // A missing ref comes back as 422 "Reference does not exist"
            Err(e) if matches!(status_of(&e), Some(404) | Some(422)) => {
                Ok(BranchDeletion::NotFound)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequestSummary>> {
        let first_page = self
            .client
            .pulls(&self.owner, &self.repo)
            .list()
            .state(octocrab::params::State::Open)
            .per_page(100)
            .send()
            .await?;

        let all = self.client.all_pages(first_page).await?;

        Ok(all
            .into_iter()
            .map(mapper::map_pull_request_summary)
            .collect())
    }

    async fn close_pull_request(&self, number: u64) -> Result<PullRequestClosure> {
        let result = self
            .client
            .pulls(&self.owner, &self.repo)
            .update(number)
            .state(octocrab::params::pulls::State::Closed)
            .send()
            .await;

        match result {
            Ok(_) => Ok(PullRequestClosure::Closed),
            Err(e) if is_not_found(&e) => Ok(PullRequestClosure::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_file(&self, path: &str, branch: &str) -> Result<RemoteFile> {
        let result = self
            .client
            .repos(&self.owner, &self.repo)
            .get_content()
            .path(path)
            .r#ref(branch)
            .send()
            .await;

        match result {
            Ok(contents) => mapper::map_file(path, contents.items),
            Err(e) if is_not_found(&e) => Ok(RemoteFile::Absent),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_file(&self, write: &WriteFile) -> Result<()> {
        let repos = self.client.repos(&self.owner, &self.repo);

        match &write.revision {
            None => {
                repos
                    .create_file(&write.path, &write.message, &write.content)
                    .branch(&write.branch)
                    .send()
                    .await?;
            }
            Some(revision) => {
                repos
                    .update_file(&write.path, &write.message, &write.content, revision)
                    .branch(&write.branch)
                    .send()
                    .await?;
            }
        }

        Ok(())
    }

    async fn open_pull_request(&self, pr: &CreatePullRequest) -> Result<PullRequest> {
        let created = self
            .client
            .pulls(&self.owner, &self.repo)
            .create(&pr.title, &pr.head_branch, &pr.base_branch)
            .body(&pr.body)
            .send()
            .await?;

        Ok(mapper::map_pull_request(created))
    }
}
