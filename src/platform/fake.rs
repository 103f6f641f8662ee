//! In-memory repository used by the sync tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::platform::types::*;
use crate::platform::Platform;

#[derive(Debug, Clone)]
pub struct FakePullRequest {
    pub number: u64,
    pub title: String,
    pub head_branch: String,
    pub body: String,
    pub open: bool,
}

#[derive(Debug, Default)]
struct State {
    /// branch -> tip commit
    branches: HashMap<String, String>,
    /// branch -> path -> (content, blob revision)
    files: HashMap<String, BTreeMap<String, (String, String)>>,
    pulls: Vec<FakePullRequest>,
    writes: Vec<WriteFile>,
    lookups: Vec<(String, String)>,
    counter: u64,
    failures: HashMap<&'static str, String>,
    /// Pull requests still listed but gone by the time they are closed.
    vanishing: HashSet<u64>,
}

impl State {
    fn next_id(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{prefix}{}", self.counter)
    }

    fn check(&self, op: &'static str) -> Result<()> {
        match self.failures.get(op) {
            Some(message) => Err(AppError::GitHubApi(message.clone())),
            None => Ok(()),
        }
    }
}

pub struct FakePlatform {
    state: Mutex<State>,
}

impl FakePlatform {
    /// A repository with one branch and no files.
    pub fn with_branch(branch: &str) -> Self {
        let mut state = State::default();
        let tip = state.next_id("commit-");
        state.branches.insert(branch.to_string(), tip);
        state.files.insert(branch.to_string(), BTreeMap::new());
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn empty() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    pub fn seed_file(&self, branch: &str, path: &str, content: &str) -> String {
        let mut state = self.state.lock().unwrap();
        let revision = state.next_id("blob-");
        let tip = state.next_id("commit-");
        state.branches.insert(branch.to_string(), tip);
        state
            .files
            .entry(branch.to_string())
            .or_default()
            .insert(path.to_string(), (content.to_string(), revision.clone()));
        revision
    }

    pub fn seed_pull_request(&self, title: &str, head_branch: &str) -> u64 {
        let mut state = self.state.lock().unwrap();
        let tip = state.next_id("commit-");
        state.branches.insert(head_branch.to_string(), tip);
        state.files.entry(head_branch.to_string()).or_default();
        let number = state.pulls.len() as u64 + 1;
        state.pulls.push(FakePullRequest {
            number,
            title: title.to_string(),
            head_branch: head_branch.to_string(),
            body: String::new(),
            open: true,
        });
        number
    }

    /// Make every call to `op` fail with `message`.
    pub fn fail(&self, op: &'static str, message: &str) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(op, message.to_string());
    }

    /// Have `close_pull_request` report `number` as not found.
    pub fn vanish_on_close(&self, number: u64) {
        self.state.lock().unwrap().vanishing.insert(number);
    }

    /// Remove a branch behind the bot's back.
    pub fn drop_branch(&self, branch: &str) {
        let mut state = self.state.lock().unwrap();
        state.branches.remove(branch);
        state.files.remove(branch);
    }

    pub fn has_branch(&self, branch: &str) -> bool {
        self.state.lock().unwrap().branches.contains_key(branch)
    }

    pub fn branches(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .state
            .lock()
            .unwrap()
            .branches
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn file(&self, branch: &str, path: &str) -> Option<(String, String)> {
        self.state
            .lock()
            .unwrap()
            .files
            .get(branch)
            .and_then(|files| files.get(path))
            .cloned()
    }

    pub fn pulls(&self) -> Vec<FakePullRequest> {
        self.state.lock().unwrap().pulls.clone()
    }

    pub fn open_pulls(&self) -> Vec<FakePullRequest> {
        self.pulls().into_iter().filter(|pr| pr.open).collect()
    }

    pub fn writes(&self) -> Vec<WriteFile> {
        self.state.lock().unwrap().writes.clone()
    }

    pub fn lookups(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().lookups.clone()
    }

    /// Merge an open pull request: its head's files land on `base`.
    pub fn merge(&self, number: u64, base: &str) {
        let mut state = self.state.lock().unwrap();
        let head = state
            .pulls
            .iter()
            .find(|pr| pr.number == number)
            .map(|pr| pr.head_branch.clone())
            .unwrap();
        let head_files = state.files.get(&head).cloned().unwrap_or_default();
        state.files.insert(base.to_string(), head_files);
        let tip = state.next_id("commit-");
        state.branches.insert(base.to_string(), tip);
        if let Some(pr) = state.pulls.iter_mut().find(|pr| pr.number == number) {
            pr.open = false;
        }
    }
}

#[async_trait]
impl Platform for FakePlatform {
    async fn get_branch_tip(&self, branch: &str) -> Result<Option<String>> {
        let state = self.state.lock().unwrap();
        state.check("get_branch_tip")?;
        Ok(state.branches.get(branch).cloned())
    }

    async fn create_branch(&self, branch: &str, revision: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.check("create_branch")?;
        if state.branches.contains_key(branch) {
            return Err(AppError::BranchExists(branch.to_string()));
        }
        let source = state
            .branches
            .iter()
            .find(|(_, tip)| tip.as_str() == revision)
            .map(|(name, _)| name.clone())
            .ok_or_else(|| AppError::GitHubApi(format!("unknown revision {revision}")))?;
        let files = state.files.get(&source).cloned().unwrap_or_default();
        state.branches.insert(branch.to_string(), revision.to_string());
        state.files.insert(branch.to_string(), files);
        Ok(())
    }

    async fn delete_branch(&self, branch: &str) -> Result<BranchDeletion> {
        let mut state = self.state.lock().unwrap();
        state.check("delete_branch")?;
        if state.branches.remove(branch).is_none() {
            return Ok(BranchDeletion::NotFound);
        }
        state.files.remove(branch);
        Ok(BranchDeletion::Deleted)
    }

    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequestSummary>> {
        let state = self.state.lock().unwrap();
        state.check("list_open_pull_requests")?;
        Ok(state
            .pulls
            .iter()
            .filter(|pr| pr.open)
            .map(|pr| PullRequestSummary {
                number: pr.number,
                title: pr.title.clone(),
                head_branch: pr.head_branch.clone(),
            })
            .collect())
    }

    async fn close_pull_request(&self, number: u64) -> Result<PullRequestClosure> {
        let mut state = self.state.lock().unwrap();
        state.check("close_pull_request")?;
        if state.vanishing.contains(&number) {
            return Ok(PullRequestClosure::NotFound);
        }
        match state.pulls.iter_mut().find(|pr| pr.number == number) {
            Some(pr) => {
                pr.open = false;
                Ok(PullRequestClosure::Closed)
            }
            None => Ok(PullRequestClosure::NotFound),
        }
    }

    async fn get_file(&self, path: &str, branch: &str) -> Result<RemoteFile> {
        let mut state = self.state.lock().unwrap();
        state.check("get_file")?;
        state.lookups.push((branch.to_string(), path.to_string()));
        let files = state
            .files
            .get(branch)
            .ok_or_else(|| AppError::GitHubApi(format!("No commit found for the ref {branch}")))?;
        Ok(match files.get(path) {
            Some((content, revision)) => RemoteFile::Present {
                content: content.clone(),
                revision: revision.clone(),
            },
            None => RemoteFile::Absent,
        })
    }

    async fn write_file(&self, write: &WriteFile) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.check("write_file")?;
        let current = state
            .files
            .get(&write.branch)
            .ok_or_else(|| AppError::GitHubApi(format!("Branch {} not found", write.branch)))?
            .get(&write.path)
            .map(|(_, revision)| revision.clone());

        // Mirrors the contents API: updates need the current sha, creates must not clobber.
        match (&write.revision, current) {
            (None, Some(_)) => {
                return Err(AppError::GitHubApi(format!(
                    "\"sha\" wasn't supplied for {}",
                    write.path
                )))
            }
            (Some(expected), Some(actual)) if *expected != actual => {
                return Err(AppError::GitHubApi(format!(
                    "{} does not match {expected}",
                    write.path
                )))
            }
            (Some(_), None) => {
                return Err(AppError::GitHubApi(format!("{} not found", write.path)))
            }
            _ => {}
        }

        let revision = state.next_id("blob-");
        let tip = state.next_id("commit-");
        state.branches.insert(write.branch.clone(), tip);
        state
            .files
            .entry(write.branch.clone())
            .or_default()
            .insert(write.path.clone(), (write.content.clone(), revision));
        state.writes.push(write.clone());
        Ok(())
    }

    async fn open_pull_request(&self, pr: &CreatePullRequest) -> Result<PullRequest> {
        let mut state = self.state.lock().unwrap();
        state.check("open_pull_request")?;
        if !state.branches.contains_key(&pr.head_branch) {
            return Err(AppError::GitHubApi(format!(
                "head branch {} does not exist",
                pr.head_branch
            )));
        }
        let number = state.pulls.len() as u64 + 1;
        state.pulls.push(FakePullRequest {
            number,
            title: pr.title.clone(),
            head_branch: pr.head_branch.clone(),
            body: pr.body.clone(),
            open: true,
        });
        Ok(PullRequest {
            number,
            url: format!("https://github.com/cds-snc/articles-site/pull/{number}"),
        })
    }
}
