use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::content::ContentItem;
use crate::error::{AppError, Result};

/// Follow-on work once the publisher has decided the run's outcome.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// `branch_name` is the branch behind the opened pull request, or `None`
    /// when nothing changed. Implementations must do nothing for `None`.
    async fn on_run_complete(&self, branch_name: Option<&str>, items: &[ContentItem]) -> Result<()>;
}

pub struct NoopDispatcher;

#[async_trait]
impl Dispatcher for NoopDispatcher {
    async fn on_run_complete(&self, _branch_name: Option<&str>, _items: &[ContentItem]) -> Result<()> {
        Ok(())
    }
}

/// Writes the published items into a local checkout so follow-up tooling
/// (site build, preview) sees the same files the pull request carries.
pub struct LocalMaterializer {
    root: PathBuf,
}

impl LocalMaterializer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a repository-relative item path under the root, refusing
    /// anything that would escape it.
    fn target_path(&self, relative: &str) -> Result<PathBuf> {
        let relative = Path::new(relative);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return Err(AppError::Dispatch(format!(
                "Refusing to write outside {}: {}",
                self.root.display(),
                relative.display()
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl Dispatcher for LocalMaterializer {
    async fn on_run_complete(&self, branch_name: Option<&str>, items: &[ContentItem]) -> Result<()> {
        let Some(branch) = branch_name else {
            tracing::info!("No pull request opened; nothing to materialize");
            return Ok(());
        };

        for item in items {
            let target = self.target_path(&item.path)?;
            if let Some(parent) = target.parent() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::Dispatch(format!("Failed to create {}: {e}", parent.display()))
                })?;
            }
            tokio::fs::write(&target, &item.body).await.map_err(|e| {
                AppError::Dispatch(format!("Failed to write {}: {e}", target.display()))
            })?;
            tracing::debug!(path = %target.display(), "Materialized");
        }

        tracing::info!(
            branch = branch,
            count = items.len(),
            root = %self.root.display(),
            "Materialized content"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_materializes_items_for_a_branch() {
        let tmp = tempfile::tempdir().unwrap();
        let materializer = LocalMaterializer::new(tmp.path());
        let items = vec![
            ContentItem::new("content/en/a.md", "X"),
            ContentItem::new("content/fr/b.md", "Y"),
        ];

        materializer
            .on_run_complete(Some("update-content-x"), &items)
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(tmp.path().join("content/en/a.md")).unwrap(), "X");
        assert_eq!(std::fs::read_to_string(tmp.path().join("content/fr/b.md")).unwrap(), "Y");
    }

    #[tokio::test]
    async fn test_no_branch_is_a_no_op() {
        let tmp = tempfile::tempdir().unwrap();
        let materializer = LocalMaterializer::new(tmp.path());
        let items = vec![ContentItem::new("content/en/a.md", "X")];

        materializer.on_run_complete(None, &items).await.unwrap();

        assert!(!tmp.path().join("content").exists());
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let tmp = tempfile::tempdir().unwrap();
        let materializer = LocalMaterializer::new(tmp.path());
        let items = vec![ContentItem::new("../escape.md", "X")];

        let err = materializer
            .on_run_complete(Some("update-content-x"), &items)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Dispatch(_)));
    }
}
