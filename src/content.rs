use std::collections::HashSet;

use crate::error::{AppError, Result};

/// One file's target path and full intended contents for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    /// Repository-relative path, `/`-separated.
    pub path: String,
    pub body: String,
}

impl ContentItem {
    pub fn new(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            body: body.into(),
        }
    }

    /// Final path component, used in commit messages.
    pub fn file_name(&self) -> &str {
        basename(&self.path)
    }

    /// Move the item under `base_dir` (`en/a.md` -> `<base_dir>/en/a.md`).
    pub fn rebased(self, base_dir: &str) -> Self {
        let base = base_dir.trim_matches('/');
        let path = self.path.trim_start_matches('/');
        Self {
            path: format!("{base}/{path}"),
            body: self.body,
        }
    }
}

pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// No two items in one run may target the same path.
pub fn ensure_unique_paths(items: &[ContentItem]) -> Result<()> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.path.as_str()) {
            return Err(AppError::DuplicatePath(item.path.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        assert_eq!(ContentItem::new("en/a.md", "X").file_name(), "a.md");
        assert_eq!(ContentItem::new("top.md", "X").file_name(), "top.md");
    }

    #[test]
    fn test_rebased_trims_slashes() {
        let item = ContentItem::new("/en/a.md", "X").rebased("/packages/website/content/");
        assert_eq!(item.path, "packages/website/content/en/a.md");
        assert_eq!(item.body, "X");
    }

    #[test]
    fn test_duplicate_paths_rejected() {
        let items = vec![
            ContentItem::new("en/a.md", "one"),
            ContentItem::new("fr/a.md", "deux"),
            ContentItem::new("en/a.md", "three"),
        ];
        let err = ensure_unique_paths(&items).unwrap_err();
        assert!(matches!(err, AppError::DuplicatePath(ref p) if p == "en/a.md"));
    }

    #[test]
    fn test_unique_paths_accepted() {
        let items = vec![
            ContentItem::new("en/a.md", "one"),
            ContentItem::new("fr/a.md", "un"),
        ];
        assert!(ensure_unique_paths(&items).is_ok());
    }
}
