//! Repository data structures

use std::collections::BTreeSet;
use std::path::PathBuf;

use super::error::GitError;

/// Working-tree state split into five disjoint path sets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryStatus {
    /// Untracked files
    pub not_added: BTreeSet<PathBuf>,
    /// Files newly added to the index
    pub created: BTreeSet<PathBuf>,
    /// Deleted files (staged or not)
    pub deleted: BTreeSet<PathBuf>,
    /// Modified files, including unmerged paths
    pub modified: BTreeSet<PathBuf>,
    /// Renamed or copied files, by new path
    pub renamed: BTreeSet<PathBuf>,
}

impl RepositoryStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clean iff all five sets are empty
    pub fn is_clean(&self) -> bool {
        self.not_added.is_empty()
            && self.created.is_empty()
            && self.deleted.is_empty()
            && self.modified.is_empty()
            && self.renamed.is_empty()
    }

    /// Total number of changed paths
    pub fn len(&self) -> usize {
        self.not_added.len()
            + self.created.len()
            + self.deleted.len()
            + self.modified.len()
            + self.renamed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_clean()
    }
}

/// Output of `git branch`, local or with remotes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchListing {
    /// Checked-out branch, `None` when HEAD is detached
    pub current: Option<String>,
    pub all: Vec<String>,
}

impl BranchListing {
    pub fn contains(&self, branch: &str) -> bool {
        self.all.iter().any(|b| b == branch)
    }

    /// Whether `origin/<branch>` appears in an `--all` listing
    pub fn has_remote(&self, remote: &str, branch: &str) -> bool {
        self.contains(&format!("remotes/{remote}/{branch}"))
    }

    pub fn require_current(&self) -> Result<&str, GitError> {
        self.current.as_deref().ok_or(GitError::DetachedHead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_cleanliness() {
        let mut status = RepositoryStatus::new();
        assert!(status.is_clean());
        assert_eq!(status.len(), 0);

        status.renamed.insert(PathBuf::from("src/new.rs"));
        assert!(!status.is_clean());
        assert_eq!(status.len(), 1);
    }

    #[test]
    fn test_branch_listing_lookup() {
        let listing = BranchListing {
            current: Some("feature-x".to_string()),
            all: vec![
                "feature-x".to_string(),
                "remotes/origin/dev".to_string(),
            ],
        };

        assert!(listing.contains("feature-x"));
        assert!(listing.has_remote("origin", "dev"));
        assert!(!listing.has_remote("origin", "test"));
        assert_eq!(listing.require_current().unwrap(), "feature-x");

        let detached = BranchListing::default();
        assert!(matches!(detached.require_current(), Err(GitError::DetachedHead)));
    }
}
