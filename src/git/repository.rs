use crate::error::Result;
use git2::{ErrorCode, ObjectType, Repository as Git2Repo};
use std::path::Path;
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }
}

impl super::Repository for Git2Repository {
    fn commit_tracked(&self, message: &str) -> Result<String> {
        let mut index = self.repo.index()?;
        index.update_all(["*"], None)?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                None
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(parent) = &parent {
            if parent.tree_id() == tree_id {
                return Err(git2::Error::from_str("nothing to commit").into());
            }
        }

        let signature = self.repo.signature()?;
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        debug!(commit = %oid, "committed tracked changes");
        Ok(oid.to_string())
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        let head = self.repo.head()?.peel(ObjectType::Commit)?;
        let signature = self.repo.signature()?;

        let oid = self.repo.tag(name, &head, &signature, message, false)?;
        debug!(tag = name, oid = %oid, "created annotated tag");
        Ok(())
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        match self.repo.find_reference(&format!("refs/tags/{}", name)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
