use crate::error::Result;
use crate::git::Repository;
use std::cell::RefCell;

/// Mock repository for testing without actual git operations
///
/// Records every commit and tag request so tests can assert on them.
#[derive(Default)]
pub struct MockRepository {
    commits: RefCell<Vec<String>>,
    tags: RefCell<Vec<(String, String)>>,
    fail_commits: bool,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository whose commits always fail
    pub fn failing_commits() -> Self {
        MockRepository {
            fail_commits: true,
            ..Self::default()
        }
    }

    /// Add an existing tag
    pub fn add_tag(&self, name: impl Into<String>) {
        self.tags
            .borrow_mut()
            .push((name.into(), String::new()));
    }

    /// Commit messages in the order they were made
    pub fn commits(&self) -> Vec<String> {
        self.commits.borrow().clone()
    }

    /// `(name, message)` pairs in the order they were created
    pub fn tags(&self) -> Vec<(String, String)> {
        self.tags.borrow().clone()
    }
}

impl Repository for MockRepository {
    fn commit_tracked(&self, message: &str) -> Result<String> {
        if self.fail_commits {
            return Err(git2::Error::from_str("mock commit failure").into());
        }
        let mut commits = self.commits.borrow_mut();
        commits.push(message.to_string());
        Ok(format!("{:040x}", commits.len()))
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        if self.tag_exists(name)? {
            return Err(git2::Error::from_str(&format!("tag '{}' already exists", name)).into());
        }
        self.tags
            .borrow_mut()
            .push((name.to_string(), message.to_string()));
        Ok(())
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.tags.borrow().iter().any(|(n, _)| n == name))
    }
}
