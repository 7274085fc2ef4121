//! Git operations abstraction layer
//!
//! The release workflow only needs to commit the rewritten files and tag the
//! result. The [Repository] trait captures exactly that, with two
//! implementations:
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: an in-memory recorder for tests
//!
//! ```rust
//! # use module_release::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> module_release::Result<()> {
//! if !repo.tag_exists("v1.5.0")? {
//!     repo.commit_tracked("version bump v1.5.0")?;
//!     repo.create_annotated_tag("v1.5.0", "Updated to 1.5.0")?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Version-control operations used by `publish`.
///
/// Every method reports failure through [crate::error::ReleaseError]; the
/// caller aborts the release on the first error.
pub trait Repository {
    /// Stage every modified tracked file and commit, like `git commit -a`.
    ///
    /// # Returns
    /// * `Ok(String)` - id of the new commit
    /// * `Err` - nothing to commit, no committer identity, or a Git error
    fn commit_tracked(&self, message: &str) -> Result<String>;

    /// Create an annotated tag on `HEAD`.
    ///
    /// # Returns
    /// * `Err` - if the tag already exists or `HEAD` is unborn
    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Whether `refs/tags/{name}` exists.
    fn tag_exists(&self, name: &str) -> Result<bool>;
}
