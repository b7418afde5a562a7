//! Version-control plumbing for the submission workflow.
//!
//! This module is the only doorway to git. It exposes exactly the
//! operations the workflow needs (branch-per-submission, cherry-pick to a
//! review branch, revert-by-reset, review-unit bookkeeping) over two
//! repository scopes: a per-user working repository and the canonical
//! master repository. No other module imports `git2`.
//!
//! Handles are scoped resources: the underlying repository is released on
//! drop, on every exit path. No operation is transactional across two
//! repositories; callers sequence the two-phase flows explicitly.

mod locks;
mod repository;

pub use locks::RepoLocks;
pub use repository::{BranchRef, CommitId, RepoHandle, RepositoryFactory, MASTER_LOCK_KEY};
