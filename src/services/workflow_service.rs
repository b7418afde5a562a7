//! Submission workflow orchestration.
//!
//! Turns a user's working changes into a reviewable, revertible unit:
//! commit on the user's branch, cherry-pick onto a review branch cut from
//! the last known canonical master, publish as a review unit, return to
//! `master`. Also lists a user's outstanding units and reverts one.
//!
//! Submit and revert each touch two repositories in sequence with no
//! transaction across them. A revert whose master phase fails leaves the
//! user branch rewound while the unit stays open; the state is recoverable
//! by an administrator and intentionally not repaired here.

use std::sync::Arc;

use chrono::Utc;

use crate::config::NotificationTemplates;
use crate::error::{AppError, Result};
use crate::models::review::ReviewSummary;
use crate::models::user::UserProfile;
use crate::services::notification_service::NotificationService;
use crate::vcs::{RepoLocks, RepositoryFactory, MASTER_LOCK_KEY};

/// Refname-safe timestamp used in branch names, review unit titles, and
/// surrogate submission ids.
pub(crate) fn timestamp() -> String {
    Utc::now().format("%Y%m%d%H%M%S%3f").to_string()
}

pub struct WorkflowService {
    factory: Arc<RepositoryFactory>,
    locks: Arc<RepoLocks>,
    notifier: Arc<NotificationService>,
    templates: NotificationTemplates,
}

impl WorkflowService {
    pub fn new(
        factory: Arc<RepositoryFactory>,
        locks: Arc<RepoLocks>,
        notifier: Arc<NotificationService>,
        templates: NotificationTemplates,
    ) -> Self {
        Self {
            factory,
            locks,
            notifier,
            templates,
        }
    }

    /// Submit the user's working changes for review. Returns the review
    /// unit title, `<userId>_<timestamp>`.
    pub async fn submit_for_review(&self, user: &UserProfile, message: String) -> Result<String> {
        let _guard = self.locks.acquire(&user.id).await;
        let factory = self.factory.clone();
        let acting = user.clone();
        let title =
            run_blocking(move || submit_inner(&factory, &acting, &message)).await?;

        tracing::info!(user = %user.id, title = %title, "Submission published for review");
        if self.notifier.is_configured() {
            self.notifier
                .send(&self.templates.submit, &user.email, &title)
                .await;
        }
        Ok(title)
    }

    /// List the caller's outstanding review units, in branch enumeration
    /// order. Materialized before the master handle is released.
    pub async fn list_review_units(&self, user: &UserProfile) -> Result<Vec<ReviewSummary>> {
        let _guard = self.locks.acquire(MASTER_LOCK_KEY).await;
        let factory = self.factory.clone();
        let needle = format!("/{}_", user.id);
        run_blocking(move || {
            let master = factory.open_master()?;
            let mut units = Vec::new();
            for branch in master.branches()? {
                let branch = branch?;
                if branch.ref_name.contains(&needle) {
                    units.push(master.summarize(&branch)?);
                }
            }
            Ok(units)
        })
        .await
    }

    /// Revert a submission: rewind the user's branch to the commit before
    /// it, then flag the canonical review unit as reverted.
    pub async fn revert_submission(&self, user: &UserProfile, branch: String) -> Result<()> {
        // Phase one: the user's repository.
        {
            let _guard = self.locks.acquire(&user.id).await;
            let factory = self.factory.clone();
            let acting = user.clone();
            let name = branch.clone();
            run_blocking(move || {
                let repo = factory.open_for_user(&acting)?;
                if repo.is_undefined()? {
                    return Err(AppError::InvalidRequest("no changes to revert".into()));
                }
                let before = repo.find_commit_before_submission(&name)?;
                repo.reset(before)
            })
            .await?;
        }

        // Phase two: the canonical repository.
        {
            let _guard = self.locks.acquire(MASTER_LOCK_KEY).await;
            let factory = self.factory.clone();
            let acting = user.clone();
            let name = branch.clone();
            run_blocking(move || {
                let master = factory.open_master()?;
                master.mark_reverted(&name, &acting)
            })
            .await?;
        }

        tracing::info!(user = %user.id, branch = %branch, "Submission reverted");
        if self.notifier.is_configured() {
            self.notifier
                .send(&self.templates.revert, &user.email, &branch)
                .await;
        }
        Ok(())
    }
}

/// The submit pipeline proper. Any failure past the no-changes guard is
/// fatal to the request; the handle is released on every path.
fn submit_inner(
    factory: &RepositoryFactory,
    user: &UserProfile,
    message: &str,
) -> Result<String> {
    let repo = factory.open_for_user(user)?;
    if repo.is_undefined()? {
        return Err(AppError::InvalidRequest("no changes to submit".into()));
    }

    let timestamp = timestamp();
    let branch_name = format!("submit-{timestamp}");
    let title = format!("{}_{timestamp}", user.id);

    repo.stage_all_changes()?;
    let commit = repo.commit(user, message)?;
    repo.create_branch(&branch_name, "origin/master")?;
    repo.cherry_pick(commit)?;
    // A second commit concludes the cherry-pick, accommodating conflict
    // resolution in the general case.
    let picked = repo.commit(user, message)?;
    repo.create_review_unit(picked, &title)?;
    repo.checkout("master")?;
    Ok(title)
}

/// Dispatch blocking repository work to the blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("repository task failed: {e}")))?
}
