//! Repository handles and the factory that opens them.

use std::fmt;
use std::path::{Path, PathBuf};

use git2::{
    build::{CheckoutBuilder, RepoBuilder},
    BranchType, IndexAddOption, Oid, Repository, ResetType, Signature, StatusOptions,
};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::review::{ReviewStatus, ReviewSummary};
use crate::models::user::UserProfile;

/// Lock-registry key for the canonical repository.
pub const MASTER_LOCK_KEY: &str = "master";

/// Note message prefix marking a review unit as reverted.
const REVERTED_PREFIX: &str = "REVERTED:";

/// Identifier of a commit in either repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitId(Oid);

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A local branch reference: full ref name, short name, and head commit.
#[derive(Debug, Clone)]
pub struct BranchRef {
    pub ref_name: String,
    pub name: String,
    pub head: CommitId,
}

/// Opens per-user working repositories and the canonical master repository.
pub struct RepositoryFactory {
    repositories_dir: PathBuf,
    master_dir: PathBuf,
}

impl RepositoryFactory {
    pub fn new(config: &Config) -> Self {
        Self {
            repositories_dir: PathBuf::from(&config.repositories_dir),
            master_dir: PathBuf::from(&config.master_repo_dir),
        }
    }

    /// Directory of the canonical working tree, which doubles as the
    /// published service registry.
    pub fn master_workdir(&self) -> PathBuf {
        self.master_dir.clone()
    }

    /// Initialize the canonical repository on first boot: a non-bare init
    /// with an empty seed commit so clones have a `master` to track.
    pub fn ensure_master(&self) -> Result<()> {
        if self.master_dir.join(".git").exists() {
            return Ok(());
        }
        std::fs::create_dir_all(&self.master_dir)?;
        let repo = Repository::init(&self.master_dir)
            .map_err(|e| AppError::Repository(format!("cannot init master repository: {}", e.message())))?;
        repo.set_head("refs/heads/master")?;
        let sig = Signature::now("registry-steward", "steward@localhost")?;
        let tree_id = repo.index()?.write_tree()?;
        let tree = repo.find_tree(tree_id)?;
        repo.commit(Some("HEAD"), &sig, &sig, "Initialize registry", &tree, &[])?;
        tracing::info!(path = %self.master_dir.display(), "Initialized master repository");
        Ok(())
    }

    /// Open the user's working repository, cloning it from master on first
    /// use. Fails with a repository error when storage cannot be reached.
    pub fn open_for_user(&self, user: &UserProfile) -> Result<RepoHandle> {
        let path = self.repositories_dir.join(&user.id);
        if path.join(".git").exists() {
            return RepoHandle::open(&path);
        }
        std::fs::create_dir_all(&self.repositories_dir)?;
        let master = self.master_dir.to_string_lossy().into_owned();
        let repo = RepoBuilder::new()
            .clone(&master, &path)
            .map_err(|e| {
                AppError::Repository(format!(
                    "cannot create repository for {}: {}",
                    user.id,
                    e.message()
                ))
            })?;
        tracing::info!(user = %user.id, path = %path.display(), "Cloned working repository");
        Ok(RepoHandle { repo })
    }

    /// Open the canonical repository.
    pub fn open_master(&self) -> Result<RepoHandle> {
        RepoHandle::open(&self.master_dir)
    }
}

/// An open repository, scoped to one request. The underlying repository is
/// released on drop, including error paths.
pub struct RepoHandle {
    repo: Repository,
}

impl RepoHandle {
    fn open(path: &Path) -> Result<Self> {
        let repo = Repository::open(path).map_err(|e| {
            AppError::Repository(format!(
                "cannot open repository at {}: {}",
                path.display(),
                e.message()
            ))
        })?;
        Ok(Self { repo })
    }

    /// True when the working tree has no pending local changes relative to
    /// its branch head.
    pub fn is_undefined(&self) -> Result<bool> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true).recurse_untracked_dirs(true);
        let statuses = self.repo.statuses(Some(&mut opts))?;
        Ok(statuses.is_empty())
    }

    /// Stage every working-tree change, additions and deletions included.
    pub fn stage_all_changes(&self) -> Result<()> {
        let mut index = self.repo.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;
        Ok(())
    }

    /// Commit the staged index onto the current branch, authored by the
    /// acting user. Also concludes an in-progress cherry-pick.
    pub fn commit(&self, author: &UserProfile, message: &str) -> Result<CommitId> {
        let sig = Signature::now(&author.full_name(), &author.email)?;
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let parent = self.repo.head()?.peel_to_commit()?;
        let oid = self
            .repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &[&parent])?;
        self.repo.cleanup_state()?;
        Ok(CommitId(oid))
    }

    /// Create a branch at `start_point` and switch to it.
    pub fn create_branch(&self, name: &str, start_point: &str) -> Result<()> {
        let target = self
            .repo
            .revparse_single(start_point)?
            .peel_to_commit()?;
        self.repo.branch(name, &target, false)?;
        self.checkout(name)
    }

    /// Apply `commit` onto the current branch, leaving the result staged.
    /// The caller concludes it with [`RepoHandle::commit`].
    pub fn cherry_pick(&self, commit: CommitId) -> Result<()> {
        let c = self
            .repo
            .find_commit(commit.0)
            .map_err(|_| AppError::NotFound(format!("no commit {commit}")))?;
        self.repo.cherrypick(&c, None)?;
        Ok(())
    }

    /// Switch the working tree and HEAD to `branch`.
    pub fn checkout(&self, branch: &str) -> Result<()> {
        let (object, reference) = self.repo.revparse_ext(branch)?;
        let mut opts = CheckoutBuilder::new();
        opts.force();
        self.repo.checkout_tree(&object, Some(&mut opts))?;
        match reference.and_then(|r| r.name().map(str::to_string)) {
            Some(name) => self.repo.set_head(&name)?,
            None => self.repo.set_head_detached(object.id())?,
        }
        Ok(())
    }

    /// Short name of the currently checked-out branch.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        Ok(head.shorthand().unwrap_or_default().to_string())
    }

    /// Commit the current branch points at.
    pub fn head_commit(&self) -> Result<CommitId> {
        Ok(CommitId(self.repo.head()?.peel_to_commit()?.id()))
    }

    /// Hard-reset the current branch to `commit`, discarding later history
    /// on that branch.
    pub fn reset(&self, commit: CommitId) -> Result<()> {
        let object = self
            .repo
            .find_object(commit.0, None)
            .map_err(|_| AppError::NotFound(format!("no commit {commit}")))?;
        self.repo.reset(&object, ResetType::Hard, None)?;
        Ok(())
    }

    /// Lazily enumerate local branches. The iterator borrows the handle and
    /// is not restartable once the handle closes.
    pub fn branches(&self) -> Result<impl Iterator<Item = Result<BranchRef>> + '_> {
        let iter = self.repo.branches(Some(BranchType::Local))?;
        Ok(iter.map(|item| {
            let (branch, _) = item?;
            let ref_name = branch.get().name().unwrap_or_default().to_string();
            let name = branch.name()?.unwrap_or_default().to_string();
            let head = CommitId(branch.get().peel_to_commit()?.id());
            Ok(BranchRef { ref_name, name, head })
        }))
    }

    /// Publish the cherry-picked commit at the head of the current branch
    /// to the canonical repository as a review unit named `title`.
    pub fn create_review_unit(&self, commit: CommitId, title: &str) -> Result<String> {
        let head = self.repo.head()?;
        if head.peel_to_commit()?.id() != commit.0 {
            return Err(AppError::Internal(
                "review unit commit is not at the branch head".into(),
            ));
        }
        let src = head
            .name()
            .ok_or_else(|| AppError::Repository("current HEAD has no ref name".into()))?
            .to_string();
        let refspec = format!("+{src}:refs/heads/{title}");
        let mut remote = self.repo.find_remote("origin")?;
        remote.push(&[refspec.as_str()], None)?;
        Ok(title.to_string())
    }

    /// Record a revert against the review unit `title` in the canonical
    /// repository, attributed to `actor`.
    pub fn mark_reverted(&self, title: &str, actor: &UserProfile) -> Result<()> {
        let title = title.strip_prefix("refs/heads/").unwrap_or(title);
        let branch = self
            .repo
            .find_branch(title, BranchType::Local)
            .map_err(|_| AppError::NotFound(format!("no review unit named {title}")))?;
        let target = branch.get().peel_to_commit()?.id();
        let sig = Signature::now(&actor.full_name(), &actor.email)?;
        self.repo.note(
            &sig,
            &sig,
            None,
            target,
            &format!("{REVERTED_PREFIX}{}", actor.email),
            true,
        )?;
        Ok(())
    }

    /// Resolve the commit immediately preceding the named submission: the
    /// parent of the commit the submission branch points at. Accepts either
    /// the local `submit-<timestamp>` branch name or the review unit title
    /// `<userId>_<timestamp>`.
    pub fn find_commit_before_submission(&self, name: &str) -> Result<CommitId> {
        let name = name.strip_prefix("refs/heads/").unwrap_or(name);
        let branch = self
            .repo
            .find_branch(name, BranchType::Local)
            .or_else(|_| {
                let (_, timestamp) = name
                    .rsplit_once('_')
                    .ok_or_else(|| AppError::NotFound(format!("no submission named {name}")))?;
                self.repo
                    .find_branch(&format!("submit-{timestamp}"), BranchType::Local)
                    .map_err(|_| AppError::NotFound(format!("no submission named {name}")))
            })?;
        let head = branch.get().peel_to_commit()?;
        let parent = head
            .parent(0)
            .map_err(|_| AppError::NotFound(format!("submission {name} has no prior commit")))?;
        Ok(CommitId(parent.id()))
    }

    /// Build a review summary for a branch of the canonical repository.
    pub fn summarize(&self, branch: &BranchRef) -> Result<ReviewSummary> {
        let commit = self.repo.find_commit(branch.head.0)?;
        let message = commit.summary().unwrap_or_default().to_string();
        let status = self.unit_status(branch)?;
        Ok(ReviewSummary {
            branch: branch.name.clone(),
            title: branch.name.clone(),
            status,
            commit: branch.head.to_string(),
            message,
        })
    }

    /// Status of a review unit: a revert note wins; otherwise a unit whose
    /// head is reachable from master has been merged; otherwise it is open.
    fn unit_status(&self, branch: &BranchRef) -> Result<ReviewStatus> {
        if let Ok(note) = self.repo.find_note(None, branch.head.0) {
            if note
                .message()
                .map(|m| m.starts_with(REVERTED_PREFIX))
                .unwrap_or(false)
            {
                return Ok(ReviewStatus::Reverted);
            }
        }
        let master = self
            .repo
            .find_branch("master", BranchType::Local)?
            .get()
            .peel_to_commit()?
            .id();
        if master == branch.head.0 || self.repo.graph_descendant_of(master, branch.head.0)? {
            return Ok(ReviewStatus::Merged);
        }
        Ok(ReviewStatus::Open)
    }
}
