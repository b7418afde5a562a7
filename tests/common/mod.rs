//! Common test utilities for integration tests
//!
//! Builds a scratch directory tree (master repository, per-user clones,
//! submissions queue) and wires the services against it.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use registry_steward::config::{Config, NotificationTemplates};
use registry_steward::models::user::UserProfile;
use registry_steward::services::notification_service::NotificationService;
use registry_steward::services::queue_service::QueueService;
use registry_steward::services::register_service::RegisterService;
use registry_steward::services::registry_service::RegistryService;
use registry_steward::services::workflow_service::WorkflowService;
use registry_steward::vcs::{RepoLocks, RepositoryFactory};

/// Test context owning the scratch directories and the repository factory.
pub struct TestContext {
    pub root: TempDir,
    pub config: Config,
    pub factory: Arc<RepositoryFactory>,
}

impl TestContext {
    pub fn new() -> Self {
        let root = TempDir::new().expect("create temp dir");
        let config = Config {
            bind_address: "127.0.0.1:0".into(),
            jwt_secret: "test-secret".into(),
            version_control_enabled: true,
            repositories_dir: path_str(&root, "users"),
            master_repo_dir: path_str(&root, "master"),
            submissions_dir: path_str(&root, "queue"),
            notifications: NotificationTemplates::from_env(),
        };
        let factory = Arc::new(RepositoryFactory::new(&config));
        factory.ensure_master().expect("init master repository");
        std::fs::create_dir_all(&config.submissions_dir).expect("create queue dir");
        Self {
            root,
            config,
            factory,
        }
    }

    pub fn workflow(&self) -> WorkflowService {
        WorkflowService::new(
            self.factory.clone(),
            Arc::new(RepoLocks::new()),
            Arc::new(NotificationService::new(None)),
            self.config.notifications.clone(),
        )
    }

    pub fn register(&self) -> RegisterService {
        RegisterService::new(
            QueueService::new(&self.config.submissions_dir),
            RegistryService::new(&self.config.master_repo_dir),
            Arc::new(NotificationService::new(None)),
            self.config.notifications.clone(),
        )
    }

    /// Write a file into the user's working tree, cloning the repository
    /// on first use.
    pub fn write_user_file(&self, user: &UserProfile, name: &str, contents: &str) {
        self.factory
            .open_for_user(user)
            .expect("open user repository");
        let path = PathBuf::from(&self.config.repositories_dir)
            .join(&user.id)
            .join(name);
        std::fs::write(path, contents).expect("write working file");
    }

    pub fn user_file(&self, user: &UserProfile, name: &str) -> PathBuf {
        PathBuf::from(&self.config.repositories_dir)
            .join(&user.id)
            .join(name)
    }

    /// Publish a service file directly into the master working tree.
    pub fn publish_service(&self, filename: &str, body: &str) {
        let path = PathBuf::from(&self.config.master_repo_dir).join(filename);
        std::fs::write(path, body).expect("write service file");
    }

    pub fn queue_path(&self, name: &str) -> PathBuf {
        PathBuf::from(&self.config.submissions_dir).join(name)
    }
}

fn path_str(root: &TempDir, name: &str) -> String {
    root.path().join(name).to_string_lossy().into_owned()
}

pub fn profile(id: &str, email: &str, first: &str, family: &str) -> UserProfile {
    UserProfile {
        id: id.into(),
        email: email.into(),
        first_name: first.into(),
        family_name: family.into(),
    }
}

pub fn alice() -> UserProfile {
    profile("alice", "a@x.com", "Alice", "Adams")
}

pub fn bob() -> UserProfile {
    profile("bob", "b@x.com", "Bob", "Barnes")
}
