//! Application configuration loaded from environment variables.

use crate::error::{AppError, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (host:port)
    pub bind_address: String,

    /// JWT secret key for validating bearer tokens
    pub jwt_secret: String,

    /// Whether the version-controlled submission workflow is enabled
    pub version_control_enabled: bool,

    /// Directory holding one working repository per user
    pub repositories_dir: String,

    /// Path of the canonical (master) repository
    pub master_repo_dir: String,

    /// Directory holding pending (non-versioned) submission records
    pub submissions_dir: String,

    /// Subject/body templates for workflow notifications
    pub notifications: NotificationTemplates,
}

/// A notification subject/body pair. `{0}` in either string is replaced
/// with the event argument before dispatch.
#[derive(Debug, Clone)]
pub struct Template {
    pub subject: String,
    pub text: String,
}

/// Templates for each workflow event that notifies the submitter.
#[derive(Debug, Clone)]
pub struct NotificationTemplates {
    pub submit: Template,
    pub change: Template,
    pub remove: Template,
    pub revert: Template,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| AppError::Config("JWT_SECRET not set".into()))?,
            version_control_enabled: env::var("VERSION_CONTROL_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            repositories_dir: env::var("REPOSITORIES_DIR")
                .unwrap_or_else(|_| "/var/lib/registry-steward/users".into()),
            master_repo_dir: env::var("MASTER_REPO_DIR")
                .unwrap_or_else(|_| "/var/lib/registry-steward/master".into()),
            submissions_dir: env::var("SUBMISSIONS_DIR")
                .unwrap_or_else(|_| "/var/lib/registry-steward/submissions".into()),
            notifications: NotificationTemplates::from_env(),
        })
    }
}

impl NotificationTemplates {
    /// Load templates from the environment, falling back to built-in text.
    pub fn from_env() -> Self {
        Self {
            submit: template_from_env(
                "NOTIFY_SUBMIT",
                "Service submission {0}",
                "Your submission of {0} has been received and is pending review.",
            ),
            change: template_from_env(
                "NOTIFY_CHANGE",
                "Service change {0}",
                "Your requested change to {0} has been received and is pending review.",
            ),
            remove: template_from_env(
                "NOTIFY_REMOVE",
                "Service removal {0}",
                "Your request to remove {0} has been received and is pending review.",
            ),
            revert: template_from_env(
                "NOTIFY_REVERT",
                "Submission reverted {0}",
                "Your submission {0} has been reverted and withdrawn from review.",
            ),
        }
    }
}

fn template_from_env(prefix: &str, subject: &str, text: &str) -> Template {
    Template {
        subject: env::var(format!("{prefix}_SUBJECT")).unwrap_or_else(|_| subject.into()),
        text: env::var(format!("{prefix}_TEXT")).unwrap_or_else(|_| text.into()),
    }
}
