//! API module - HTTP handlers and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;

use std::sync::Arc;

use crate::config::Config;
use crate::services::register_service::RegisterService;
use crate::services::workflow_service::WorkflowService;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub workflow: Arc<WorkflowService>,
    pub register: Arc<RegisterService>,
}

impl AppState {
    pub fn new(
        config: Config,
        workflow: Arc<WorkflowService>,
        register: Arc<RegisterService>,
    ) -> Self {
        Self {
            config,
            workflow,
            register,
        }
    }
}

pub type SharedState = Arc<AppState>;
