//! Business logic services.

pub mod notification_service;
pub mod queue_service;
pub mod register_service;
pub mod registry_service;
pub mod workflow_service;
