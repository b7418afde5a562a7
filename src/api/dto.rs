//! Shared Data Transfer Objects (DTOs) for API handlers.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::review::PendingRecord;
use crate::models::service::RegisteredService;

/// Body of a save-edit request: the target id (or pending filename) and
/// the updated service definition.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterSaveRequest {
    /// Numeric id of a published service, or the literal filename of a
    /// pending submission to overwrite
    pub id: String,
    pub service: RegisteredService,
}

/// Query parameters of a cancel request.
#[derive(Debug, Deserialize, IntoParams)]
pub struct CancelParams {
    /// Filename of the pending submission to cancel
    pub id: String,
}

/// Pending submissions listing for administrators.
#[derive(Debug, Serialize, ToSchema)]
pub struct PendingListResponse {
    pub items: Vec<PendingRecord>,
    /// Total number of records awaiting action
    pub total: usize,
}
