//! Version-controlled submission handlers.
//!
//! Endpoints for committing a user's working changes into a review unit,
//! listing the caller's outstanding units, and reverting a rejected one.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::api::middleware::auth::AuthExtension;
use crate::api::SharedState;
use crate::error::Result;
use crate::models::review::ReviewSummary;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(submit_pull).get(submits))
        .route("/revert/:branch", get(revert_submit))
}

/// Commit the caller's working changes and publish them for review.
#[utoipa::path(
    post,
    path = "",
    context_path = "/api/submit",
    tag = "submit",
    request_body(content = String, description = "Free-text submission message"),
    responses(
        (status = 200, description = "Submission published for review"),
        (status = 400, description = "No changes to submit", body = crate::api::openapi::ErrorResponse),
    ),
    security(("bearer_auth" = []))
)]
pub async fn submit_pull(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
    message: String,
) -> Result<StatusCode> {
    state
        .workflow
        .submit_for_review(&auth.profile, message)
        .await?;
    Ok(StatusCode::OK)
}

/// List the caller's submitted review units.
#[utoipa::path(
    get,
    path = "",
    context_path = "/api/submit",
    tag = "submit",
    responses(
        (status = 200, description = "Review units owned by the caller", body = [ReviewSummary]),
    ),
    security(("bearer_auth" = []))
)]
pub async fn submits(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
) -> Result<Json<Vec<ReviewSummary>>> {
    let units = state.workflow.list_review_units(&auth.profile).await?;
    Ok(Json(units))
}

/// Revert a submission that was rejected by an administrator.
#[utoipa::path(
    get,
    path = "/revert/{branch}",
    context_path = "/api/submit",
    tag = "submit",
    params(("branch" = String, Path, description = "Review unit to revert")),
    responses(
        (status = 200, description = "Submission reverted"),
        (status = 404, description = "Unit or prior commit not found", body = crate::api::openapi::ErrorResponse),
    ),
    security(("bearer_auth" = []))
)]
pub async fn revert_submit(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
    Path(branch): Path<String>,
) -> Result<StatusCode> {
    state
        .workflow
        .revert_submission(&auth.profile, branch)
        .await?;
    Ok(StatusCode::OK)
}
