//! Registration lifecycle handlers.
//!
//! End users submit, edit, and request removal of service definitions;
//! the requests queue as pending submission records until an administrator
//! processes them. Cancellation is reserved to the original submitter.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};

use crate::api::dto::{CancelParams, PendingListResponse, RegisterSaveRequest};
use crate::api::middleware::auth::AuthExtension;
use crate::api::SharedState;
use crate::error::Result;
use crate::models::service::RegisteredService;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(submit).patch(register_save))
        .route("/cancel", delete(cancel))
        .route("/promote/:id", get(promote))
        .route("/:id", get(get_register_service).delete(remove))
}

/// Administrator-only routes; composed behind the admin guard.
pub fn admin_router() -> Router<SharedState> {
    Router::new().route("/pending", get(list_pending))
}

/// Submit a new service registration to the pending queue.
#[utoipa::path(
    post,
    path = "",
    context_path = "/api/register",
    tag = "register",
    request_body = RegisteredService,
    responses(
        (status = 200, description = "Submission queued"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn submit(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
    Json(service): Json<RegisteredService>,
) -> Result<StatusCode> {
    state.register.submit_new(&auth.profile, service).await?;
    Ok(StatusCode::OK)
}

/// Save an edit of a published service or of a pending submission.
#[utoipa::path(
    patch,
    path = "",
    context_path = "/api/register",
    tag = "register",
    request_body = RegisterSaveRequest,
    responses(
        (status = 200, description = "Edit queued"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn register_save(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
    Json(request): Json<RegisterSaveRequest>,
) -> Result<StatusCode> {
    state
        .register
        .save_edit(&auth.profile, &request.id, request.service)
        .await?;
    Ok(StatusCode::OK)
}

/// Request removal of a published service.
#[utoipa::path(
    delete,
    path = "/{id}",
    context_path = "/api/register",
    tag = "register",
    params(("id" = i64, Path, description = "Assigned service id")),
    responses(
        (status = 200, description = "Removal request queued"),
        (status = 404, description = "Service not found", body = crate::api::openapi::ErrorResponse),
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.register.request_removal(&auth.profile, id).await?;
    Ok(StatusCode::OK)
}

/// Fetch a published service the caller owns.
#[utoipa::path(
    get,
    path = "/{id}",
    context_path = "/api/register",
    tag = "register",
    params(("id" = i64, Path, description = "Assigned service id")),
    responses(
        (status = 200, description = "The requested service", body = RegisteredService),
        (status = 403, description = "Caller is not a contact", body = crate::api::openapi::ErrorResponse),
        (status = 404, description = "Service not found", body = crate::api::openapi::ErrorResponse),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_register_service(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
    Path(id): Path<i64>,
) -> Result<Json<RegisteredService>> {
    let service = state.register.fetch_owned(&auth.profile, id).await?;
    Ok(Json(service))
}

/// Cancel a pending submission; original submitter only.
#[utoipa::path(
    delete,
    path = "/cancel",
    context_path = "/api/register",
    tag = "register",
    params(CancelParams),
    responses(
        (status = 200, description = "Submission cancelled"),
        (status = 403, description = "Caller is not the original submitter", body = crate::api::openapi::ErrorResponse),
        (status = 404, description = "No such pending submission", body = crate::api::openapi::ErrorResponse),
    ),
    security(("bearer_auth" = []))
)]
pub async fn cancel(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
    Query(params): Query<CancelParams>,
) -> Result<StatusCode> {
    state.register.cancel(&auth.profile, &params.id).await?;
    Ok(StatusCode::OK)
}

/// Promote a draft service to a fully published definition.
#[utoipa::path(
    get,
    path = "/promote/{id}",
    context_path = "/api/register",
    tag = "register",
    params(("id" = i64, Path, description = "Assigned service id")),
    responses(
        (status = 200, description = "Promotion queued"),
        (status = 404, description = "Service not found", body = crate::api::openapi::ErrorResponse),
    ),
    security(("bearer_auth" = []))
)]
pub async fn promote(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.register.promote(&auth.profile, id).await?;
    Ok(StatusCode::OK)
}

/// List pending submissions awaiting administrator action.
#[utoipa::path(
    get,
    path = "/pending",
    context_path = "/api/register",
    tag = "register",
    responses(
        (status = 200, description = "Pending submission records", body = PendingListResponse),
        (status = 403, description = "Administrator role required"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_pending(State(state): State<SharedState>) -> Result<Json<PendingListResponse>> {
    let items = state.register.list_pending().await?;
    let total = items.len();
    Ok(Json(PendingListResponse { items, total }))
}
