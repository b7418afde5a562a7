//! OpenAPI documentation built from handler annotations.

use serde::Serialize;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

/// Standard error body returned by every failing endpoint.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Stable machine-readable error code
    pub code: String,
    /// Human-readable reason
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Registry Steward API",
        description = "Submission, review, and promotion workflow for registered service definitions"
    ),
    paths(
        crate::api::handlers::submit::submit_pull,
        crate::api::handlers::submit::submits,
        crate::api::handlers::submit::revert_submit,
        crate::api::handlers::register::submit,
        crate::api::handlers::register::register_save,
        crate::api::handlers::register::remove,
        crate::api::handlers::register::get_register_service,
        crate::api::handlers::register::cancel,
        crate::api::handlers::register::promote,
        crate::api::handlers::register::list_pending,
    ),
    components(schemas(
        ErrorResponse,
        crate::api::dto::RegisterSaveRequest,
        crate::api::dto::PendingListResponse,
        crate::models::review::PendingRecord,
        crate::models::review::ReviewStatus,
        crate::models::review::ReviewSummary,
        crate::models::review::SubmissionKind,
        crate::models::service::RegisteredService,
        crate::models::service::ServiceContact,
        crate::models::user::SubmitterIdentity,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "submit", description = "Version-controlled submission workflow"),
        (name = "register", description = "Registration lifecycle")
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Build the OpenAPI spec once at startup.
pub fn build_openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
