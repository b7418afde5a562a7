//! Integration tests for the registration lifecycle.

mod common;

use common::{alice, bob, TestContext};
use registry_steward::error::AppError;
use registry_steward::models::review::SubmissionKind;
use registry_steward::models::service::RegisteredService;

fn service(json: &str) -> RegisteredService {
    serde_json::from_str(json).expect("parse service")
}

#[tokio::test]
async fn submit_new_with_assigned_id_uses_it() {
    let ctx = TestContext::new();
    let register = ctx.register();

    register
        .submit_new(&alice(), service(r#"{"id": 7, "name": "seven"}"#))
        .await
        .unwrap();
    assert!(ctx.queue_path("submit-7.json").exists());
}

#[tokio::test]
async fn submit_new_without_id_gets_surrogate() {
    let ctx = TestContext::new();
    let register = ctx.register();

    register
        .submit_new(&alice(), service(r#"{"name": "fresh"}"#))
        .await
        .unwrap();

    let pending = register.list_pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].kind, SubmissionKind::Submit);
    assert!(pending[0].filename.starts_with("submit-"));
    assert_eq!(pending[0].submitter.email, "a@x.com");
}

#[tokio::test]
async fn cancel_is_reserved_to_the_original_submitter() {
    let ctx = TestContext::new();
    let register = ctx.register();

    register
        .submit_new(&alice(), service(r#"{"id": 7, "name": "seven"}"#))
        .await
        .unwrap();

    let err = register
        .cancel(&bob(), "submit-7.json")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AccessDenied(_)));
    assert!(ctx.queue_path("submit-7.json").exists());

    register.cancel(&alice(), "submit-7.json").await.unwrap();
    assert!(!ctx.queue_path("submit-7.json").exists());
}

#[tokio::test]
async fn cancel_email_check_is_case_sensitive() {
    let ctx = TestContext::new();
    let register = ctx.register();

    register
        .submit_new(&alice(), service(r#"{"id": 7, "name": "seven"}"#))
        .await
        .unwrap();

    let shouting = common::profile("alice", "A@X.COM", "Alice", "Adams");
    let err = register
        .cancel(&shouting, "submit-7.json")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AccessDenied(_)));
}

#[tokio::test]
async fn removal_request_queues_the_published_service() {
    let ctx = TestContext::new();
    let register = ctx.register();
    ctx.publish_service(
        "app-42.json",
        r#"{"id": 42, "name": "app", "contacts": [{"email": "b@x.com"}]}"#,
    );

    register.request_removal(&bob(), 42).await.unwrap();

    let body = std::fs::read(ctx.queue_path("remove-42.json")).unwrap();
    let queued: RegisteredService = serde_json::from_slice(&body).unwrap();
    assert_eq!(queued.id, 42);
    assert_eq!(queued.name, "app");

    // Only the original submitter may cancel it.
    let err = register
        .cancel(&alice(), "remove-42.json")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AccessDenied(_)));
}

#[tokio::test]
async fn removal_of_unknown_service_is_not_found() {
    let ctx = TestContext::new();
    let register = ctx.register();
    let err = register.request_removal(&alice(), 404).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn fetch_owned_requires_contact_match() {
    let ctx = TestContext::new();
    let register = ctx.register();
    ctx.publish_service(
        "app-42.json",
        r#"{"id": 42, "name": "app", "contacts": [{"email": "B@X.com"}]}"#,
    );

    // Ownership matching is case-insensitive.
    let svc = register.fetch_owned(&bob(), 42).await.unwrap();
    assert_eq!(svc.name, "app");

    let err = register.fetch_owned(&alice(), 42).await.unwrap_err();
    assert!(matches!(err, AppError::AccessDenied(_)));
}

#[tokio::test]
async fn save_edit_with_numeric_id_targets_published_service() {
    let ctx = TestContext::new();
    let register = ctx.register();

    register
        .save_edit(&alice(), "42", service(r#"{"id": 42, "name": "app"}"#))
        .await
        .unwrap();
    assert!(ctx.queue_path("edit-42.json").exists());
}

#[tokio::test]
async fn save_edit_with_literal_name_overwrites_pending_record() {
    let ctx = TestContext::new();
    let register = ctx.register();

    register
        .submit_new(&alice(), service(r#"{"id": 7, "name": "seven"}"#))
        .await
        .unwrap();
    register
        .save_edit(
            &alice(),
            "submit-7.json",
            service(r#"{"id": 7, "name": "seven renamed"}"#),
        )
        .await
        .unwrap();

    let body = std::fs::read(ctx.queue_path("submit-7.json")).unwrap();
    let queued: RegisteredService = serde_json::from_slice(&body).unwrap();
    assert_eq!(queued.name, "seven renamed");
    assert!(!ctx.queue_path("edit-7.json").exists());
}

#[tokio::test]
async fn promote_strips_environment_restriction() {
    let ctx = TestContext::new();
    let register = ctx.register();
    ctx.publish_service(
        "draft-9.json",
        r#"{"id": 9, "name": "draft", "environments": ["staging"], "contacts": [{"email": "a@x.com"}]}"#,
    );

    register.promote(&alice(), 9).await.unwrap();

    let body = std::fs::read(ctx.queue_path("edit-9.json")).unwrap();
    let queued: RegisteredService = serde_json::from_slice(&body).unwrap();
    assert_eq!(queued.id, 9);
    assert!(queued.environments.is_none());
}

#[tokio::test]
async fn pending_listing_covers_every_kind() {
    let ctx = TestContext::new();
    let register = ctx.register();
    ctx.publish_service(
        "app-42.json",
        r#"{"id": 42, "name": "app", "contacts": [{"email": "b@x.com"}]}"#,
    );

    register
        .submit_new(&alice(), service(r#"{"id": 7, "name": "seven"}"#))
        .await
        .unwrap();
    register
        .save_edit(&bob(), "42", service(r#"{"id": 42, "name": "app"}"#))
        .await
        .unwrap();
    register.request_removal(&bob(), 42).await.unwrap();

    let pending = register.list_pending().await.unwrap();
    assert_eq!(pending.len(), 3);
    assert_eq!(register.pending_count().await, 3);

    let kinds: Vec<_> = pending.iter().map(|r| r.kind).collect();
    assert!(kinds.contains(&SubmissionKind::Submit));
    assert!(kinds.contains(&SubmissionKind::Edit));
    assert!(kinds.contains(&SubmissionKind::Remove));
}
