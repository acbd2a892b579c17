mod common;

use axum::http::StatusCode;
use schoolhub::SchoolError;
use schoolhub::middleware::ActingIdentity;
use schoolhub::service::identity::{
    authorize_teacher_write, resolve_claimed_principal, resolve_principal,
};
use schoolhub::types::Role;
use serde_json::json;

use common::{count, seeded_app, seeded_store, send};

#[tokio::test]
async fn resolves_a_unique_principal() {
    let store = seeded_store().await;
    let alice = resolve_principal(&store, "Alice", Role::Teacher)
        .await
        .expect("Alice should resolve");
    assert_eq!(alice.id, 1);
    assert_eq!(alice.role, Role::Teacher);
}

#[tokio::test]
async fn missing_principal_names_role_and_name() {
    let store = seeded_store().await;
    let err = resolve_principal(&store, "Zed", Role::Teacher)
        .await
        .expect_err("Zed does not exist");
    match err {
        SchoolError::NotFound(msg) => {
            assert!(msg.contains("teacher"), "{msg}");
            assert!(msg.contains("Zed"), "{msg}");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn name_match_is_exact_and_role_scoped() {
    let store = seeded_store().await;
    assert!(matches!(
        resolve_principal(&store, "alice", Role::Teacher).await,
        Err(SchoolError::NotFound(_))
    ));
    assert!(matches!(
        resolve_principal(&store, "Alice", Role::Student).await,
        Err(SchoolError::NotFound(_))
    ));
}

#[tokio::test]
async fn duplicate_names_are_ambiguous() {
    let store = seeded_store().await;
    assert!(matches!(
        resolve_principal(&store, "Eve", Role::Teacher).await,
        Err(SchoolError::Conflict(_))
    ));
}

#[tokio::test]
async fn claimed_role_is_lower_cased() {
    let store = seeded_store().await;
    let dana = resolve_claimed_principal(&store, &ActingIdentity::new("Dana", "Principal"))
        .await
        .expect("claim should resolve");
    assert_eq!(dana.id, 6);
}

#[tokio::test]
async fn teacher_write_requires_exact_teacher_claim() {
    let store = seeded_store().await;
    for identity in [
        ActingIdentity::new("Alice", "Teacher"),
        ActingIdentity::new("Alice", "student"),
        ActingIdentity::default(),
    ] {
        assert!(matches!(
            authorize_teacher_write(&store, &identity).await,
            Err(SchoolError::Unauthorized(_))
        ));
    }

    let ok = authorize_teacher_write(&store, &ActingIdentity::new("Alice", "teacher"))
        .await
        .expect("Alice is a teacher with a staff record");
    assert_eq!(ok.principal.id, 1);
    assert_eq!(ok.staff.id, 1);
}

#[tokio::test]
async fn teacher_without_staff_record_is_not_found() {
    let store = seeded_store().await;
    match authorize_teacher_write(&store, &ActingIdentity::new("Gina", "teacher")).await {
        Err(SchoolError::NotFound(msg)) => assert!(msg.contains("Gina"), "{msg}"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn write_with_wrong_role_is_401_and_writes_nothing() {
    let (app, store) = seeded_app().await;
    let before = count(&store, "exams").await;

    let (status, body) = send(
        &app,
        "POST",
        "/exams",
        Some(("John", "student")),
        Some(json!({
            "class": "5", "section": "A", "subject": "Art",
            "exam_date": "2025-05-01", "exam_duration": "1h", "exam_type": "Quiz"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert_eq!(count(&store, "exams").await, before);
}

#[tokio::test]
async fn notice_without_headers_is_400() {
    let (app, _store) = seeded_app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/notices",
        None,
        Some(json!({ "title": "t", "content": "c", "target_role": "student" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "User type and name must be provided in headers."
    );
}
