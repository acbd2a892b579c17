mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::{names, seeded_app, send};

#[tokio::test]
async fn empty_body_returns_every_learner() {
    let (app, _store) = seeded_app().await;
    let (status, rows) = send(&app, "POST", "/students/search", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows.as_array().map(Vec::len), Some(3));

    // Blank and null criteria behave the same as none.
    let (_, rows) = send(
        &app,
        "POST",
        "/students/search",
        None,
        Some(json!({ "name": "  ", "class": null, "section": "" })),
    )
    .await;
    assert_eq!(rows.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn substring_criteria_are_case_insensitive_and_unanchored() {
    let (app, _store) = seeded_app().await;
    let (status, rows) = send(
        &app,
        "POST",
        "/students/search",
        None,
        Some(json!({ "name": "JO" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let mut found = names(&rows, "student_name");
    found.sort();
    assert_eq!(found, vec!["John", "Major"]);
}

#[tokio::test]
async fn learner_keys_are_exact() {
    let (app, _store) = seeded_app().await;
    let (_, rows) = send(
        &app,
        "POST",
        "/students/search",
        None,
        Some(json!({ "admission_number": "ADM" })),
    )
    .await;
    assert_eq!(rows, json!([]));

    let (_, rows) = send(
        &app,
        "POST",
        "/students/search",
        None,
        Some(json!({ "class": 5, "section": "A", "parent_name": "mary" })),
    )
    .await;
    assert_eq!(names(&rows, "student_name"), vec!["Major"]);
}

#[tokio::test]
async fn learner_profile_and_missing_learner() {
    let (app, _store) = seeded_app().await;
    let (status, row) = send(&app, "GET", "/students/1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(row["student_name"], "John");
    assert_eq!(row["parent_name"], "Peter Parker");

    let (status, body) = send(&app, "GET", "/students/999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn non_numeric_learner_id_is_a_json_validation_error() {
    let (app, _store) = seeded_app().await;
    let (status, body) = send(&app, "GET", "/students/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn empty_body_means_unfiltered_on_every_search() {
    let (app, _store) = seeded_app().await;
    let cases = [
        ("/exams/search", 2),
        ("/assignments/search", 1),
        ("/attendance/search", 7),
        ("/performance/search", 0),
        ("/notes/search", 0),
        ("/teachers/routine/search", 2),
        ("/students/routine/search", 2),
        ("/teachers/class-teachers/search", 2),
    ];
    for (uri, expected) in cases {
        let (status, rows) = send(&app, "POST", uri, None, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(rows.as_array().map(Vec::len), Some(expected), "{uri}");
    }
}

#[tokio::test]
async fn parent_search_with_no_match_is_empty() {
    let (app, _store) = seeded_app().await;
    let (status, rows) = send(
        &app,
        "POST",
        "/parents/search",
        None,
        Some(json!({ "name": "nobody" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows, json!([]));

    let (_, rows) = send(&app, "GET", "/parents", None, None).await;
    assert_eq!(rows.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn class_teachers_keep_rows_without_representatives() {
    let (app, _store) = seeded_app().await;
    let (status, rows) = send(&app, "GET", "/teachers/class-teachers", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = rows.as_array().expect("array").clone();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0]["teacher_name"], "Alice");
    assert_eq!(rows[0]["cr1_name"], "John");
    assert_eq!(rows[0]["cr2_name"], Value::Null);
    assert_eq!(rows[1]["teacher_name"], "Bob");
    assert_eq!(rows[1]["cr1_name"], Value::Null);
    assert_eq!(rows[1]["cr2_name"], "Carol");
}

#[tokio::test]
async fn representative_name_matches_either_slot() {
    let (app, _store) = seeded_app().await;

    let (_, rows) = send(
        &app,
        "POST",
        "/teachers/class-teachers/search",
        None,
        Some(json!({ "crName": "john" })),
    )
    .await;
    assert_eq!(names(&rows, "teacher_name"), vec!["Alice"]);

    let (_, rows) = send(
        &app,
        "POST",
        "/teachers/class-teachers/search",
        None,
        Some(json!({ "crName": "CAR" })),
    )
    .await;
    assert_eq!(names(&rows, "teacher_name"), vec!["Bob"]);

    let (_, rows) = send(
        &app,
        "POST",
        "/teachers/class-teachers/search",
        None,
        Some(json!({ "crName": "nobody" })),
    )
    .await;
    assert_eq!(rows, json!([]));
}

#[tokio::test]
async fn teacher_list_and_routines() {
    let (app, _store) = seeded_app().await;
    let (_, rows) = send(&app, "GET", "/teachers", None, None).await;
    assert_eq!(rows.as_array().map(Vec::len), Some(5));

    let (_, rows) = send(
        &app,
        "POST",
        "/teachers/routine/search",
        None,
        Some(json!({ "teacherName": "ali", "day": "mon" })),
    )
    .await;
    let rows = rows.as_array().expect("array").clone();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["teacher_subject"], "Math");

    let (_, rows) = send(
        &app,
        "POST",
        "/students/routine/search",
        None,
        Some(json!({ "teacherSubject": "science" })),
    )
    .await;
    assert_eq!(names(&rows, "teacher_name"), vec!["Bob"]);
}

#[tokio::test]
async fn exams_filter_by_exact_date() {
    let (app, _store) = seeded_app().await;
    let (_, rows) = send(
        &app,
        "POST",
        "/exams/search",
        None,
        Some(json!({ "examDate": "2025-04-10" })),
    )
    .await;
    assert_eq!(names(&rows, "subject"), vec!["Science"]);

    let (status, _) = send(
        &app,
        "POST",
        "/exams/search",
        None,
        Some(json!({ "examDate": "April" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn like_metacharacters_are_literal() {
    let (app, _store) = seeded_app().await;
    let (_, rows) = send(
        &app,
        "POST",
        "/assignments/search",
        None,
        Some(json!({ "title": "%" })),
    )
    .await;
    assert_eq!(rows, json!([]));

    let (_, rows) = send(
        &app,
        "POST",
        "/assignments/search",
        None,
        Some(json!({ "teacherName": "alice" })),
    )
    .await;
    let rows = rows.as_array().expect("array").clone();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["assigned_by"], "Alice");
}

#[tokio::test]
async fn attendance_filters_by_month_name() {
    let (app, _store) = seeded_app().await;
    let (status, rows) = send(
        &app,
        "POST",
        "/attendance/search",
        None,
        Some(json!({ "month": "february", "studentName": "john" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = rows.as_array().expect("array").clone();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["class_teacher"], "Alice");

    let (_, rows) = send(
        &app,
        "POST",
        "/attendance/search",
        None,
        Some(json!({ "month": "March" })),
    )
    .await;
    assert_eq!(rows, json!([]));

    let (status, body) = send(
        &app,
        "POST",
        "/attendance/search",
        None,
        Some(json!({ "month": "Febtober" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn monthly_attendance_reports_present_count_and_days_in_month() {
    let (app, _store) = seeded_app().await;
    let (status, rows) = send(&app, "POST", "/attendance/monthly", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        rows,
        json!([
            { "class": "5", "section": "A", "year": 2024, "month": 2, "total_present": 3, "monthly_total": 29 },
            { "class": "6", "section": "B", "year": 1900, "month": 2, "total_present": 1, "monthly_total": 28 },
            { "class": "6", "section": "B", "year": 2000, "month": 2, "total_present": 1, "monthly_total": 29 }
        ])
    );

    let (_, rows) = send(
        &app,
        "POST",
        "/attendance/monthly",
        None,
        Some(json!({ "className": "6" })),
    )
    .await;
    assert_eq!(rows.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn malformed_body_is_a_validation_error() {
    let (app, _store) = seeded_app().await;
    let resp = send(
        &app,
        "POST",
        "/students/search",
        None,
        Some(json!({ "name": { "nested": true } })),
    )
    .await;
    assert_eq!(resp.0, StatusCode::BAD_REQUEST);
}
