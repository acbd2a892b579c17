#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use schoolhub::db::SchoolStore;
use schoolhub::server::router::{SchoolState, school_router};
use serde_json::Value;
use tower::ServiceExt;

/// Users 1-2 and 8 are teachers (8 has no staff record), 3-5 students,
/// 6 a principal, 7 and 9 two teachers sharing the name "Eve".
pub const SEED: &str = r#"
INSERT INTO users (id, name, role, phone, photo) VALUES
    (1, 'Alice', 'teacher', '111', 'alice.png'),
    (2, 'Bob', 'teacher', '222', NULL),
    (3, 'John', 'student', '333', 'john.png'),
    (4, 'Major', 'student', '444', NULL),
    (5, 'Carol', 'student', NULL, NULL),
    (6, 'Dana', 'principal', NULL, NULL),
    (7, 'Eve', 'teacher', NULL, NULL),
    (8, 'Gina', 'teacher', NULL, NULL),
    (9, 'Eve', 'teacher', NULL, NULL);

INSERT INTO teachers (id, user_id, assigned_class, assigned_section, specialised_subject) VALUES
    (1, 1, '5', 'A', 'Math'),
    (2, 2, '6', 'B', 'Science'),
    (3, 7, NULL, NULL, 'Art'),
    (4, 9, NULL, NULL, 'Music');

INSERT INTO students (id, user_id, admission_number, roll_number, class, section, parent_name, parent_phone) VALUES
    (1, 3, 'ADM1', 1, '5', 'A', 'Peter Parker', '900'),
    (2, 4, 'ADM2', 2, '5', 'A', 'Mary Jane', '901'),
    (3, 5, 'ADM3', 1, '6', 'B', 'Ned Leeds', '902');

INSERT INTO class_teachers (id, teacher_id, class, section, class_representative_student_id, second_class_representative_student_id) VALUES
    (1, 1, '5', 'A', 1, NULL),
    (2, 2, '6', 'B', NULL, 3);

INSERT INTO teacher_routine (id, user_id, day, class, section, time_slot) VALUES
    (1, 1, 'Monday', '5', 'A', '09:00-10:00'),
    (2, 2, 'Tuesday', '6', 'B', '10:00-11:00');

INSERT INTO student_routine (id, class, section, day, time_slot, teacher_name, teacher_subject) VALUES
    (1, '5', 'A', 'Monday', '09:00-10:00', 'Alice', 'Math'),
    (2, '6', 'B', 'Tuesday', '10:00-11:00', 'Bob', 'Science');

INSERT INTO exams (id, class, section, subject, exam_date, exam_duration, exam_type, created_by) VALUES
    (1, '5', 'A', 'Math', '2025-03-10', '2h', 'Midterm', 1),
    (2, '5', 'A', 'Science', '2025-04-10', '1h', 'Final', 1);

INSERT INTO assignments (id, title, description, subject, class, section, assigned_by, due_date, file) VALUES
    (1, 'Fractions worksheet', NULL, 'Math', '5', 'A', 1, '2025-03-01', NULL);

INSERT INTO attendance (student_id, teacher_id, class, section, date, status) VALUES
    (1, 1, '5', 'A', '2024-02-01', 'Present'),
    (1, 1, '5', 'A', '2024-02-02', 'Absent'),
    (1, 1, '5', 'A', '2024-02-03', 'Present'),
    (2, 1, '5', 'A', '2024-02-01', 'Present'),
    (3, 2, '6', 'B', '1900-02-10', 'Present'),
    (3, 2, '6', 'B', '2000-02-15', 'Present'),
    (3, 2, '6', 'B', '2000-02-16', 'Medical')
"#;

pub async fn seeded_store() -> SchoolStore {
    let store = SchoolStore::in_memory()
        .await
        .expect("failed to open in-memory store");
    for stmt in SEED.split(';') {
        let stmt = stmt.trim();
        if stmt.is_empty() {
            continue;
        }
        sqlx::query(stmt)
            .execute(store.pool())
            .await
            .expect("failed to seed store");
    }
    store
}

pub async fn seeded_app() -> (Router, SchoolStore) {
    let store = seeded_store().await;
    let app = school_router(SchoolState::new(store.clone()));
    (app, store)
}

pub async fn count(store: &SchoolStore, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(store.pool())
        .await
        .expect("count query failed")
}

/// Send one request; `identity` is `(name, role)` for the identity headers.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    identity: Option<(&str, &str)>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((name, role)) = identity {
        builder = builder.header("name", name).header("user", role);
    }
    let body = match body {
        Some(v) => Body::from(v.to_string()),
        None => Body::empty(),
    };
    let resp = app
        .clone()
        .oneshot(
            builder
                .header("content-type", "application/json")
                .body(body)
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");

    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body was not JSON")
    };
    (status, value)
}

pub fn names(rows: &Value, field: &str) -> Vec<String> {
    rows.as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|r| r[field].as_str().unwrap_or_default().to_string())
        .collect()
}
