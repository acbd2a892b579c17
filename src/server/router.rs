use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::db::SchoolStore;
use crate::handlers::{
    assignments::{create_assignment_handler, search_assignments_handler},
    attendance::{monthly_attendance_handler, record_attendance_handler, search_attendance_handler},
    bulletin::{
        add_notice_handler, create_note_handler, list_notices_handler, search_notes_handler,
    },
    exams::{create_exam_handler, search_exams_handler},
    performance::{class_rollup_handler, record_marks_handler, search_performance_handler},
    staff::{
        list_class_teachers_handler, list_teachers_handler, search_class_teachers_handler,
        search_teacher_routine_handler,
    },
    students::{
        list_parents_handler, search_class_routine_handler, search_parents_handler,
        search_students_handler, student_profile_handler,
    },
};

const BODY_LIMIT: usize = 1024 * 1024;

#[derive(Clone)]
pub struct SchoolState {
    pub store: SchoolStore,
}

impl SchoolState {
    pub fn new(store: SchoolStore) -> Self {
        Self { store }
    }
}

pub fn school_router(state: SchoolState) -> Router {
    Router::new()
        .route("/teachers", get(list_teachers_handler))
        .route("/teachers/class-teachers", get(list_class_teachers_handler))
        .route(
            "/teachers/class-teachers/search",
            post(search_class_teachers_handler),
        )
        .route(
            "/teachers/routine/search",
            post(search_teacher_routine_handler),
        )
        .route("/exams", post(create_exam_handler))
        .route("/exams/search", post(search_exams_handler))
        .route("/assignments", post(create_assignment_handler))
        .route("/assignments/search", post(search_assignments_handler))
        .route("/students/search", post(search_students_handler))
        .route("/students/routine/search", post(search_class_routine_handler))
        .route("/students/{id}", get(student_profile_handler))
        .route("/parents", get(list_parents_handler))
        .route("/parents/search", post(search_parents_handler))
        .route("/attendance", post(record_attendance_handler))
        .route("/attendance/search", post(search_attendance_handler))
        .route("/attendance/monthly", post(monthly_attendance_handler))
        .route("/performance/search", post(search_performance_handler))
        .route("/performance/class", post(class_rollup_handler))
        .route("/performance/student", post(record_marks_handler))
        .route("/notes", post(create_note_handler))
        .route("/notes/search", post(search_notes_handler))
        .route("/notices", get(list_notices_handler).post(add_notice_handler))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(state)
}
