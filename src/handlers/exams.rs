use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::db::models::DbExam;
use crate::middleware::{ActingIdentity, JsonBody};
use crate::service::exams::{self, ExamCriteria, NewExamPayload};
use crate::{SchoolError, server::router::SchoolState};

pub async fn search_exams_handler(
    State(state): State<SchoolState>,
    JsonBody(criteria): JsonBody<ExamCriteria>,
) -> Result<Json<Vec<DbExam>>, SchoolError> {
    Ok(Json(exams::search_exams(&state.store, criteria).await?))
}

pub async fn create_exam_handler(
    State(state): State<SchoolState>,
    identity: ActingIdentity,
    JsonBody(payload): JsonBody<NewExamPayload>,
) -> Result<(StatusCode, Json<Value>), SchoolError> {
    let exam = exams::create_exam(&state.store, &identity, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Exam scheduled successfully.", "exam": exam })),
    ))
}
