use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::middleware::{ActingIdentity, JsonBody};
use crate::service::performance::{
    self, ClassRollupPayload, PerformanceCriteria, PerformanceView, StudentMarksPayload,
};
use crate::{SchoolError, server::router::SchoolState};

pub async fn search_performance_handler(
    State(state): State<SchoolState>,
    JsonBody(criteria): JsonBody<PerformanceCriteria>,
) -> Result<Json<Vec<PerformanceView>>, SchoolError> {
    Ok(Json(
        performance::search_performance(&state.store, criteria).await?,
    ))
}

/// 201 with the new rows, or 200 when every row already existed.
pub async fn class_rollup_handler(
    State(state): State<SchoolState>,
    identity: ActingIdentity,
    JsonBody(payload): JsonBody<ClassRollupPayload>,
) -> Result<(StatusCode, Json<Value>), SchoolError> {
    let rollup = performance::create_class_rollup(&state.store, &identity, payload).await?;
    if rollup.inserted.is_empty() {
        return Ok((
            StatusCode::OK,
            Json(json!({
                "message": "All performance records already exist. No new entries added."
            })),
        ));
    }
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Performance records inserted successfully where missing.",
            "performances": rollup.inserted
        })),
    ))
}

pub async fn record_marks_handler(
    State(state): State<SchoolState>,
    identity: ActingIdentity,
    JsonBody(payload): JsonBody<StudentMarksPayload>,
) -> Result<(StatusCode, Json<Value>), SchoolError> {
    let record = performance::record_student_marks(&state.store, &identity, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Performance added successfully.", "data": record })),
    ))
}
