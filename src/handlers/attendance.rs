use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::middleware::{ActingIdentity, JsonBody};
use crate::service::attendance::{
    self, AttendanceCriteria, AttendanceView, MonthlyAttendance, MonthlyAttendanceCriteria,
    NewAttendancePayload,
};
use crate::{SchoolError, server::router::SchoolState};

pub async fn record_attendance_handler(
    State(state): State<SchoolState>,
    identity: ActingIdentity,
    JsonBody(payload): JsonBody<NewAttendancePayload>,
) -> Result<(StatusCode, Json<Value>), SchoolError> {
    let attendance = attendance::record_attendance(&state.store, &identity, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Attendance recorded successfully.",
            "attendance": attendance
        })),
    ))
}

pub async fn search_attendance_handler(
    State(state): State<SchoolState>,
    JsonBody(criteria): JsonBody<AttendanceCriteria>,
) -> Result<Json<Vec<AttendanceView>>, SchoolError> {
    Ok(Json(
        attendance::search_attendance(&state.store, criteria).await?,
    ))
}

pub async fn monthly_attendance_handler(
    State(state): State<SchoolState>,
    JsonBody(criteria): JsonBody<MonthlyAttendanceCriteria>,
) -> Result<Json<Vec<MonthlyAttendance>>, SchoolError> {
    Ok(Json(
        attendance::monthly_attendance(&state.store, criteria).await?,
    ))
}
