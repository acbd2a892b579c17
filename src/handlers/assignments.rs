use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::middleware::{ActingIdentity, JsonBody};
use crate::service::assignments::{self, AssignmentCriteria, AssignmentView, NewAssignmentPayload};
use crate::{SchoolError, server::router::SchoolState};

pub async fn search_assignments_handler(
    State(state): State<SchoolState>,
    JsonBody(criteria): JsonBody<AssignmentCriteria>,
) -> Result<Json<Vec<AssignmentView>>, SchoolError> {
    Ok(Json(
        assignments::search_assignments(&state.store, criteria).await?,
    ))
}

pub async fn create_assignment_handler(
    State(state): State<SchoolState>,
    identity: ActingIdentity,
    JsonBody(payload): JsonBody<NewAssignmentPayload>,
) -> Result<(StatusCode, Json<Value>), SchoolError> {
    let assignment = assignments::create_assignment(&state.store, &identity, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Assignment created successfully.",
            "assignment": assignment
        })),
    ))
}
