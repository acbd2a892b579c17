use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use crate::middleware::JsonBody;
use crate::service::students::{
    self, ClassRoutineCriteria, ClassRoutineEntry, LearnerCriteria, LearnerView, ParentView,
};
use crate::{SchoolError, server::router::SchoolState};

pub async fn search_students_handler(
    State(state): State<SchoolState>,
    JsonBody(criteria): JsonBody<LearnerCriteria>,
) -> Result<Json<Vec<LearnerView>>, SchoolError> {
    Ok(Json(
        students::search_learners(&state.store, criteria).await?,
    ))
}

pub async fn student_profile_handler(
    State(state): State<SchoolState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<LearnerView>, SchoolError> {
    let Path(id) = id.map_err(|rejection| SchoolError::validation(rejection.body_text()))?;
    Ok(Json(students::learner_profile(&state.store, id).await?))
}

pub async fn search_class_routine_handler(
    State(state): State<SchoolState>,
    JsonBody(criteria): JsonBody<ClassRoutineCriteria>,
) -> Result<Json<Vec<ClassRoutineEntry>>, SchoolError> {
    Ok(Json(
        students::search_class_routine(&state.store, criteria).await?,
    ))
}

pub async fn list_parents_handler(
    State(state): State<SchoolState>,
) -> Result<Json<Vec<ParentView>>, SchoolError> {
    Ok(Json(students::list_parents(&state.store).await?))
}

pub async fn search_parents_handler(
    State(state): State<SchoolState>,
    JsonBody(criteria): JsonBody<LearnerCriteria>,
) -> Result<Json<Vec<ParentView>>, SchoolError> {
    Ok(Json(
        students::search_parents(&state.store, criteria).await?,
    ))
}
