use axum::{Json, extract::State};

use crate::db::models::DbPrincipal;
use crate::middleware::JsonBody;
use crate::service::staff::{
    self, ClassTeacherCriteria, ClassTeacherView, TeacherRoutineCriteria, TeacherRoutineView,
};
use crate::{SchoolError, server::router::SchoolState};

pub async fn list_teachers_handler(
    State(state): State<SchoolState>,
) -> Result<Json<Vec<DbPrincipal>>, SchoolError> {
    Ok(Json(staff::list_teachers(&state.store).await?))
}

pub async fn list_class_teachers_handler(
    State(state): State<SchoolState>,
) -> Result<Json<Vec<ClassTeacherView>>, SchoolError> {
    Ok(Json(staff::list_class_teachers(&state.store).await?))
}

pub async fn search_class_teachers_handler(
    State(state): State<SchoolState>,
    JsonBody(criteria): JsonBody<ClassTeacherCriteria>,
) -> Result<Json<Vec<ClassTeacherView>>, SchoolError> {
    Ok(Json(
        staff::search_class_teachers(&state.store, criteria).await?,
    ))
}

pub async fn search_teacher_routine_handler(
    State(state): State<SchoolState>,
    JsonBody(criteria): JsonBody<TeacherRoutineCriteria>,
) -> Result<Json<Vec<TeacherRoutineView>>, SchoolError> {
    Ok(Json(
        staff::search_teacher_routine(&state.store, criteria).await?,
    ))
}
