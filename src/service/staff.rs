//! Teacher directory, class-teacher assignments and teacher routines.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite};

use crate::db::SchoolStore;
use crate::db::models::DbPrincipal;
use crate::error::SchoolError;
use crate::service::filter::Predicate;
use crate::types::criteria::blank_as_none;
use crate::types::role::Role;

pub async fn list_teachers(store: &SchoolStore) -> Result<Vec<DbPrincipal>, SchoolError> {
    store.principals_with_role(Role::Teacher).await
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassTeacherCriteria {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub teacher_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub section: Option<String>,
    /// Matches either class representative.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub cr_name: Option<String>,
}

/// A class-teacher assignment with both representatives flattened in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct ClassTeacherView {
    pub teacher_id: i64,
    pub teacher_name: String,
    pub teacher_photo: Option<String>,
    pub class: String,
    pub section: String,
    pub cr1_name: Option<String>,
    pub cr1_phone: Option<String>,
    pub cr1_photo: Option<String>,
    pub cr2_name: Option<String>,
    pub cr2_phone: Option<String>,
    pub cr2_photo: Option<String>,
}

const CLASS_TEACHER_SELECT: &str = r#"
    SELECT
        t.id AS teacher_id,
        tu.name AS teacher_name,
        tu.photo AS teacher_photo,
        ct.class AS class,
        ct.section AS section,
        c1u.name AS cr1_name,
        c1u.phone AS cr1_phone,
        c1u.photo AS cr1_photo,
        c2u.name AS cr2_name,
        c2u.phone AS cr2_phone,
        c2u.photo AS cr2_photo
    FROM class_teachers ct
    JOIN teachers t ON ct.teacher_id = t.id
    JOIN users tu ON t.user_id = tu.id
    LEFT JOIN students c1 ON ct.class_representative_student_id = c1.id
    LEFT JOIN users c1u ON c1.user_id = c1u.id
    LEFT JOIN students c2 ON ct.second_class_representative_student_id = c2.id
    LEFT JOIN users c2u ON c2.user_id = c2u.id"#;

pub async fn list_class_teachers(
    store: &SchoolStore,
) -> Result<Vec<ClassTeacherView>, SchoolError> {
    search_class_teachers(store, ClassTeacherCriteria::default()).await
}

/// Class-teacher search.
///
/// The representative-name criterion runs in two steps: the ids of learners
/// whose name matches are resolved first, then assignments naming any of
/// them in either representative slot are kept.
pub async fn search_class_teachers(
    store: &SchoolStore,
    criteria: ClassTeacherCriteria,
) -> Result<Vec<ClassTeacherView>, SchoolError> {
    let mut predicate = Predicate::scoped("ct")
        .contains("class", criteria.class_name.as_deref())
        .contains("section", criteria.section.as_deref())
        .and(Predicate::scoped("tu").contains("name", criteria.teacher_name.as_deref()));

    if let Some(cr_name) = criteria.cr_name.as_deref() {
        let learner_ids = learner_ids_named(store, cr_name).await?;
        predicate = predicate.either(vec![
            Predicate::scoped("ct").any_of("class_representative_student_id", learner_ids.clone()),
            Predicate::scoped("ct").any_of("second_class_representative_student_id", learner_ids),
        ]);
    }

    let mut qb = QueryBuilder::<Sqlite>::new(CLASS_TEACHER_SELECT);
    predicate.push_where(&mut qb);
    qb.push(" ORDER BY ct.class ASC, ct.section ASC, ct.id ASC");

    let rows = qb
        .build_query_as::<ClassTeacherView>()
        .fetch_all(store.pool())
        .await?;
    Ok(rows)
}

async fn learner_ids_named(store: &SchoolStore, name: &str) -> Result<Vec<i64>, SchoolError> {
    let mut qb =
        QueryBuilder::<Sqlite>::new("SELECT s.id FROM students s JOIN users u ON s.user_id = u.id");
    Predicate::scoped("u")
        .contains("name", Some(name))
        .push_where(&mut qb);
    let ids = qb
        .build_query_scalar::<i64>()
        .fetch_all(store.pool())
        .await?;
    Ok(ids)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherRoutineCriteria {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub teacher_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub section: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub day: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub time_slot: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct TeacherRoutineView {
    pub id: i64,
    pub teacher_name: String,
    pub teacher_subject: Option<String>,
    pub day: String,
    pub class: String,
    pub section: String,
    pub time_slot: String,
}

pub async fn search_teacher_routine(
    store: &SchoolStore,
    criteria: TeacherRoutineCriteria,
) -> Result<Vec<TeacherRoutineView>, SchoolError> {
    let mut qb = QueryBuilder::<Sqlite>::new(
        r#"
    SELECT
        r.id AS id,
        u.name AS teacher_name,
        (SELECT t.specialised_subject FROM teachers t WHERE t.user_id = u.id ORDER BY t.id LIMIT 1)
            AS teacher_subject,
        r.day AS day,
        r.class AS class,
        r.section AS section,
        r.time_slot AS time_slot
    FROM teacher_routine r
    JOIN users u ON r.user_id = u.id"#,
    );

    Predicate::scoped("r")
        .contains("day", criteria.day.as_deref())
        .contains("class", criteria.class_name.as_deref())
        .contains("section", criteria.section.as_deref())
        .contains("time_slot", criteria.time_slot.as_deref())
        .and(Predicate::scoped("u").contains("name", criteria.teacher_name.as_deref()))
        .push_where(&mut qb);
    qb.push(" ORDER BY r.id");

    let rows = qb
        .build_query_as::<TeacherRoutineView>()
        .fetch_all(store.pool())
        .await?;
    Ok(rows)
}
