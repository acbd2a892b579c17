//! Learner directory, parent directory and class routines.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite};

use crate::db::SchoolStore;
use crate::error::SchoolError;
use crate::service::filter::Predicate;
use crate::types::criteria::blank_as_none;

/// Directory criteria shared by the learner and parent searches.
///
/// `name` is a substring match on the learner's name; the class, section
/// and admission number are exact keys.
#[derive(Debug, Default, Deserialize)]
pub struct LearnerCriteria {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub class: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub section: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub parent_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub admission_number: Option<String>,
}

impl LearnerCriteria {
    fn predicate(&self) -> Predicate {
        Predicate::scoped("s")
            .equals("class", self.class.clone())
            .equals("section", self.section.clone())
            .equals("admission_number", self.admission_number.clone())
            .contains("parent_name", self.parent_name.as_deref())
            .and(Predicate::scoped("u").contains("name", self.name.as_deref()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct LearnerView {
    pub id: i64,
    pub user_id: i64,
    pub student_name: Option<String>,
    pub student_photo: Option<String>,
    pub student_phone: Option<String>,
    pub admission_number: Option<String>,
    pub roll_number: Option<i64>,
    pub class: String,
    pub section: String,
    pub parent_name: Option<String>,
    pub parent_phone: Option<String>,
    pub parent_email: Option<String>,
    pub parent_work: Option<String>,
    pub parent_photo1: Option<String>,
    pub parent_photo2: Option<String>,
    pub guardian_photo: Option<String>,
    pub guardian_phone: Option<String>,
}

const LEARNER_SELECT: &str = r#"
    SELECT
        s.id AS id,
        s.user_id AS user_id,
        u.name AS student_name,
        u.photo AS student_photo,
        u.phone AS student_phone,
        s.admission_number AS admission_number,
        s.roll_number AS roll_number,
        s.class AS class,
        s.section AS section,
        s.parent_name AS parent_name,
        s.parent_phone AS parent_phone,
        s.parent_email AS parent_email,
        s.parent_work AS parent_work,
        s.parent_photo1 AS parent_photo1,
        s.parent_photo2 AS parent_photo2,
        s.guardian_photo AS guardian_photo,
        s.guardian_phone AS guardian_phone
    FROM students s
    LEFT JOIN users u ON s.user_id = u.id"#;

pub async fn search_learners(
    store: &SchoolStore,
    criteria: LearnerCriteria,
) -> Result<Vec<LearnerView>, SchoolError> {
    let mut qb = QueryBuilder::<Sqlite>::new(LEARNER_SELECT);
    criteria.predicate().push_where(&mut qb);
    qb.push(" ORDER BY s.class, s.section, s.roll_number, s.id");

    let rows = qb
        .build_query_as::<LearnerView>()
        .fetch_all(store.pool())
        .await?;
    Ok(rows)
}

pub async fn learner_profile(store: &SchoolStore, id: i64) -> Result<LearnerView, SchoolError> {
    let mut qb = QueryBuilder::<Sqlite>::new(LEARNER_SELECT);
    Predicate::scoped("s")
        .equals("id", Some(id))
        .push_where(&mut qb);

    qb.build_query_as::<LearnerView>()
        .fetch_optional(store.pool())
        .await?
        .ok_or_else(|| SchoolError::not_found(format!("No student found with id {id}.")))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct ParentView {
    pub parent_name: Option<String>,
    pub parent_phone: Option<String>,
    pub parent_email: Option<String>,
    pub parent_work: Option<String>,
    pub parent_photo1: Option<String>,
    pub parent_photo2: Option<String>,
    pub guardian_photo: Option<String>,
    pub guardian_phone: Option<String>,
    pub class: String,
    pub section: String,
    pub admission_number: Option<String>,
    pub student_name: Option<String>,
    pub student_phone: Option<String>,
    pub student_photo: Option<String>,
    pub address: Option<String>,
}

pub async fn list_parents(store: &SchoolStore) -> Result<Vec<ParentView>, SchoolError> {
    search_parents(store, LearnerCriteria::default()).await
}

/// Parent/guardian directory, one row per learner.
pub async fn search_parents(
    store: &SchoolStore,
    criteria: LearnerCriteria,
) -> Result<Vec<ParentView>, SchoolError> {
    let mut qb = QueryBuilder::<Sqlite>::new(
        r#"
    SELECT
        s.parent_name AS parent_name,
        s.parent_phone AS parent_phone,
        s.parent_email AS parent_email,
        s.parent_work AS parent_work,
        s.parent_photo1 AS parent_photo1,
        s.parent_photo2 AS parent_photo2,
        s.guardian_photo AS guardian_photo,
        s.guardian_phone AS guardian_phone,
        s.class AS class,
        s.section AS section,
        s.admission_number AS admission_number,
        u.name AS student_name,
        u.phone AS student_phone,
        u.photo AS student_photo,
        u.address AS address
    FROM students s
    LEFT JOIN users u ON s.user_id = u.id"#,
    );
    criteria.predicate().push_where(&mut qb);
    qb.push(" ORDER BY s.class, s.section, s.id");

    let rows = qb
        .build_query_as::<ParentView>()
        .fetch_all(store.pool())
        .await?;
    Ok(rows)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRoutineCriteria {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub section: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub time_slot: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub teacher_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub teacher_subject: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub day: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct ClassRoutineEntry {
    pub id: i64,
    pub class: String,
    pub section: String,
    pub day: String,
    pub time_slot: String,
    pub teacher_name: String,
    pub teacher_subject: String,
}

pub async fn search_class_routine(
    store: &SchoolStore,
    criteria: ClassRoutineCriteria,
) -> Result<Vec<ClassRoutineEntry>, SchoolError> {
    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT r.id, r.class, r.section, r.day, r.time_slot, r.teacher_name, r.teacher_subject \
         FROM student_routine r",
    );
    Predicate::scoped("r")
        .contains("class", criteria.class_name.as_deref())
        .contains("section", criteria.section.as_deref())
        .contains("time_slot", criteria.time_slot.as_deref())
        .contains("teacher_name", criteria.teacher_name.as_deref())
        .contains("teacher_subject", criteria.teacher_subject.as_deref())
        .contains("day", criteria.day.as_deref())
        .push_where(&mut qb);
    qb.push(" ORDER BY r.id");

    let rows = qb
        .build_query_as::<ClassRoutineEntry>()
        .fetch_all(store.pool())
        .await?;
    Ok(rows)
}
