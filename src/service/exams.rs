use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};
use tracing::info;

use crate::db::SchoolStore;
use crate::db::models::{DbExam, NewExam};
use crate::error::SchoolError;
use crate::middleware::identity::ActingIdentity;
use crate::service::filter::Predicate;
use crate::service::identity::authorize_teacher_write;
use crate::types::calendar::parse_date;
use crate::types::criteria::{blank_as_none, required};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamCriteria {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub section: Option<String>,
    /// Exact calendar date.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub exam_date: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub exam_duration: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub exam_type: Option<String>,
}

pub async fn search_exams(
    store: &SchoolStore,
    criteria: ExamCriteria,
) -> Result<Vec<DbExam>, SchoolError> {
    let exam_date = criteria
        .exam_date
        .as_deref()
        .map(|raw| parse_date("examDate", raw))
        .transpose()?;

    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT e.id, e.class, e.section, e.subject, e.exam_date, e.exam_duration, \
         e.exam_type, e.created_by FROM exams e",
    );
    Predicate::scoped("e")
        .contains("class", criteria.class_name.as_deref())
        .contains("section", criteria.section.as_deref())
        .equals("exam_date", exam_date.map(|d| d.to_string()))
        .contains("subject", criteria.subject.as_deref())
        .contains("exam_duration", criteria.exam_duration.as_deref())
        .contains("exam_type", criteria.exam_type.as_deref())
        .push_where(&mut qb);
    qb.push(" ORDER BY e.exam_date, e.id");

    let rows = qb
        .build_query_as::<DbExam>()
        .fetch_all(store.pool())
        .await?;
    Ok(rows)
}

#[derive(Debug, Default, Deserialize)]
pub struct NewExamPayload {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub class: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub section: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub exam_date: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub exam_duration: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub exam_type: Option<String>,
}

/// Schedule an exam attributed to the acting teacher.
pub async fn create_exam(
    store: &SchoolStore,
    identity: &ActingIdentity,
    payload: NewExamPayload,
) -> Result<DbExam, SchoolError> {
    let exam_date = required("exam_date", payload.exam_date)?;
    let exam_date = parse_date("exam_date", &exam_date)?;
    let class = required("class", payload.class)?;
    let section = required("section", payload.section)?;
    let subject = required("subject", payload.subject)?;
    let exam_duration = required("exam_duration", payload.exam_duration)?;
    let exam_type = required("exam_type", payload.exam_type)?;

    let teacher = authorize_teacher_write(store, identity).await?;
    let new_exam = NewExam {
        class,
        section,
        subject,
        exam_date,
        exam_duration,
        exam_type,
        created_by: teacher.staff.id,
    };

    let exam = store.insert_exam(new_exam).await?;
    info!(
        exam_id = exam.id,
        staff_id = teacher.staff.id,
        class = %exam.class,
        section = %exam.section,
        "exam scheduled"
    );
    Ok(exam)
}
