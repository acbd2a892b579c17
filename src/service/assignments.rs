use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use tracing::info;

use crate::db::SchoolStore;
use crate::db::models::{DbAssignment, NewAssignment};
use crate::error::SchoolError;
use crate::middleware::identity::ActingIdentity;
use crate::service::filter::Predicate;
use crate::service::identity::authorize_teacher_write;
use crate::types::calendar::{parse_date, today};
use crate::types::criteria::{blank_as_none, required};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentCriteria {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub section: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub teacher_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct AssignmentView {
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub class: String,
    pub section: String,
    pub assigned_by: Option<String>,
    pub due_date: NaiveDate,
    pub file: Option<String>,
}

pub async fn search_assignments(
    store: &SchoolStore,
    criteria: AssignmentCriteria,
) -> Result<Vec<AssignmentView>, SchoolError> {
    let mut qb = QueryBuilder::<Sqlite>::new(
        r#"
    SELECT
        a.title AS title,
        a.description AS description,
        a.subject AS subject,
        a.class AS class,
        a.section AS section,
        tu.name AS assigned_by,
        a.due_date AS due_date,
        a.file AS file
    FROM assignments a
    LEFT JOIN teachers t ON a.assigned_by = t.id
    LEFT JOIN users tu ON t.user_id = tu.id"#,
    );

    Predicate::scoped("a")
        .contains("title", criteria.title.as_deref())
        .contains("subject", criteria.subject.as_deref())
        .contains("class", criteria.class_name.as_deref())
        .contains("section", criteria.section.as_deref())
        .and(Predicate::scoped("tu").contains("name", criteria.teacher_name.as_deref()))
        .push_where(&mut qb);
    qb.push(" ORDER BY a.due_date, a.id");

    let rows = qb
        .build_query_as::<AssignmentView>()
        .fetch_all(store.pool())
        .await?;
    Ok(rows)
}

#[derive(Debug, Default, Deserialize)]
pub struct NewAssignmentPayload {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub class: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub section: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
    /// Opaque attachment reference.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub file: Option<String>,
    /// Defaults to today.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub due_date: Option<String>,
}

/// Create an assignment; its subject is the acting teacher's specialised subject.
pub async fn create_assignment(
    store: &SchoolStore,
    identity: &ActingIdentity,
    payload: NewAssignmentPayload,
) -> Result<DbAssignment, SchoolError> {
    let title = required("title", payload.title)?;
    let class = required("class", payload.class)?;
    let section = required("section", payload.section)?;
    let due_date = match payload.due_date.as_deref() {
        Some(raw) => parse_date("due_date", raw)?,
        None => today(),
    };

    let teacher = authorize_teacher_write(store, identity).await?;
    let assignment = store
        .insert_assignment(NewAssignment {
            title,
            description: payload.description,
            subject: teacher.staff.specialised_subject.clone(),
            class,
            section,
            assigned_by: teacher.staff.id,
            due_date,
            file: payload.file,
        })
        .await?;

    info!(
        assignment_id = assignment.id,
        staff_id = teacher.staff.id,
        "assignment created"
    );
    Ok(assignment)
}
