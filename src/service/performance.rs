//! Exam results: per-learner marks and the per-class roll-up.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use tracing::{debug, info};

use crate::db::SchoolStore;
use crate::db::models::{DbClassPerformance, DbStudentPerformance};
use crate::error::SchoolError;
use crate::middleware::identity::ActingIdentity;
use crate::service::filter::Predicate;
use crate::service::identity::authorize_teacher_write;
use crate::types::criteria::{blank_as_none, required, required_int, required_number};

/// Sections for which a class roll-up can be generated.
pub const ROLLUP_SECTIONS: [&str; 3] = ["A", "B", "C"];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceCriteria {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub student_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub section: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub exam_type: Option<String>,
    /// Name of the teacher who scheduled the exam.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub teacher_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct PerformanceView {
    pub id: i64,
    pub student_name: String,
    pub student_class: String,
    pub student_photo: Option<String>,
    pub student_section: String,
    pub phone: Option<String>,
    pub subject: String,
    pub exam_type: String,
    pub teacher_name: String,
    pub exam_date: NaiveDate,
    pub exam_duration: String,
    pub marks_obtained: f64,
    pub total_marks: f64,
}

pub async fn search_performance(
    store: &SchoolStore,
    criteria: PerformanceCriteria,
) -> Result<Vec<PerformanceView>, SchoolError> {
    let mut qb = QueryBuilder::<Sqlite>::new(
        r#"
    SELECT
        sp.id AS id,
        su.name AS student_name,
        s.class AS student_class,
        su.photo AS student_photo,
        s.section AS student_section,
        su.phone AS phone,
        e.subject AS subject,
        e.exam_type AS exam_type,
        tu.name AS teacher_name,
        e.exam_date AS exam_date,
        e.exam_duration AS exam_duration,
        sp.marks_obtained AS marks_obtained,
        sp.total_marks AS total_marks
    FROM student_performance sp
    JOIN students s ON sp.student_id = s.id
    JOIN users su ON s.user_id = su.id
    JOIN exams e ON sp.exam_id = e.id
    JOIN teachers t ON e.created_by = t.id
    JOIN users tu ON t.user_id = tu.id"#,
    );
    Predicate::scoped("su")
        .contains("name", criteria.student_name.as_deref())
        .and(
            Predicate::scoped("s")
                .contains("class", criteria.class_name.as_deref())
                .contains("section", criteria.section.as_deref()),
        )
        .and(
            Predicate::scoped("e")
                .contains("subject", criteria.subject.as_deref())
                .contains("exam_type", criteria.exam_type.as_deref()),
        )
        .and(Predicate::scoped("tu").contains("name", criteria.teacher_name.as_deref()))
        .push_where(&mut qb);
    qb.push(" ORDER BY sp.id");

    let rows = qb
        .build_query_as::<PerformanceView>()
        .fetch_all(store.pool())
        .await?;
    Ok(rows)
}

#[derive(Debug, Default, Deserialize)]
pub struct ClassRollupPayload {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub class: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub section: Option<String>,
}

/// Result of a roll-up run: the rows this call inserted. Empty means every
/// row was already present.
#[derive(Debug, Clone, Default)]
pub struct ClassRollup {
    pub inserted: Vec<DbClassPerformance>,
}

/// Create the missing roll-up rows for a class, one per scheduled exam.
///
/// Only a teacher may trigger it; the rows are owned by the class teacher
/// assigned to the class, not by the caller. Each exam's row is numbered by
/// the exam's position in scheduling order. Rows are inserted independently,
/// so a failure part-way leaves the rows written so far; re-running skips them.
pub async fn create_class_rollup(
    store: &SchoolStore,
    identity: &ActingIdentity,
    payload: ClassRollupPayload,
) -> Result<ClassRollup, SchoolError> {
    let (Some(class), Some(section)) = (
        payload.class,
        payload
            .section
            .filter(|s| ROLLUP_SECTIONS.contains(&s.as_str())),
    ) else {
        return Err(SchoolError::validation("Invalid class or section."));
    };

    let caller = authorize_teacher_write(store, identity).await?;

    let teacher = store
        .staff_by_assignment(&class, &section)
        .await?
        .ok_or_else(|| {
            SchoolError::not_found(format!(
                "No class teacher found for class {class} and section {section}."
            ))
        })?;

    let exams = store.exams_in_class(&class, &section).await?;
    if exams.is_empty() {
        return Err(SchoolError::not_found(format!(
            "No exams found for class {class} and section {section}."
        )));
    }

    let learners = store.learners_in_class(&class, &section).await?;
    if learners.is_empty() {
        return Err(SchoolError::not_found(format!(
            "No students found for class {class} and section {section}."
        )));
    }

    let mut rollup = ClassRollup::default();
    for (position, exam) in (1i64..).zip(exams.iter()) {
        if store
            .class_performance_exists(&class, &section, exam.id)
            .await?
        {
            continue;
        }

        match store
            .insert_class_performance(&class, &section, teacher.id, position, exam.id)
            .await
        {
            Ok(row) => rollup.inserted.push(row),
            Err(e) if e.is_unique_violation() => {
                debug!(exam_id = exam.id, "roll-up row appeared concurrently, skipped");
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        class = %class,
        section = %section,
        staff_id = caller.staff.id,
        inserted = rollup.inserted.len(),
        "class roll-up generated"
    );
    Ok(rollup)
}

#[derive(Debug, Default, Deserialize)]
pub struct StudentMarksPayload {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub roll_number: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub class: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub section: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub exam_type: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub marks_obtained: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub total_marks: Option<String>,
}

/// Record one learner's marks for a scheduled exam, as a teacher. A second
/// record for the same (learner, exam) is a conflict.
pub async fn record_student_marks(
    store: &SchoolStore,
    identity: &ActingIdentity,
    payload: StudentMarksPayload,
) -> Result<DbStudentPerformance, SchoolError> {
    let roll_number = required_int("roll_number", payload.roll_number)?;
    let class = required("class", payload.class)?;
    let section = required("section", payload.section)?;
    let subject = required("subject", payload.subject)?;
    let exam_type = required("exam_type", payload.exam_type)?;
    let marks_obtained = required_number("marks_obtained", payload.marks_obtained)?;
    let total_marks = required_number("total_marks", payload.total_marks)?;

    let teacher = authorize_teacher_write(store, identity).await?;

    let learner = store
        .learner_by_roll(&class, &section, roll_number)
        .await?
        .ok_or_else(|| {
            SchoolError::not_found(format!(
                "No student found with roll number \"{roll_number}\" in class \"{class}\" section \"{section}\"."
            ))
        })?;

    let exam = store
        .exam_for_subject(&class, &section, &subject, &exam_type)
        .await?
        .ok_or_else(|| {
            SchoolError::not_found(format!(
                "No scheduled exam found for subject \"{subject}\", exam type \"{exam_type}\" in class \"{class}\" section \"{section}\"."
            ))
        })?;

    let duplicate = || {
        SchoolError::conflict(format!(
            "Performance for student with roll number \"{roll_number}\" has already been recorded for this exam."
        ))
    };

    if store.student_performance_exists(learner.id, exam.id).await? {
        return Err(duplicate());
    }

    let record = store
        .insert_student_performance(learner.id, exam.id, marks_obtained, total_marks)
        .await
        .map_err(|e| if e.is_unique_violation() { duplicate() } else { e })?;

    info!(
        performance_id = record.id,
        student_id = learner.id,
        exam_id = exam.id,
        staff_id = teacher.staff.id,
        "student performance recorded"
    );
    Ok(record)
}
