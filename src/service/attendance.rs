use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use tracing::info;

use crate::db::SchoolStore;
use crate::db::models::{DbAttendance, NewAttendance};
use crate::error::SchoolError;
use crate::middleware::identity::ActingIdentity;
use crate::service::filter::Predicate;
use crate::service::identity::authorize_teacher_write;
use crate::types::calendar::{days_in_month, parse_date, parse_month_name, today};
use crate::types::criteria::{blank_as_none, required, required_int};
use crate::types::role::AttendanceStatus;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAttendanceCriteria {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub section: Option<String>,
}

#[derive(Debug, FromRow)]
struct MonthlyAttendanceRow {
    class: String,
    section: String,
    year: i64,
    month: i64,
    total_present: i64,
}

/// Present-count for one class/section in one calendar month.
///
/// `monthly_total` is the number of days in that month; the ratio is left
/// to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyAttendance {
    pub class: String,
    pub section: String,
    pub year: i64,
    pub month: i64,
    pub total_present: i64,
    pub monthly_total: u32,
}

pub async fn monthly_attendance(
    store: &SchoolStore,
    criteria: MonthlyAttendanceCriteria,
) -> Result<Vec<MonthlyAttendance>, SchoolError> {
    let mut qb = QueryBuilder::<Sqlite>::new(
        r#"
    SELECT
        s.class AS class,
        s.section AS section,
        CAST(strftime('%Y', a.date) AS INTEGER) AS year,
        CAST(strftime('%m', a.date) AS INTEGER) AS month,
        SUM(CASE WHEN a.status = 'Present' THEN 1 ELSE 0 END) AS total_present
    FROM attendance a
    JOIN students s ON a.student_id = s.id"#,
    );
    Predicate::scoped("s")
        .contains("class", criteria.class_name.as_deref())
        .contains("section", criteria.section.as_deref())
        .push_where(&mut qb);
    qb.push(" GROUP BY s.class, s.section, year, month ORDER BY s.class, s.section, year, month");

    let rows = qb
        .build_query_as::<MonthlyAttendanceRow>()
        .fetch_all(store.pool())
        .await?;

    let aggregates = rows
        .into_iter()
        .map(|row| {
            let monthly_total = i32::try_from(row.year)
                .ok()
                .zip(u32::try_from(row.month).ok())
                .and_then(|(year, month)| days_in_month(year, month))
                .unwrap_or(0);
            MonthlyAttendance {
                class: row.class,
                section: row.section,
                year: row.year,
                month: row.month,
                total_present: row.total_present,
                monthly_total,
            }
        })
        .collect();
    Ok(aggregates)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceCriteria {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub student_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub section: Option<String>,
    /// Substring of the stored `YYYY-MM-DD` text.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<String>,
    /// Full English month name.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub month: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct AttendanceView {
    pub student_name: String,
    pub class: String,
    pub section: String,
    pub class_teacher: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

pub async fn search_attendance(
    store: &SchoolStore,
    criteria: AttendanceCriteria,
) -> Result<Vec<AttendanceView>, SchoolError> {
    let month = criteria
        .month
        .as_deref()
        .map(parse_month_name)
        .transpose()?;

    let mut qb = QueryBuilder::<Sqlite>::new(
        r#"
    SELECT
        u.name AS student_name,
        s.class AS class,
        s.section AS section,
        tu.name AS class_teacher,
        a.date AS date,
        a.status AS status
    FROM attendance a
    JOIN students s ON a.student_id = s.id
    JOIN users u ON s.user_id = u.id
    JOIN teachers t ON a.teacher_id = t.id
    JOIN users tu ON t.user_id = tu.id"#,
    );
    Predicate::scoped("u")
        .contains("name", criteria.student_name.as_deref())
        .and(
            Predicate::scoped("s")
                .contains("class", criteria.class_name.as_deref())
                .contains("section", criteria.section.as_deref()),
        )
        .and(
            Predicate::scoped("a")
                .contains("date", criteria.date.as_deref())
                .contains("status", criteria.status.as_deref()),
        )
        .and(Predicate::new().equals("CAST(strftime('%m', a.date) AS INTEGER)", month))
        .push_where(&mut qb);
    qb.push(" ORDER BY a.date, a.id");

    let rows = qb
        .build_query_as::<AttendanceView>()
        .fetch_all(store.pool())
        .await?;
    Ok(rows)
}

#[derive(Debug, Default, Deserialize)]
pub struct NewAttendancePayload {
    /// Learner's display name; informational only, the roll number decides.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub class: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub section: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub roll_number: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<String>,
    /// Defaults to today.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date: Option<String>,
}

/// Record one learner's attendance, attributed to the acting teacher.
pub async fn record_attendance(
    store: &SchoolStore,
    identity: &ActingIdentity,
    payload: NewAttendancePayload,
) -> Result<DbAttendance, SchoolError> {
    let status = AttendanceStatus::parse(payload.status.as_deref().unwrap_or_default())?;
    let class = required("class", payload.class)?;
    let section = required("section", payload.section)?;
    let roll_number = required_int("roll_number", payload.roll_number)?;
    let date = match payload.date.as_deref() {
        Some(raw) => parse_date("date", raw)?,
        None => today(),
    };

    let teacher = authorize_teacher_write(store, identity).await?;
    let learner = store
        .learner_by_roll(&class, &section, roll_number)
        .await?
        .ok_or_else(|| {
            SchoolError::not_found(format!(
                "No student found in class {class}{section} with roll number {roll_number}."
            ))
        })?;

    let attendance = store
        .insert_attendance(NewAttendance {
            student_id: learner.id,
            teacher_id: teacher.staff.id,
            class,
            section,
            date,
            status,
        })
        .await?;

    info!(
        attendance_id = attendance.id,
        student_id = learner.id,
        staff_id = teacher.staff.id,
        status = status.as_str(),
        "attendance recorded"
    );
    Ok(attendance)
}
