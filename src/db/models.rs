use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::role::{AttendanceStatus, Role};

/// A row of `users`: any authenticated actor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbPrincipal {
    pub id: i64,
    pub name: String,
    pub role: Role,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub photo: Option<String>,
    pub address: Option<String>,
}

/// A row of `teachers`, extending a teacher principal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbStaff {
    pub id: i64,
    pub user_id: i64,
    pub assigned_class: Option<String>,
    pub assigned_section: Option<String>,
    pub specialised_subject: Option<String>,
}

/// A row of `students`, extending a student principal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbLearner {
    pub id: i64,
    pub user_id: i64,
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

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbExam {
    pub id: i64,
    pub class: String,
    pub section: String,
    pub subject: String,
    pub exam_date: NaiveDate,
    pub exam_duration: String,
    pub exam_type: String,
    pub created_by: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbAssignment {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub class: String,
    pub section: String,
    pub assigned_by: i64,
    pub due_date: NaiveDate,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbAttendance {
    pub id: i64,
    pub student_id: i64,
    pub teacher_id: i64,
    pub class: String,
    pub section: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbNote {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub subject: String,
    pub class: String,
    pub section: String,
    pub created_by: i64,
    pub files: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbNotice {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub target_role: Role,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

/// One learner's marks for one exam.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbStudentPerformance {
    pub id: i64,
    pub student_id: i64,
    pub exam_id: i64,
    pub marks_obtained: f64,
    pub total_marks: f64,
}

/// Class-level roll-up row, one per (class, section, exam).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbClassPerformance {
    pub id: i64,
    pub class: String,
    pub section: String,
    pub class_teacher: i64,
    pub class_performance: i64,
    pub exam_id: i64,
}

/// Insertable exam, attributed to a resolved staff record.
#[derive(Debug, Clone)]
pub struct NewExam {
    pub class: String,
    pub section: String,
    pub subject: String,
    pub exam_date: NaiveDate,
    pub exam_duration: String,
    pub exam_type: String,
    pub created_by: i64,
}

#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub class: String,
    pub section: String,
    pub assigned_by: i64,
    pub due_date: NaiveDate,
    pub file: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub student_id: i64,
    pub teacher_id: i64,
    pub class: String,
    pub section: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub subject: String,
    pub class: String,
    pub section: String,
    pub created_by: i64,
    pub files: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNotice {
    pub title: String,
    pub content: String,
    pub target_role: Role,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}
