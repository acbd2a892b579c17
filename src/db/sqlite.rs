use crate::db::models::{
    DbAssignment, DbAttendance, DbClassPerformance, DbExam, DbLearner, DbNote, DbNotice,
    DbPrincipal, DbStaff, DbStudentPerformance, NewAssignment, NewAttendance, NewExam, NewNote,
    NewNotice,
};
use crate::db::schema::SQLITE_INIT;
use crate::error::SchoolError;
use crate::types::role::Role;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::time::Duration;

pub type SqlitePool = Pool<Sqlite>;

const PRINCIPAL_COLUMNS: &str = "id, name, role, email, phone, photo, address";
const STAFF_COLUMNS: &str =
    "id, user_id, assigned_class, assigned_section, specialised_subject";
const LEARNER_COLUMNS: &str = "id, user_id, admission_number, roll_number, class, section, \
     parent_name, parent_phone, parent_email, parent_work, parent_photo1, parent_photo2, \
     guardian_photo, guardian_phone";
const EXAM_COLUMNS: &str =
    "id, class, section, subject, exam_date, exam_duration, exam_type, created_by";

/// Split a DDL script into single statements, since sqlx::query runs one
/// at a time. `--` comment lines are dropped first so they may contain `;`.
pub fn statements(script: &str) -> Vec<String> {
    let body = script
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");
    body.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Query executor handed to every operation.
///
/// Constructed once at startup (or per test) and cloned into router state;
/// there is no process-wide connection.
#[derive(Clone)]
pub struct SchoolStore {
    pool: SqlitePool,
}

impl SchoolStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `database_url` and apply the schema.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, SchoolError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_opts)
            .await?;
        let store = Self::new(pool);
        store.init_schema().await?;
        Ok(store)
    }

    /// A private in-memory database. A single connection is pinned open for
    /// the pool's lifetime, since each SQLite memory connection is its own db.
    pub async fn in_memory() -> Result<Self, SchoolError> {
        let connect_opts = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(connect_opts)
            .await?;
        let store = Self::new(pool);
        store.init_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), SchoolError> {
        for stmt in statements(SQLITE_INIT) {
            sqlx::query(&stmt).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Principals matching `(name, role)`, at most `limit` rows, lowest id first.
    pub async fn principals_by_name_role(
        &self,
        name: &str,
        role: Role,
        limit: i64,
    ) -> Result<Vec<DbPrincipal>, SchoolError> {
        let rows = sqlx::query_as::<_, DbPrincipal>(&format!(
            "SELECT {PRINCIPAL_COLUMNS} FROM users WHERE name = ? AND role = ? ORDER BY id LIMIT ?"
        ))
        .bind(name)
        .bind(role)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn principals_with_role(&self, role: Role) -> Result<Vec<DbPrincipal>, SchoolError> {
        let rows = sqlx::query_as::<_, DbPrincipal>(&format!(
            "SELECT {PRINCIPAL_COLUMNS} FROM users WHERE role = ? ORDER BY id"
        ))
        .bind(role)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn staff_by_principal(&self, user_id: i64) -> Result<Option<DbStaff>, SchoolError> {
        let row = sqlx::query_as::<_, DbStaff>(&format!(
            "SELECT {STAFF_COLUMNS} FROM teachers WHERE user_id = ? ORDER BY id LIMIT 1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// The class teacher assigned to `class`/`section`.
    pub async fn staff_by_assignment(
        &self,
        class: &str,
        section: &str,
    ) -> Result<Option<DbStaff>, SchoolError> {
        let row = sqlx::query_as::<_, DbStaff>(&format!(
            "SELECT {STAFF_COLUMNS} FROM teachers \
             WHERE assigned_class = ? AND assigned_section = ? ORDER BY id LIMIT 1"
        ))
        .bind(class)
        .bind(section)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn learner_by_id(&self, id: i64) -> Result<Option<DbLearner>, SchoolError> {
        let row = sqlx::query_as::<_, DbLearner>(&format!(
            "SELECT {LEARNER_COLUMNS} FROM students WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn learner_by_roll(
        &self,
        class: &str,
        section: &str,
        roll_number: i64,
    ) -> Result<Option<DbLearner>, SchoolError> {
        let row = sqlx::query_as::<_, DbLearner>(&format!(
            "SELECT {LEARNER_COLUMNS} FROM students \
             WHERE class = ? AND section = ? AND roll_number = ? ORDER BY id LIMIT 1"
        ))
        .bind(class)
        .bind(section)
        .bind(roll_number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn learners_in_class(
        &self,
        class: &str,
        section: &str,
    ) -> Result<Vec<DbLearner>, SchoolError> {
        let rows = sqlx::query_as::<_, DbLearner>(&format!(
            "SELECT {LEARNER_COLUMNS} FROM students WHERE class = ? AND section = ? ORDER BY id"
        ))
        .bind(class)
        .bind(section)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Exams scheduled for a class, in scheduling (id) order.
    pub async fn exams_in_class(
        &self,
        class: &str,
        section: &str,
    ) -> Result<Vec<DbExam>, SchoolError> {
        let rows = sqlx::query_as::<_, DbExam>(&format!(
            "SELECT {EXAM_COLUMNS} FROM exams WHERE class = ? AND section = ? ORDER BY id"
        ))
        .bind(class)
        .bind(section)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn exam_for_subject(
        &self,
        class: &str,
        section: &str,
        subject: &str,
        exam_type: &str,
    ) -> Result<Option<DbExam>, SchoolError> {
        let row = sqlx::query_as::<_, DbExam>(&format!(
            "SELECT {EXAM_COLUMNS} FROM exams \
             WHERE class = ? AND section = ? AND subject = ? AND exam_type = ? \
             ORDER BY id LIMIT 1"
        ))
        .bind(class)
        .bind(section)
        .bind(subject)
        .bind(exam_type)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn student_performance_exists(
        &self,
        student_id: i64,
        exam_id: i64,
    ) -> Result<bool, SchoolError> {
        let found: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM student_performance WHERE student_id = ? AND exam_id = ? LIMIT 1",
        )
        .bind(student_id)
        .bind(exam_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(found.is_some())
    }

    pub async fn class_performance_exists(
        &self,
        class: &str,
        section: &str,
        exam_id: i64,
    ) -> Result<bool, SchoolError> {
        let found: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM performance WHERE class = ? AND section = ? AND exam_id = ? LIMIT 1",
        )
        .bind(class)
        .bind(section)
        .bind(exam_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(found.is_some())
    }

    pub async fn insert_exam(&self, exam: NewExam) -> Result<DbExam, SchoolError> {
        let row = sqlx::query_as::<_, DbExam>(&format!(
            "INSERT INTO exams (class, section, subject, exam_date, exam_duration, exam_type, created_by) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING {EXAM_COLUMNS}"
        ))
        .bind(exam.class)
        .bind(exam.section)
        .bind(exam.subject)
        .bind(exam.exam_date)
        .bind(exam.exam_duration)
        .bind(exam.exam_type)
        .bind(exam.created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn insert_assignment(
        &self,
        assignment: NewAssignment,
    ) -> Result<DbAssignment, SchoolError> {
        let row = sqlx::query_as::<_, DbAssignment>(
            r#"
            INSERT INTO assignments (
                title, description, subject, class, section, assigned_by, due_date, file
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, title, description, subject, class, section, assigned_by, due_date, file
            "#,
        )
        .bind(assignment.title)
        .bind(assignment.description)
        .bind(assignment.subject)
        .bind(assignment.class)
        .bind(assignment.section)
        .bind(assignment.assigned_by)
        .bind(assignment.due_date)
        .bind(assignment.file)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn insert_attendance(
        &self,
        attendance: NewAttendance,
    ) -> Result<DbAttendance, SchoolError> {
        let row = sqlx::query_as::<_, DbAttendance>(
            r#"
            INSERT INTO attendance (student_id, teacher_id, class, section, date, status)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, student_id, teacher_id, class, section, date, status
            "#,
        )
        .bind(attendance.student_id)
        .bind(attendance.teacher_id)
        .bind(attendance.class)
        .bind(attendance.section)
        .bind(attendance.date)
        .bind(attendance.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn insert_note(&self, note: NewNote) -> Result<DbNote, SchoolError> {
        let row = sqlx::query_as::<_, DbNote>(
            r#"
            INSERT INTO notes (title, content, subject, class, section, created_by, files, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, title, content, subject, class, section, created_by, files, created_at
            "#,
        )
        .bind(note.title)
        .bind(note.content)
        .bind(note.subject)
        .bind(note.class)
        .bind(note.section)
        .bind(note.created_by)
        .bind(note.files)
        .bind(note.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn insert_notice(&self, notice: NewNotice) -> Result<DbNotice, SchoolError> {
        let row = sqlx::query_as::<_, DbNotice>(
            r#"
            INSERT INTO notices (title, content, target_role, created_by, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, title, content, target_role, created_by, created_at
            "#,
        )
        .bind(notice.title)
        .bind(notice.content)
        .bind(notice.target_role)
        .bind(notice.created_by)
        .bind(notice.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn insert_student_performance(
        &self,
        student_id: i64,
        exam_id: i64,
        marks_obtained: f64,
        total_marks: f64,
    ) -> Result<DbStudentPerformance, SchoolError> {
        let row = sqlx::query_as::<_, DbStudentPerformance>(
            r#"
            INSERT INTO student_performance (student_id, exam_id, marks_obtained, total_marks)
            VALUES (?, ?, ?, ?)
            RETURNING id, student_id, exam_id, marks_obtained, total_marks
            "#,
        )
        .bind(student_id)
        .bind(exam_id)
        .bind(marks_obtained)
        .bind(total_marks)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn insert_class_performance(
        &self,
        class: &str,
        section: &str,
        class_teacher: i64,
        class_performance: i64,
        exam_id: i64,
    ) -> Result<DbClassPerformance, SchoolError> {
        let row = sqlx::query_as::<_, DbClassPerformance>(
            r#"
            INSERT INTO performance (class, section, class_teacher, class_performance, exam_id)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, class, section, class_teacher, class_performance, exam_id
            "#,
        )
        .bind(class)
        .bind(section)
        .bind(class_teacher)
        .bind(class_performance)
        .bind(exam_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_lines_are_dropped_before_splitting() {
        let script = "CREATE TABLE a (id INTEGER);\n-- a note; with a semicolon\nCREATE TABLE b (id INTEGER);\n";
        assert_eq!(
            statements(script),
            vec!["CREATE TABLE a (id INTEGER)", "CREATE TABLE b (id INTEGER)"]
        );
    }

    #[tokio::test]
    async fn in_memory_store_opens_with_schema() {
        let store = SchoolStore::in_memory().await;
        assert!(store.is_ok(), "{:?}", store.err());
        let store = store.unwrap();

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        )
        .fetch_one(store.pool())
        .await
        .unwrap();
        assert_eq!(tables, 13);

        // Re-running the script is a no-op.
        store.init_schema().await.unwrap();
    }

    #[tokio::test]
    async fn performance_backstops_reject_duplicates() {
        let store = SchoolStore::in_memory().await.unwrap();
        for stmt in [
            "INSERT INTO users (id, name, role) VALUES (1, 'Alice', 'teacher'), (2, 'John', 'student')",
            "INSERT INTO teachers (id, user_id) VALUES (1, 1)",
            "INSERT INTO students (id, user_id, class, section) VALUES (1, 2, '5', 'A')",
            "INSERT INTO exams (id, class, section, subject, exam_date, exam_duration, exam_type, created_by) \
             VALUES (1, '5', 'A', 'Math', '2025-03-10', '2h', 'Midterm', 1)",
        ] {
            sqlx::query(stmt).execute(store.pool()).await.unwrap();
        }

        store.insert_student_performance(1, 1, 50.0, 100.0).await.unwrap();
        let err = store
            .insert_student_performance(1, 1, 60.0, 100.0)
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
        assert!(store.student_performance_exists(1, 1).await.unwrap());
    }
}
