//! SQL DDL for the school schema (SQLite).
//!
//! Dates are stored as `YYYY-MM-DD` text and timestamps as RFC 3339 text,
//! which is how sqlx encodes chrono types for SQLite. `class` columns are
//! text everywhere so that substring criteria apply uniformly.

/// Executed statement-by-statement at startup; every statement is idempotent.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    role TEXT NOT NULL CHECK (role IN ('teacher', 'student', 'principal', 'parent')),
    email TEXT NULL,
    phone TEXT NULL,
    photo TEXT NULL,
    address TEXT NULL
);

-- (name, role) is the identity lookup key, deliberately not UNIQUE.
CREATE INDEX IF NOT EXISTS idx_users_name_role ON users(name, role);

CREATE TABLE IF NOT EXISTS teachers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    assigned_class TEXT NULL,
    assigned_section TEXT NULL,
    specialised_subject TEXT NULL
);

CREATE INDEX IF NOT EXISTS idx_teachers_user_id ON teachers(user_id);

CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    admission_number TEXT NULL,
    roll_number INTEGER NULL,
    class TEXT NOT NULL,
    section TEXT NOT NULL,
    parent_name TEXT NULL,
    parent_phone TEXT NULL,
    parent_email TEXT NULL,
    parent_work TEXT NULL,
    parent_photo1 TEXT NULL,
    parent_photo2 TEXT NULL,
    guardian_photo TEXT NULL,
    guardian_phone TEXT NULL
);

CREATE INDEX IF NOT EXISTS idx_students_class_section ON students(class, section);

CREATE TABLE IF NOT EXISTS class_teachers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    teacher_id INTEGER NOT NULL REFERENCES teachers(id),
    class TEXT NOT NULL,
    section TEXT NOT NULL,
    class_representative_student_id INTEGER NULL REFERENCES students(id),
    second_class_representative_student_id INTEGER NULL REFERENCES students(id)
);

CREATE TABLE IF NOT EXISTS teacher_routine (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    day TEXT NOT NULL,
    class TEXT NOT NULL,
    section TEXT NOT NULL,
    time_slot TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS student_routine (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    class TEXT NOT NULL,
    section TEXT NOT NULL,
    day TEXT NOT NULL,
    time_slot TEXT NOT NULL,
    teacher_name TEXT NOT NULL,
    teacher_subject TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS exams (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    class TEXT NOT NULL,
    section TEXT NOT NULL,
    subject TEXT NOT NULL,
    exam_date TEXT NOT NULL,
    exam_duration TEXT NOT NULL,
    exam_type TEXT NOT NULL,
    created_by INTEGER NOT NULL REFERENCES teachers(id)
);

CREATE INDEX IF NOT EXISTS idx_exams_class_section ON exams(class, section);

CREATE TABLE IF NOT EXISTS assignments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NULL,
    subject TEXT NULL,
    class TEXT NOT NULL,
    section TEXT NOT NULL,
    assigned_by INTEGER NOT NULL REFERENCES teachers(id),
    due_date TEXT NOT NULL,
    file TEXT NULL
);

CREATE TABLE IF NOT EXISTS attendance (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES students(id),
    teacher_id INTEGER NOT NULL REFERENCES teachers(id),
    class TEXT NOT NULL,
    section TEXT NOT NULL,
    date TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('Present', 'Absent', 'Medical'))
);

CREATE INDEX IF NOT EXISTS idx_attendance_student_date ON attendance(student_id, date);

CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    subject TEXT NOT NULL,
    class TEXT NOT NULL,
    section TEXT NOT NULL,
    created_by INTEGER NOT NULL REFERENCES teachers(id),
    files TEXT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS notices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    target_role TEXT NOT NULL,
    created_by INTEGER NOT NULL REFERENCES users(id),
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS student_performance (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES students(id),
    exam_id INTEGER NOT NULL REFERENCES exams(id),
    marks_obtained REAL NOT NULL,
    total_marks REAL NOT NULL,
    UNIQUE (student_id, exam_id)
);

CREATE TABLE IF NOT EXISTS performance (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    class TEXT NOT NULL,
    section TEXT NOT NULL,
    class_teacher INTEGER NOT NULL REFERENCES teachers(id),
    class_performance INTEGER NOT NULL,
    exam_id INTEGER NOT NULL REFERENCES exams(id),
    UNIQUE (class, section, exam_id)
);
"#;
