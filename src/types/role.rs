use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SchoolError;

/// Closed set of principal roles stored in `users.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
    Principal,
    Parent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Principal => "principal",
            Role::Parent => "parent",
        }
    }

    /// Parse an untrusted role claim. Claims are lower-cased first.
    pub fn from_claim(claim: &str) -> Result<Self, SchoolError> {
        match claim.trim().to_lowercase().as_str() {
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            "principal" => Ok(Role::Principal),
            "parent" => Ok(Role::Parent),
            _ => Err(SchoolError::validation(format!(
                "Unknown role \"{claim}\"; expected teacher, student, principal or parent."
            ))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attendance marks accepted by `attendance.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Medical,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Medical => "Medical",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, SchoolError> {
        match raw.trim().to_lowercase().as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "medical" => Ok(AttendanceStatus::Medical),
            _ => Err(SchoolError::validation(
                "Status must be Present, Absent, or Medical.",
            )),
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
