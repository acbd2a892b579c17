//! Domain operations. Each function takes the store plus typed criteria or
//! a payload and returns rows or a `SchoolError`; handlers only adapt HTTP.

pub mod assignments;
pub mod attendance;
pub mod exams;
pub mod filter;
pub mod identity;
pub mod notes;
pub mod notices;
pub mod performance;
pub mod staff;
pub mod students;
