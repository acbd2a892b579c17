pub mod assignments;
pub mod attendance;
pub mod bulletin;
pub mod exams;
pub mod performance;
pub mod staff;
pub mod students;
