pub mod calendar;
pub mod criteria;
pub mod role;

pub use role::{AttendanceStatus, Role};
