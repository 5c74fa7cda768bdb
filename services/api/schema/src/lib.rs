//! sea-orm entities for the api service.

pub mod completed_lessons;
pub mod courses;
pub mod enrollments;
pub mod lessons;
pub mod progress;
pub mod users;
