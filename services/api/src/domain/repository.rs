#![allow(async_fn_in_trait)]

use uuid::Uuid;

use opencourse_domain::pagination::PageRequest;

use crate::domain::types::{
    CompletedLesson, Course, Enrollment, Lesson, OtpChallenge, Progress, User,
};
use crate::error::ApiError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn create(&self, user: &User) -> Result<(), ApiError>;

    /// Replace the verification OTP. `None` clears it.
    async fn set_otp(&self, id: Uuid, otp: Option<&OtpChallenge>) -> Result<(), ApiError>;

    /// Mark the account verified and clear the verification OTP.
    async fn mark_verified(&self, id: Uuid) -> Result<(), ApiError>;

    /// Replace the password-reset OTP. `None` clears it.
    async fn set_reset_otp(&self, id: Uuid, otp: Option<&OtpChallenge>) -> Result<(), ApiError>;

    /// Update the password hash and clear the reset OTP.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), ApiError>;

    async fn update_role(&self, id: Uuid, role: u8) -> Result<(), ApiError>;
    async fn set_verification(&self, id: Uuid, is_verified: bool) -> Result<(), ApiError>;
    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, ApiError>;
    async fn count(&self) -> Result<u64, ApiError>;
    async fn count_by_role(&self, role: u8) -> Result<u64, ApiError>;
    async fn count_verified(&self) -> Result<u64, ApiError>;
}

/// Repository for courses.
pub trait CourseRepository: Send + Sync {
    async fn list(&self, page: PageRequest) -> Result<Vec<Course>, ApiError>;
    async fn list_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Course>, ApiError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>, ApiError>;

    /// All course slugs starting with `prefix`, optionally excluding one
    /// course (for updates). Used for slug collision probing.
    async fn slugs_starting_with(
        &self,
        prefix: &str,
        exclude: Option<Uuid>,
    ) -> Result<Vec<String>, ApiError>;

    async fn create(&self, course: &Course) -> Result<(), ApiError>;
    async fn update(&self, course: &Course) -> Result<(), ApiError>;
    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;
    async fn count(&self) -> Result<u64, ApiError>;
}

/// Repository for lessons.
pub trait LessonRepository: Send + Sync {
    /// Lessons of a course, ordered by position.
    async fn list_by_course(&self, course_id: Uuid) -> Result<Vec<Lesson>, ApiError>;

    async fn find_by_slug(&self, course_id: Uuid, slug: &str) -> Result<Option<Lesson>, ApiError>;

    /// Sibling-scoped slug probing, matching `CourseRepository::slugs_starting_with`.
    async fn slugs_starting_with(
        &self,
        course_id: Uuid,
        prefix: &str,
        exclude: Option<Uuid>,
    ) -> Result<Vec<String>, ApiError>;

    async fn create(&self, lesson: &Lesson) -> Result<(), ApiError>;
    async fn update(&self, lesson: &Lesson) -> Result<(), ApiError>;
    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;
    async fn count_by_course(&self, course_id: Uuid) -> Result<u64, ApiError>;
    async fn count(&self) -> Result<u64, ApiError>;
}

/// Repository for enrollments.
pub trait EnrollmentRepository: Send + Sync {
    async fn exists(&self, user_id: Uuid, course_id: Uuid) -> Result<bool, ApiError>;
    async fn create(&self, enrollment: &Enrollment) -> Result<(), ApiError>;
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Enrollment>, ApiError>;
    async fn count(&self) -> Result<u64, ApiError>;
    async fn count_by_course(&self, course_id: Uuid) -> Result<u64, ApiError>;
    async fn delete_by_user(&self, user_id: Uuid) -> Result<(), ApiError>;
    async fn delete_by_course(&self, course_id: Uuid) -> Result<(), ApiError>;
}

/// Repository for per-course progress records and their completed-lesson
/// markers.
pub trait ProgressRepository: Send + Sync {
    async fn find(&self, user_id: Uuid, course_id: Uuid) -> Result<Option<Progress>, ApiError>;
    async fn create(&self, progress: &Progress) -> Result<(), ApiError>;

    /// Append a completion marker and store the recomputed percentage.
    async fn add_completion(
        &self,
        progress_id: Uuid,
        marker: &CompletedLesson,
        percent: u8,
    ) -> Result<(), ApiError>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Progress>, ApiError>;
    async fn count(&self) -> Result<u64, ApiError>;
    async fn delete_by_user(&self, user_id: Uuid) -> Result<(), ApiError>;
    async fn delete_by_course(&self, course_id: Uuid) -> Result<(), ApiError>;

    /// Drop completion markers for a deleted lesson and recompute each
    /// affected record's percentage against `remaining_lessons`.
    async fn remove_lesson_completions(
        &self,
        course_id: Uuid,
        lesson_slug: &str,
        remaining_lessons: u64,
    ) -> Result<(), ApiError>;
}

/// Outbound port for transactional email.
pub trait MailerPort: Send + Sync {
    async fn send_verification_otp(&self, email: &str, name: &str, otp: &str)
    -> Result<(), ApiError>;
    async fn send_reset_otp(&self, email: &str, name: &str, otp: &str) -> Result<(), ApiError>;
}
