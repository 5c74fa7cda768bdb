use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One-time code challenge attached to a user account, either for email
/// verification or for a password reset.
#[derive(Debug, Clone)]
pub struct OtpChallenge {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl OtpChallenge {
    pub fn matches(&self, code: &str) -> bool {
        self.code == code
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: u8,
    pub is_verified: bool,
    pub otp: Option<OtpChallenge>,
    pub reset_otp: Option<OtpChallenge>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub thumbnail_url: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lessons are ordered by `position` within their course. `slug` is unique
/// per course, not globally.
#[derive(Debug, Clone)]
pub struct Lesson {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub slug: String,
    pub video_url: String,
    pub duration: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Enrollment {
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A completed-lesson marker. Lessons are referenced by slug plus the
/// position they held at completion time, so markers survive lesson edits.
#[derive(Debug, Clone)]
pub struct CompletedLesson {
    pub lesson_slug: String,
    pub lesson_index: i32,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Progress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub percent: u8,
    pub completed: Vec<CompletedLesson>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// OTP length in digits.
pub const OTP_LEN: usize = 6;

/// OTP time-to-live in seconds.
pub const OTP_TTL_SECS: i64 = 600;

/// Completion percentage for `completed` out of `total` lessons, rounded
/// down. A course with no lessons reads as 0%.
pub fn completion_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((completed * 100) / total).min(100) as u8
}
