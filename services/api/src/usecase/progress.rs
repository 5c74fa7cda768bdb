use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{EnrollmentRepository, LessonRepository, ProgressRepository};
use crate::domain::types::{CompletedLesson, Progress, completion_percent};
use crate::error::ApiError;

/// Record a lesson completion for an enrolled user.
pub struct CompleteLessonUseCase<E, L, P>
where
    E: EnrollmentRepository,
    L: LessonRepository,
    P: ProgressRepository,
{
    pub enrollments: E,
    pub lessons: L,
    pub progress: P,
}

impl<E, L, P> CompleteLessonUseCase<E, L, P>
where
    E: EnrollmentRepository,
    L: LessonRepository,
    P: ProgressRepository,
{
    /// Returns the updated progress record. Completing the same lesson
    /// twice is a no-op.
    pub async fn execute(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        lesson_slug: &str,
    ) -> Result<Progress, ApiError> {
        if !self.enrollments.exists(user_id, course_id).await? {
            return Err(ApiError::NotEnrolled);
        }
        let lesson = self
            .lessons
            .find_by_slug(course_id, lesson_slug)
            .await?
            .ok_or(ApiError::LessonNotFound)?;

        // The progress record normally exists from enrollment; recreate it
        // if it went missing rather than failing the completion.
        let mut record = match self.progress.find(user_id, course_id).await? {
            Some(record) => record,
            None => {
                let now = Utc::now();
                let record = Progress {
                    id: Uuid::new_v4(),
                    user_id,
                    course_id,
                    percent: 0,
                    completed: Vec::new(),
                    created_at: now,
                    updated_at: now,
                };
                self.progress.create(&record).await?;
                record
            }
        };

        if record.completed.iter().any(|c| c.lesson_slug == lesson.slug) {
            return Ok(record);
        }

        let total = self.lessons.count_by_course(course_id).await? as usize;
        let percent = completion_percent(record.completed.len() + 1, total);
        let marker = CompletedLesson {
            lesson_slug: lesson.slug.clone(),
            lesson_index: lesson.position,
            completed_at: Utc::now(),
        };
        self.progress
            .add_completion(record.id, &marker, percent)
            .await?;

        record.completed.push(marker);
        record.percent = percent;
        record.updated_at = Utc::now();
        Ok(record)
    }
}

/// Fetch the user's progress in a course.
pub struct GetProgressUseCase<E, P>
where
    E: EnrollmentRepository,
    P: ProgressRepository,
{
    pub enrollments: E,
    pub progress: P,
}

impl<E, P> GetProgressUseCase<E, P>
where
    E: EnrollmentRepository,
    P: ProgressRepository,
{
    pub async fn execute(&self, user_id: Uuid, course_id: Uuid) -> Result<Progress, ApiError> {
        if !self.enrollments.exists(user_id, course_id).await? {
            return Err(ApiError::NotEnrolled);
        }
        // A missing record reads as empty progress; nothing is persisted
        // on the read path.
        match self.progress.find(user_id, course_id).await? {
            Some(record) => Ok(record),
            None => {
                let now = Utc::now();
                Ok(Progress {
                    id: Uuid::new_v4(),
                    user_id,
                    course_id,
                    percent: 0,
                    completed: Vec::new(),
                    created_at: now,
                    updated_at: now,
                })
            }
        }
    }
}
