use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{CourseRepository, EnrollmentRepository, ProgressRepository};
use crate::domain::types::{Course, Enrollment, Progress};
use crate::error::ApiError;

/// Enroll the user in a course and seed an empty progress record.
pub struct EnrollUseCase<C, E, P>
where
    C: CourseRepository,
    E: EnrollmentRepository,
    P: ProgressRepository,
{
    pub courses: C,
    pub enrollments: E,
    pub progress: P,
}

impl<C, E, P> EnrollUseCase<C, E, P>
where
    C: CourseRepository,
    E: EnrollmentRepository,
    P: ProgressRepository,
{
    pub async fn execute(&self, user_id: Uuid, course_id: Uuid) -> Result<(), ApiError> {
        if self.courses.find_by_id(course_id).await?.is_none() {
            return Err(ApiError::CourseNotFound);
        }
        if self.enrollments.exists(user_id, course_id).await? {
            return Err(ApiError::AlreadyEnrolled);
        }

        let now = Utc::now();
        self.enrollments
            .create(&Enrollment {
                user_id,
                course_id,
                created_at: now,
            })
            .await?;

        // A progress record may already exist from a previous enrollment
        // cycle; never create a second one.
        if self.progress.find(user_id, course_id).await?.is_none() {
            self.progress
                .create(&Progress {
                    id: Uuid::new_v4(),
                    user_id,
                    course_id,
                    percent: 0,
                    completed: Vec::new(),
                    created_at: now,
                    updated_at: now,
                })
                .await?;
        }
        Ok(())
    }
}

/// A course the user is enrolled in, with their completion percentage.
pub struct EnrolledCourse {
    pub course: Course,
    pub percent: u8,
}

pub struct MyEnrolledUseCase<C, E, P>
where
    C: CourseRepository,
    E: EnrollmentRepository,
    P: ProgressRepository,
{
    pub courses: C,
    pub enrollments: E,
    pub progress: P,
}

impl<C, E, P> MyEnrolledUseCase<C, E, P>
where
    C: CourseRepository,
    E: EnrollmentRepository,
    P: ProgressRepository,
{
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<EnrolledCourse>, ApiError> {
        let enrollments = self.enrollments.list_by_user(user_id).await?;
        if enrollments.is_empty() {
            return Ok(Vec::new());
        }

        let course_ids: Vec<Uuid> = enrollments.iter().map(|e| e.course_id).collect();
        let courses = self.courses.list_by_ids(&course_ids).await?;
        let records = self.progress.list_by_user(user_id).await?;

        // Preserve enrollment order. Courses deleted since enrollment have
        // no row in `courses` and are skipped.
        let out = enrollments
            .iter()
            .filter_map(|e| {
                let course = courses.iter().find(|c| c.id == e.course_id)?.clone();
                let percent = records
                    .iter()
                    .find(|p| p.course_id == e.course_id)
                    .map(|p| p.percent)
                    .unwrap_or(0);
                Some(EnrolledCourse { course, percent })
            })
            .collect();
        Ok(out)
    }
}
