use chrono::Utc;
use uuid::Uuid;

use opencourse_domain::slug::{dedupe_slug, slugify};

use crate::domain::repository::{CourseRepository, LessonRepository, ProgressRepository};
use crate::domain::types::Lesson;
use crate::error::ApiError;

pub struct AddLessonInput {
    pub title: String,
    pub video_url: String,
    pub duration: String,
}

/// Append a lesson to a course, slug deduplicated among its siblings.
pub struct AddLessonUseCase<C, L>
where
    C: CourseRepository,
    L: LessonRepository,
{
    pub courses: C,
    pub lessons: L,
}

impl<C, L> AddLessonUseCase<C, L>
where
    C: CourseRepository,
    L: LessonRepository,
{
    pub async fn execute(&self, course_id: Uuid, input: AddLessonInput) -> Result<Lesson, ApiError> {
        if self.courses.find_by_id(course_id).await?.is_none() {
            return Err(ApiError::CourseNotFound);
        }
        let title = input.title.trim();
        if title.is_empty() || input.video_url.trim().is_empty() {
            return Err(ApiError::MissingData);
        }

        let base = slugify(title);
        let taken = self
            .lessons
            .slugs_starting_with(course_id, &base, None)
            .await?;
        let slug = dedupe_slug(&base, |candidate| taken.iter().any(|s| s == candidate));

        // New lessons go to the end of the course.
        let position = self.lessons.count_by_course(course_id).await? as i32;

        let lesson = Lesson {
            id: Uuid::new_v4(),
            course_id,
            title: title.to_owned(),
            slug,
            video_url: input.video_url.trim().to_owned(),
            duration: input.duration.trim().to_owned(),
            position,
            created_at: Utc::now(),
        };
        self.lessons.create(&lesson).await?;
        Ok(lesson)
    }
}

pub struct UpdateLessonInput {
    pub title: Option<String>,
    pub video_url: Option<String>,
    pub duration: Option<String>,
}

pub struct UpdateLessonUseCase<L>
where
    L: LessonRepository,
{
    pub lessons: L,
}

impl<L> UpdateLessonUseCase<L>
where
    L: LessonRepository,
{
    pub async fn execute(
        &self,
        course_id: Uuid,
        lesson_slug: &str,
        input: UpdateLessonInput,
    ) -> Result<Lesson, ApiError> {
        let mut lesson = self
            .lessons
            .find_by_slug(course_id, lesson_slug)
            .await?
            .ok_or(ApiError::LessonNotFound)?;

        if let Some(title) = input.title {
            let title = title.trim().to_owned();
            if title.is_empty() {
                return Err(ApiError::MissingData);
            }
            if title != lesson.title {
                let base = slugify(&title);
                let taken = self
                    .lessons
                    .slugs_starting_with(course_id, &base, Some(lesson.id))
                    .await?;
                lesson.slug = dedupe_slug(&base, |candidate| taken.iter().any(|s| s == candidate));
                lesson.title = title;
            }
        }
        if let Some(video_url) = input.video_url {
            lesson.video_url = video_url.trim().to_owned();
        }
        if let Some(duration) = input.duration {
            lesson.duration = duration.trim().to_owned();
        }

        self.lessons.update(&lesson).await?;
        Ok(lesson)
    }
}

/// Delete a lesson and drop its completion markers from every progress
/// record, recomputing their percentages against the remaining lessons.
pub struct DeleteLessonUseCase<L, P>
where
    L: LessonRepository,
    P: ProgressRepository,
{
    pub lessons: L,
    pub progress: P,
}

impl<L, P> DeleteLessonUseCase<L, P>
where
    L: LessonRepository,
    P: ProgressRepository,
{
    pub async fn execute(&self, course_id: Uuid, lesson_slug: &str) -> Result<(), ApiError> {
        let lesson = self
            .lessons
            .find_by_slug(course_id, lesson_slug)
            .await?
            .ok_or(ApiError::LessonNotFound)?;

        self.lessons.delete(lesson.id).await?;

        let remaining = self.lessons.count_by_course(course_id).await?;
        self.progress
            .remove_lesson_completions(course_id, &lesson.slug, remaining)
            .await?;
        Ok(())
    }
}
