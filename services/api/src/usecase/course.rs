use chrono::Utc;
use uuid::Uuid;

use opencourse_domain::pagination::PageRequest;
use opencourse_domain::slug::{dedupe_slug, slugify};

use crate::domain::repository::{
    CourseRepository, EnrollmentRepository, LessonRepository, ProgressRepository,
};
use crate::domain::types::{Course, Lesson};
use crate::error::ApiError;

/// List courses, newest first, with the total for pagination.
pub struct ListCoursesUseCase<C>
where
    C: CourseRepository,
{
    pub courses: C,
}

impl<C> ListCoursesUseCase<C>
where
    C: CourseRepository,
{
    pub async fn execute(&self, page: PageRequest) -> Result<(Vec<Course>, u64), ApiError> {
        let items = self.courses.list(page).await?;
        let total = self.courses.count().await?;
        Ok((items, total))
    }
}

/// A course together with its ordered lessons and enrollment count.
pub struct CourseDetail {
    pub course: Course,
    pub lessons: Vec<Lesson>,
    pub enrolled_count: u64,
}

pub struct GetCourseUseCase<C, L, E>
where
    C: CourseRepository,
    L: LessonRepository,
    E: EnrollmentRepository,
{
    pub courses: C,
    pub lessons: L,
    pub enrollments: E,
}

impl<C, L, E> GetCourseUseCase<C, L, E>
where
    C: CourseRepository,
    L: LessonRepository,
    E: EnrollmentRepository,
{
    pub async fn execute(&self, course_id: Uuid) -> Result<CourseDetail, ApiError> {
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or(ApiError::CourseNotFound)?;
        let lessons = self.lessons.list_by_course(course_id).await?;
        let enrolled_count = self.enrollments.count_by_course(course_id).await?;
        Ok(CourseDetail {
            course,
            lessons,
            enrolled_count,
        })
    }
}

pub struct CreateCourseInput {
    pub title: String,
    pub description: String,
    pub category: String,
    pub thumbnail_url: Option<String>,
}

/// Create a course with a collision-free slug derived from the title.
pub struct CreateCourseUseCase<C>
where
    C: CourseRepository,
{
    pub courses: C,
}

impl<C> CreateCourseUseCase<C>
where
    C: CourseRepository,
{
    pub async fn execute(
        &self,
        created_by: Uuid,
        input: CreateCourseInput,
    ) -> Result<Course, ApiError> {
        let title = input.title.trim();
        if title.is_empty() || input.description.trim().is_empty() || input.category.trim().is_empty()
        {
            return Err(ApiError::MissingData);
        }

        // Probe existing slugs sharing the prefix, then suffix -1, -2, ...
        // until the slug is free.
        let base = slugify(title);
        let taken = self.courses.slugs_starting_with(&base, None).await?;
        let slug = dedupe_slug(&base, |candidate| taken.iter().any(|s| s == candidate));

        let now = Utc::now();
        let course = Course {
            id: Uuid::new_v4(),
            title: title.to_owned(),
            slug,
            description: input.description.trim().to_owned(),
            category: input.category.trim().to_owned(),
            thumbnail_url: input.thumbnail_url,
            created_by,
            created_at: now,
            updated_at: now,
        };
        self.courses.create(&course).await?;
        Ok(course)
    }
}

pub struct UpdateCourseInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub thumbnail_url: Option<String>,
}

pub struct UpdateCourseUseCase<C>
where
    C: CourseRepository,
{
    pub courses: C,
}

impl<C> UpdateCourseUseCase<C>
where
    C: CourseRepository,
{
    pub async fn execute(
        &self,
        course_id: Uuid,
        input: UpdateCourseInput,
    ) -> Result<Course, ApiError> {
        let mut course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or(ApiError::CourseNotFound)?;

        if let Some(title) = input.title {
            let title = title.trim().to_owned();
            if title.is_empty() {
                return Err(ApiError::MissingData);
            }
            // The slug follows the title, re-deduplicated against every
            // other course.
            if title != course.title {
                let base = slugify(&title);
                let taken = self
                    .courses
                    .slugs_starting_with(&base, Some(course_id))
                    .await?;
                course.slug = dedupe_slug(&base, |candidate| taken.iter().any(|s| s == candidate));
                course.title = title;
            }
        }
        if let Some(description) = input.description {
            course.description = description.trim().to_owned();
        }
        if let Some(category) = input.category {
            course.category = category.trim().to_owned();
        }
        if let Some(thumbnail_url) = input.thumbnail_url {
            course.thumbnail_url = Some(thumbnail_url);
        }
        course.updated_at = Utc::now();

        self.courses.update(&course).await?;
        Ok(course)
    }
}

/// Delete a course and scrub dependent enrollments and progress.
pub struct DeleteCourseUseCase<C, E, P>
where
    C: CourseRepository,
    E: EnrollmentRepository,
    P: ProgressRepository,
{
    pub courses: C,
    pub enrollments: E,
    pub progress: P,
}

impl<C, E, P> DeleteCourseUseCase<C, E, P>
where
    C: CourseRepository,
    E: EnrollmentRepository,
    P: ProgressRepository,
{
    pub async fn execute(&self, course_id: Uuid) -> Result<(), ApiError> {
        if self.courses.find_by_id(course_id).await?.is_none() {
            return Err(ApiError::CourseNotFound);
        }
        // Dependents first. The writes are sequential without a wrapping
        // transaction; each step is individually retryable.
        self.enrollments.delete_by_course(course_id).await?;
        self.progress.delete_by_course(course_id).await?;
        self.courses.delete(course_id).await?;
        Ok(())
    }
}
