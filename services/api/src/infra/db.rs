use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use opencourse_api_schema::{completed_lessons, courses, enrollments, lessons, progress, users};
use opencourse_domain::pagination::PageRequest;

use crate::domain::repository::{
    CourseRepository, EnrollmentRepository, LessonRepository, ProgressRepository, UserRepository,
};
use crate::domain::types::{
    CompletedLesson, Course, Enrollment, Lesson, OtpChallenge, Progress, User, completion_percent,
};
use crate::error::ApiError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(user.id),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role as i16),
            is_verified: Set(user.is_verified),
            otp: Set(user.otp.as_ref().map(|o| o.code.clone())),
            otp_expires_at: Set(user.otp.as_ref().map(|o| o.expires_at)),
            reset_otp: Set(user.reset_otp.as_ref().map(|o| o.code.clone())),
            reset_otp_expires_at: Set(user.reset_otp.as_ref().map(|o| o.expires_at)),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(())
    }

    async fn set_otp(&self, id: Uuid, otp: Option<&OtpChallenge>) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(id),
            otp: Set(otp.map(|o| o.code.clone())),
            otp_expires_at: Set(otp.map(|o| o.expires_at)),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set user otp")?;
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(id),
            is_verified: Set(true),
            otp: Set(None),
            otp_expires_at: Set(None),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark user verified")?;
        Ok(())
    }

    async fn set_reset_otp(&self, id: Uuid, otp: Option<&OtpChallenge>) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(id),
            reset_otp: Set(otp.map(|o| o.code.clone())),
            reset_otp_expires_at: Set(otp.map(|o| o.expires_at)),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set user reset otp")?;
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(id),
            password_hash: Set(password_hash.to_owned()),
            reset_otp: Set(None),
            reset_otp_expires_at: Set(None),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update user password")?;
        Ok(())
    }

    async fn update_role(&self, id: Uuid, role: u8) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(id),
            role: Set(role as i16),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update user role")?;
        Ok(())
    }

    async fn set_verification(&self, id: Uuid, is_verified: bool) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(id),
            is_verified: Set(is_verified),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set user verification")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(())
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, ApiError> {
        let models = users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .offset((page.page as u64 - 1) * page.per_page as u64)
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn count(&self) -> Result<u64, ApiError> {
        let n = users::Entity::find()
            .count(&self.db)
            .await
            .context("count users")?;
        Ok(n)
    }

    async fn count_by_role(&self, role: u8) -> Result<u64, ApiError> {
        let n = users::Entity::find()
            .filter(users::Column::Role.eq(role as i16))
            .count(&self.db)
            .await
            .context("count users by role")?;
        Ok(n)
    }

    async fn count_verified(&self) -> Result<u64, ApiError> {
        let n = users::Entity::find()
            .filter(users::Column::IsVerified.eq(true))
            .count(&self.db)
            .await
            .context("count verified users")?;
        Ok(n)
    }
}

// ── Course repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCourseRepository {
    pub db: DatabaseConnection,
}

impl CourseRepository for DbCourseRepository {
    async fn list(&self, page: PageRequest) -> Result<Vec<Course>, ApiError> {
        let models = courses::Entity::find()
            .order_by_desc(courses::Column::CreatedAt)
            .offset((page.page as u64 - 1) * page.per_page as u64)
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list courses")?;
        Ok(models.into_iter().map(course_from_model).collect())
    }

    async fn list_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Course>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = courses::Entity::find()
            .filter(courses::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("list courses by ids")?;
        Ok(models.into_iter().map(course_from_model).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>, ApiError> {
        let model = courses::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find course by id")?;
        Ok(model.map(course_from_model))
    }

    async fn slugs_starting_with(
        &self,
        prefix: &str,
        exclude: Option<Uuid>,
    ) -> Result<Vec<String>, ApiError> {
        let mut query = courses::Entity::find()
            .select_only()
            .column(courses::Column::Slug)
            .filter(courses::Column::Slug.starts_with(prefix));
        if let Some(id) = exclude {
            query = query.filter(courses::Column::Id.ne(id));
        }
        let slugs = query
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .context("list course slugs by prefix")?;
        Ok(slugs)
    }

    async fn create(&self, course: &Course) -> Result<(), ApiError> {
        course_to_active_model(course)
            .insert(&self.db)
            .await
            .context("create course")?;
        Ok(())
    }

    async fn update(&self, course: &Course) -> Result<(), ApiError> {
        course_to_active_model(course)
            .update(&self.db)
            .await
            .context("update course")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        courses::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete course")?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, ApiError> {
        let n = courses::Entity::find()
            .count(&self.db)
            .await
            .context("count courses")?;
        Ok(n)
    }
}

// ── Lesson repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbLessonRepository {
    pub db: DatabaseConnection,
}

impl LessonRepository for DbLessonRepository {
    async fn list_by_course(&self, course_id: Uuid) -> Result<Vec<Lesson>, ApiError> {
        let models = lessons::Entity::find()
            .filter(lessons::Column::CourseId.eq(course_id))
            .order_by_asc(lessons::Column::Position)
            .all(&self.db)
            .await
            .context("list lessons by course")?;
        Ok(models.into_iter().map(lesson_from_model).collect())
    }

    async fn find_by_slug(&self, course_id: Uuid, slug: &str) -> Result<Option<Lesson>, ApiError> {
        let model = lessons::Entity::find()
            .filter(lessons::Column::CourseId.eq(course_id))
            .filter(lessons::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .context("find lesson by slug")?;
        Ok(model.map(lesson_from_model))
    }

    async fn slugs_starting_with(
        &self,
        course_id: Uuid,
        prefix: &str,
        exclude: Option<Uuid>,
    ) -> Result<Vec<String>, ApiError> {
        let mut query = lessons::Entity::find()
            .select_only()
            .column(lessons::Column::Slug)
            .filter(lessons::Column::CourseId.eq(course_id))
            .filter(lessons::Column::Slug.starts_with(prefix));
        if let Some(id) = exclude {
            query = query.filter(lessons::Column::Id.ne(id));
        }
        let slugs = query
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .context("list lesson slugs by prefix")?;
        Ok(slugs)
    }

    async fn create(&self, lesson: &Lesson) -> Result<(), ApiError> {
        lesson_to_active_model(lesson)
            .insert(&self.db)
            .await
            .context("create lesson")?;
        Ok(())
    }

    async fn update(&self, lesson: &Lesson) -> Result<(), ApiError> {
        lesson_to_active_model(lesson)
            .update(&self.db)
            .await
            .context("update lesson")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        lessons::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete lesson")?;
        Ok(())
    }

    async fn count_by_course(&self, course_id: Uuid) -> Result<u64, ApiError> {
        let n = lessons::Entity::find()
            .filter(lessons::Column::CourseId.eq(course_id))
            .count(&self.db)
            .await
            .context("count lessons by course")?;
        Ok(n)
    }

    async fn count(&self) -> Result<u64, ApiError> {
        let n = lessons::Entity::find()
            .count(&self.db)
            .await
            .context("count lessons")?;
        Ok(n)
    }
}

// ── Enrollment repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEnrollmentRepository {
    pub db: DatabaseConnection,
}

impl EnrollmentRepository for DbEnrollmentRepository {
    async fn exists(&self, user_id: Uuid, course_id: Uuid) -> Result<bool, ApiError> {
        let model = enrollments::Entity::find_by_id((user_id, course_id))
            .one(&self.db)
            .await
            .context("find enrollment")?;
        Ok(model.is_some())
    }

    async fn create(&self, enrollment: &Enrollment) -> Result<(), ApiError> {
        enrollments::ActiveModel {
            user_id: Set(enrollment.user_id),
            course_id: Set(enrollment.course_id),
            created_at: Set(enrollment.created_at),
        }
        .insert(&self.db)
        .await
        .context("create enrollment")?;
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Enrollment>, ApiError> {
        let models = enrollments::Entity::find()
            .filter(enrollments::Column::UserId.eq(user_id))
            .order_by_asc(enrollments::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list enrollments by user")?;
        Ok(models
            .into_iter()
            .map(|m| Enrollment {
                user_id: m.user_id,
                course_id: m.course_id,
                created_at: m.created_at,
            })
            .collect())
    }

    async fn count(&self) -> Result<u64, ApiError> {
        let n = enrollments::Entity::find()
            .count(&self.db)
            .await
            .context("count enrollments")?;
        Ok(n)
    }

    async fn count_by_course(&self, course_id: Uuid) -> Result<u64, ApiError> {
        let n = enrollments::Entity::find()
            .filter(enrollments::Column::CourseId.eq(course_id))
            .count(&self.db)
            .await
            .context("count enrollments by course")?;
        Ok(n)
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<(), ApiError> {
        enrollments::Entity::delete_many()
            .filter(enrollments::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete enrollments by user")?;
        Ok(())
    }

    async fn delete_by_course(&self, course_id: Uuid) -> Result<(), ApiError> {
        enrollments::Entity::delete_many()
            .filter(enrollments::Column::CourseId.eq(course_id))
            .exec(&self.db)
            .await
            .context("delete enrollments by course")?;
        Ok(())
    }
}

// ── Progress repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProgressRepository {
    pub db: DatabaseConnection,
}

impl DbProgressRepository {
    async fn load_completions(
        &self,
        progress_id: Uuid,
    ) -> Result<Vec<CompletedLesson>, ApiError> {
        let models = completed_lessons::Entity::find()
            .filter(completed_lessons::Column::ProgressId.eq(progress_id))
            .order_by_asc(completed_lessons::Column::CompletedAt)
            .all(&self.db)
            .await
            .context("list completed lessons")?;
        Ok(models
            .into_iter()
            .map(|m| CompletedLesson {
                lesson_slug: m.lesson_slug,
                lesson_index: m.lesson_index,
                completed_at: m.completed_at,
            })
            .collect())
    }
}

impl ProgressRepository for DbProgressRepository {
    async fn find(&self, user_id: Uuid, course_id: Uuid) -> Result<Option<Progress>, ApiError> {
        let model = progress::Entity::find()
            .filter(progress::Column::UserId.eq(user_id))
            .filter(progress::Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .context("find progress")?;
        let Some(model) = model else {
            return Ok(None);
        };
        let completed = self.load_completions(model.id).await?;
        Ok(Some(progress_from_model(model, completed)))
    }

    async fn create(&self, record: &Progress) -> Result<(), ApiError> {
        progress::ActiveModel {
            id: Set(record.id),
            user_id: Set(record.user_id),
            course_id: Set(record.course_id),
            percent: Set(record.percent as i16),
            created_at: Set(record.created_at),
            updated_at: Set(record.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create progress")?;
        Ok(())
    }

    async fn add_completion(
        &self,
        progress_id: Uuid,
        marker: &CompletedLesson,
        percent: u8,
    ) -> Result<(), ApiError> {
        completed_lessons::ActiveModel {
            id: Set(Uuid::new_v4()),
            progress_id: Set(progress_id),
            lesson_slug: Set(marker.lesson_slug.clone()),
            lesson_index: Set(marker.lesson_index),
            completed_at: Set(marker.completed_at),
        }
        .insert(&self.db)
        .await
        .context("create completed lesson")?;

        progress::ActiveModel {
            id: Set(progress_id),
            percent: Set(percent as i16),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update progress percent")?;
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Progress>, ApiError> {
        let models = progress::Entity::find()
            .filter(progress::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .context("list progress by user")?;
        let mut out = Vec::with_capacity(models.len());
        for model in models {
            let completed = self.load_completions(model.id).await?;
            out.push(progress_from_model(model, completed));
        }
        Ok(out)
    }

    async fn count(&self) -> Result<u64, ApiError> {
        let n = progress::Entity::find()
            .count(&self.db)
            .await
            .context("count progress")?;
        Ok(n)
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<(), ApiError> {
        // Markers cascade with the progress rows.
        progress::Entity::delete_many()
            .filter(progress::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete progress by user")?;
        Ok(())
    }

    async fn delete_by_course(&self, course_id: Uuid) -> Result<(), ApiError> {
        progress::Entity::delete_many()
            .filter(progress::Column::CourseId.eq(course_id))
            .exec(&self.db)
            .await
            .context("delete progress by course")?;
        Ok(())
    }

    async fn remove_lesson_completions(
        &self,
        course_id: Uuid,
        lesson_slug: &str,
        remaining_lessons: u64,
    ) -> Result<(), ApiError> {
        let records = progress::Entity::find()
            .filter(progress::Column::CourseId.eq(course_id))
            .all(&self.db)
            .await
            .context("list progress by course")?;

        for record in records {
            let deleted = completed_lessons::Entity::delete_many()
                .filter(completed_lessons::Column::ProgressId.eq(record.id))
                .filter(completed_lessons::Column::LessonSlug.eq(lesson_slug))
                .exec(&self.db)
                .await
                .context("delete completed lessons by slug")?;
            if deleted.rows_affected == 0 {
                continue;
            }

            let left = completed_lessons::Entity::find()
                .filter(completed_lessons::Column::ProgressId.eq(record.id))
                .count(&self.db)
                .await
                .context("count completed lessons")?;
            let percent = completion_percent(left as usize, remaining_lessons as usize);
            progress::ActiveModel {
                id: Set(record.id),
                percent: Set(percent as i16),
                updated_at: Set(Utc::now()),
                ..Default::default()
            }
            .update(&self.db)
            .await
            .context("update progress percent")?;
        }
        Ok(())
    }
}

// ── Model conversions ────────────────────────────────────────────────────────

fn user_from_model(m: users::Model) -> User {
    let otp = match (m.otp, m.otp_expires_at) {
        (Some(code), Some(expires_at)) => Some(OtpChallenge { code, expires_at }),
        _ => None,
    };
    let reset_otp = match (m.reset_otp, m.reset_otp_expires_at) {
        (Some(code), Some(expires_at)) => Some(OtpChallenge { code, expires_at }),
        _ => None,
    };
    User {
        id: m.id,
        name: m.name,
        email: m.email,
        password_hash: m.password_hash,
        role: m.role as u8,
        is_verified: m.is_verified,
        otp,
        reset_otp,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn course_from_model(m: courses::Model) -> Course {
    Course {
        id: m.id,
        title: m.title,
        slug: m.slug,
        description: m.description,
        category: m.category,
        thumbnail_url: m.thumbnail_url,
        created_by: m.created_by,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn course_to_active_model(c: &Course) -> courses::ActiveModel {
    courses::ActiveModel {
        id: Set(c.id),
        title: Set(c.title.clone()),
        slug: Set(c.slug.clone()),
        description: Set(c.description.clone()),
        category: Set(c.category.clone()),
        thumbnail_url: Set(c.thumbnail_url.clone()),
        created_by: Set(c.created_by),
        created_at: Set(c.created_at),
        updated_at: Set(c.updated_at),
    }
}

fn lesson_from_model(m: lessons::Model) -> Lesson {
    Lesson {
        id: m.id,
        course_id: m.course_id,
        title: m.title,
        slug: m.slug,
        video_url: m.video_url,
        duration: m.duration,
        position: m.position,
        created_at: m.created_at,
    }
}

fn lesson_to_active_model(l: &Lesson) -> lessons::ActiveModel {
    lessons::ActiveModel {
        id: Set(l.id),
        course_id: Set(l.course_id),
        title: Set(l.title.clone()),
        slug: Set(l.slug.clone()),
        video_url: Set(l.video_url.clone()),
        duration: Set(l.duration.clone()),
        position: Set(l.position),
        created_at: Set(l.created_at),
    }
}

fn progress_from_model(m: progress::Model, completed: Vec<CompletedLesson>) -> Progress {
    Progress {
        id: m.id,
        user_id: m.user_id,
        course_id: m.course_id,
        percent: m.percent as u8,
        completed,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}
