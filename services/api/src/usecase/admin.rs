use uuid::Uuid;

use opencourse_domain::pagination::PageRequest;
use opencourse_domain::user::UserRole;

use crate::domain::repository::{
    CourseRepository, EnrollmentRepository, LessonRepository, ProgressRepository, UserRepository,
};
use crate::domain::types::User;
use crate::error::ApiError;

/// Aggregate counters for the admin dashboard.
pub struct DashboardStats {
    pub total_users: u64,
    pub student_users: u64,
    pub admin_users: u64,
    pub verified_users: u64,
    pub total_courses: u64,
    pub total_lessons: u64,
    /// Number of enrollment rows.
    pub total_enrollments: u64,
    /// Number of progress records. Tracks started courses, which can lag
    /// behind `total_enrollments` and survive unenrollment cleanups.
    pub active_progress: u64,
}

pub struct DashboardStatsUseCase<U, C, L, E, P>
where
    U: UserRepository,
    C: CourseRepository,
    L: LessonRepository,
    E: EnrollmentRepository,
    P: ProgressRepository,
{
    pub users: U,
    pub courses: C,
    pub lessons: L,
    pub enrollments: E,
    pub progress: P,
}

impl<U, C, L, E, P> DashboardStatsUseCase<U, C, L, E, P>
where
    U: UserRepository,
    C: CourseRepository,
    L: LessonRepository,
    E: EnrollmentRepository,
    P: ProgressRepository,
{
    pub async fn execute(&self) -> Result<DashboardStats, ApiError> {
        Ok(DashboardStats {
            total_users: self.users.count().await?,
            student_users: self.users.count_by_role(UserRole::Student.as_u8()).await?,
            admin_users: self.users.count_by_role(UserRole::Admin.as_u8()).await?,
            verified_users: self.users.count_verified().await?,
            total_courses: self.courses.count().await?,
            total_lessons: self.lessons.count().await?,
            total_enrollments: self.enrollments.count().await?,
            active_progress: self.progress.count().await?,
        })
    }
}

pub struct ListUsersUseCase<U>
where
    U: UserRepository,
{
    pub users: U,
}

impl<U> ListUsersUseCase<U>
where
    U: UserRepository,
{
    pub async fn execute(&self, page: PageRequest) -> Result<(Vec<User>, u64), ApiError> {
        let items = self.users.list(page).await?;
        let total = self.users.count().await?;
        Ok((items, total))
    }
}

/// A user's enrollment as the admin detail view renders it.
pub struct UserEnrollment {
    pub course_id: Uuid,
    pub course_title: String,
    pub percent: u8,
}

pub struct UserDetail {
    pub user: User,
    pub enrollments: Vec<UserEnrollment>,
}

pub struct GetUserDetailUseCase<U, C, E, P>
where
    U: UserRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
    P: ProgressRepository,
{
    pub users: U,
    pub courses: C,
    pub enrollments: E,
    pub progress: P,
}

impl<U, C, E, P> GetUserDetailUseCase<U, C, E, P>
where
    U: UserRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
    P: ProgressRepository,
{
    pub async fn execute(&self, user_id: Uuid) -> Result<UserDetail, ApiError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        let enrollments = self.enrollments.list_by_user(user_id).await?;
        let course_ids: Vec<Uuid> = enrollments.iter().map(|e| e.course_id).collect();
        let courses = self.courses.list_by_ids(&course_ids).await?;
        let records = self.progress.list_by_user(user_id).await?;

        let enrollments = enrollments
            .iter()
            .filter_map(|e| {
                let course = courses.iter().find(|c| c.id == e.course_id)?;
                let percent = records
                    .iter()
                    .find(|p| p.course_id == e.course_id)
                    .map(|p| p.percent)
                    .unwrap_or(0);
                Some(UserEnrollment {
                    course_id: course.id,
                    course_title: course.title.clone(),
                    percent,
                })
            })
            .collect();

        Ok(UserDetail { user, enrollments })
    }
}

/// Change another user's role. Admins cannot change their own.
pub struct UpdateUserRoleUseCase<U>
where
    U: UserRepository,
{
    pub users: U,
}

impl<U> UpdateUserRoleUseCase<U>
where
    U: UserRepository,
{
    pub async fn execute(&self, actor_id: Uuid, user_id: Uuid, role: &str) -> Result<(), ApiError> {
        let role = UserRole::from_name(role).ok_or(ApiError::InvalidRole)?;
        if actor_id == user_id {
            return Err(ApiError::SelfModification);
        }
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(ApiError::UserNotFound);
        }
        self.users.update_role(user_id, role.as_u8()).await?;
        Ok(())
    }
}

/// Toggle another user's verified flag. Admins cannot change their own.
pub struct SetVerificationUseCase<U>
where
    U: UserRepository,
{
    pub users: U,
}

impl<U> SetVerificationUseCase<U>
where
    U: UserRepository,
{
    pub async fn execute(
        &self,
        actor_id: Uuid,
        user_id: Uuid,
        is_verified: bool,
    ) -> Result<(), ApiError> {
        if actor_id == user_id {
            return Err(ApiError::SelfModification);
        }
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(ApiError::UserNotFound);
        }
        self.users.set_verification(user_id, is_verified).await?;
        Ok(())
    }
}

/// Delete a user account and scrub their enrollments and progress.
pub struct DeleteUserUseCase<U, E, P>
where
    U: UserRepository,
    E: EnrollmentRepository,
    P: ProgressRepository,
{
    pub users: U,
    pub enrollments: E,
    pub progress: P,
}

impl<U, E, P> DeleteUserUseCase<U, E, P>
where
    U: UserRepository,
    E: EnrollmentRepository,
    P: ProgressRepository,
{
    pub async fn execute(&self, user_id: Uuid) -> Result<(), ApiError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(ApiError::UserNotFound);
        }
        self.enrollments.delete_by_user(user_id).await?;
        self.progress.delete_by_user(user_id).await?;
        self.users.delete(user_id).await?;
        Ok(())
    }
}
