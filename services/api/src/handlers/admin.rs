use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use opencourse_auth::session::Session;
use opencourse_domain::pagination::PageRequest;

use crate::error::ApiError;
use crate::handlers::auth::UserResponse;
use crate::handlers::require_admin;
use crate::state::AppState;
use crate::usecase::admin::{
    DashboardStatsUseCase, DeleteUserUseCase, GetUserDetailUseCase, ListUsersUseCase,
    SetVerificationUseCase, UpdateUserRoleUseCase,
};

// ── GET /api/admin/dashboard ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct DashboardResponse {
    pub total_users: u64,
    pub student_users: u64,
    pub admin_users: u64,
    pub verified_users: u64,
    pub total_courses: u64,
    pub total_lessons: u64,
    pub total_enrollments: u64,
    pub active_progress: u64,
}

pub async fn dashboard(
    session: Session,
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, ApiError> {
    require_admin(&session)?;
    let usecase = DashboardStatsUseCase {
        users: state.user_repo(),
        courses: state.course_repo(),
        lessons: state.lesson_repo(),
        enrollments: state.enrollment_repo(),
        progress: state.progress_repo(),
    };
    let stats = usecase.execute().await?;
    Ok(Json(DashboardResponse {
        total_users: stats.total_users,
        student_users: stats.student_users,
        admin_users: stats.admin_users,
        verified_users: stats.verified_users,
        total_courses: stats.total_courses,
        total_lessons: stats.total_lessons,
        total_enrollments: stats.total_enrollments,
        active_progress: stats.active_progress,
    }))
}

// ── GET /api/admin/users ─────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserListResponse {
    pub items: Vec<UserResponse>,
    pub total: u64,
}

pub async fn list_users(
    session: Session,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<UserListResponse>, ApiError> {
    require_admin(&session)?;
    let usecase = ListUsersUseCase {
        users: state.user_repo(),
    };
    let (items, total) = usecase.execute(page.clamped()).await?;
    Ok(Json(UserListResponse {
        items: items.into_iter().map(UserResponse::from_user).collect(),
        total,
    }))
}

// ── GET /api/admin/users/{id} ────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserEnrollmentResponse {
    pub course_id: String,
    pub course_title: String,
    pub percent: u8,
}

#[derive(Serialize)]
pub struct UserDetailResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub enrollments: Vec<UserEnrollmentResponse>,
}

pub async fn get_user(
    session: Session,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserDetailResponse>, ApiError> {
    require_admin(&session)?;
    let usecase = GetUserDetailUseCase {
        users: state.user_repo(),
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
        progress: state.progress_repo(),
    };
    let detail = usecase.execute(user_id).await?;
    Ok(Json(UserDetailResponse {
        user: UserResponse::from_user(detail.user),
        enrollments: detail
            .enrollments
            .into_iter()
            .map(|e| UserEnrollmentResponse {
                course_id: e.course_id.to_string(),
                course_title: e.course_title,
                percent: e.percent,
            })
            .collect(),
    }))
}

// ── PATCH /api/admin/users/{id}/role ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

pub async fn update_user_role(
    session: Session,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UpdateRoleRequest>,
) -> Result<StatusCode, ApiError> {
    require_admin(&session)?;
    let usecase = UpdateUserRoleUseCase {
        users: state.user_repo(),
    };
    usecase.execute(session.user_id, user_id, &body.role).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── PATCH /api/admin/users/{id}/verification ─────────────────────────────────

#[derive(Deserialize)]
pub struct SetVerificationRequest {
    pub is_verified: bool,
}

pub async fn set_user_verification(
    session: Session,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<SetVerificationRequest>,
) -> Result<StatusCode, ApiError> {
    require_admin(&session)?;
    let usecase = SetVerificationUseCase {
        users: state.user_repo(),
    };
    usecase
        .execute(session.user_id, user_id, body.is_verified)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /api/admin/users/{id} ─────────────────────────────────────────────

pub async fn delete_user(
    session: Session,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_admin(&session)?;
    let usecase = DeleteUserUseCase {
        users: state.user_repo(),
        enrollments: state.enrollment_repo(),
        progress: state.progress_repo(),
    };
    usecase.execute(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
