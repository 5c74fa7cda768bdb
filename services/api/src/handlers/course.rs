use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use opencourse_auth::session::Session;
use opencourse_domain::pagination::PageRequest;

use crate::domain::types::{Course, Lesson};
use crate::error::ApiError;
use crate::handlers::require_admin;
use crate::state::AppState;
use crate::usecase::course::{
    CreateCourseInput, CreateCourseUseCase, DeleteCourseUseCase, GetCourseUseCase,
    ListCoursesUseCase, UpdateCourseInput, UpdateCourseUseCase,
};

#[derive(Serialize)]
pub struct CourseResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub thumbnail_url: Option<String>,
    #[serde(serialize_with = "opencourse_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "opencourse_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl CourseResponse {
    pub fn from_course(course: Course) -> Self {
        Self {
            id: course.id.to_string(),
            title: course.title,
            slug: course.slug,
            description: course.description,
            category: course.category,
            thumbnail_url: course.thumbnail_url,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct LessonResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub video_url: String,
    pub duration: String,
    pub position: i32,
}

impl LessonResponse {
    pub fn from_lesson(lesson: Lesson) -> Self {
        Self {
            id: lesson.id.to_string(),
            title: lesson.title,
            slug: lesson.slug,
            video_url: lesson.video_url,
            duration: lesson.duration,
            position: lesson.position,
        }
    }
}

// ── GET /api/courses ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CourseListResponse {
    pub items: Vec<CourseResponse>,
    pub total: u64,
}

pub async fn list_courses(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<CourseListResponse>, ApiError> {
    let usecase = ListCoursesUseCase {
        courses: state.course_repo(),
    };
    let (items, total) = usecase.execute(page.clamped()).await?;
    Ok(Json(CourseListResponse {
        items: items.into_iter().map(CourseResponse::from_course).collect(),
        total,
    }))
}

// ── GET /api/courses/{id} ────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CourseDetailResponse {
    #[serde(flatten)]
    pub course: CourseResponse,
    pub lessons: Vec<LessonResponse>,
    pub enrolled_count: u64,
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<CourseDetailResponse>, ApiError> {
    let usecase = GetCourseUseCase {
        courses: state.course_repo(),
        lessons: state.lesson_repo(),
        enrollments: state.enrollment_repo(),
    };
    let detail = usecase.execute(course_id).await?;
    Ok(Json(CourseDetailResponse {
        course: CourseResponse::from_course(detail.course),
        lessons: detail
            .lessons
            .into_iter()
            .map(LessonResponse::from_lesson)
            .collect(),
        enrolled_count: detail.enrolled_count,
    }))
}

// ── POST /api/courses ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub thumbnail_url: Option<String>,
}

pub async fn create_course(
    session: Session,
    State(state): State<AppState>,
    Json(body): Json<CreateCourseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&session)?;
    let usecase = CreateCourseUseCase {
        courses: state.course_repo(),
    };
    let course = usecase
        .execute(
            session.user_id,
            CreateCourseInput {
                title: body.title,
                description: body.description,
                category: body.category,
                thumbnail_url: body.thumbnail_url,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(CourseResponse::from_course(course))))
}

// ── PATCH /api/courses/{id} ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub thumbnail_url: Option<String>,
}

pub async fn update_course(
    session: Session,
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Json(body): Json<UpdateCourseRequest>,
) -> Result<Json<CourseResponse>, ApiError> {
    require_admin(&session)?;
    let usecase = UpdateCourseUseCase {
        courses: state.course_repo(),
    };
    let course = usecase
        .execute(
            course_id,
            UpdateCourseInput {
                title: body.title,
                description: body.description,
                category: body.category,
                thumbnail_url: body.thumbnail_url,
            },
        )
        .await?;
    Ok(Json(CourseResponse::from_course(course)))
}

// ── DELETE /api/courses/{id} ─────────────────────────────────────────────────

pub async fn delete_course(
    session: Session,
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_admin(&session)?;
    let usecase = DeleteCourseUseCase {
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
        progress: state.progress_repo(),
    };
    usecase.execute(course_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
