use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use opencourse_auth::session::Session;

use crate::error::ApiError;
use crate::handlers::course::LessonResponse;
use crate::handlers::require_admin;
use crate::state::AppState;
use crate::usecase::lesson::{
    AddLessonInput, AddLessonUseCase, DeleteLessonUseCase, UpdateLessonInput, UpdateLessonUseCase,
};

// ── POST /api/courses/{id}/lessons ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct AddLessonRequest {
    pub title: String,
    pub video_url: String,
    #[serde(default)]
    pub duration: String,
}

pub async fn add_lesson(
    session: Session,
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Json(body): Json<AddLessonRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&session)?;
    let usecase = AddLessonUseCase {
        courses: state.course_repo(),
        lessons: state.lesson_repo(),
    };
    let lesson = usecase
        .execute(
            course_id,
            AddLessonInput {
                title: body.title,
                video_url: body.video_url,
                duration: body.duration,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(LessonResponse::from_lesson(lesson))))
}

// ── PATCH /api/courses/{id}/lessons/{slug} ───────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateLessonRequest {
    pub title: Option<String>,
    pub video_url: Option<String>,
    pub duration: Option<String>,
}

pub async fn update_lesson(
    session: Session,
    State(state): State<AppState>,
    Path((course_id, slug)): Path<(Uuid, String)>,
    Json(body): Json<UpdateLessonRequest>,
) -> Result<Json<LessonResponse>, ApiError> {
    require_admin(&session)?;
    let usecase = UpdateLessonUseCase {
        lessons: state.lesson_repo(),
    };
    let lesson = usecase
        .execute(
            course_id,
            &slug,
            UpdateLessonInput {
                title: body.title,
                video_url: body.video_url,
                duration: body.duration,
            },
        )
        .await?;
    Ok(Json(LessonResponse::from_lesson(lesson)))
}

// ── DELETE /api/courses/{id}/lessons/{slug} ──────────────────────────────────

pub async fn delete_lesson(
    session: Session,
    State(state): State<AppState>,
    Path((course_id, slug)): Path<(Uuid, String)>,
) -> Result<StatusCode, ApiError> {
    require_admin(&session)?;
    let usecase = DeleteLessonUseCase {
        lessons: state.lesson_repo(),
        progress: state.progress_repo(),
    };
    usecase.execute(course_id, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
