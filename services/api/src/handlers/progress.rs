use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use uuid::Uuid;

use opencourse_auth::session::Session;

use crate::domain::types::Progress;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::progress::{CompleteLessonUseCase, GetProgressUseCase};

#[derive(Serialize)]
pub struct CompletedLessonResponse {
    pub lesson_slug: String,
    pub lesson_index: i32,
    #[serde(serialize_with = "opencourse_core::serde::to_rfc3339_ms")]
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize)]
pub struct ProgressResponse {
    pub course_id: String,
    pub percent: u8,
    pub completed: Vec<CompletedLessonResponse>,
}

impl ProgressResponse {
    fn from_progress(record: Progress) -> Self {
        Self {
            course_id: record.course_id.to_string(),
            percent: record.percent,
            completed: record
                .completed
                .into_iter()
                .map(|c| CompletedLessonResponse {
                    lesson_slug: c.lesson_slug,
                    lesson_index: c.lesson_index,
                    completed_at: c.completed_at,
                })
                .collect(),
        }
    }
}

// ── POST /api/courses/{id}/lessons/{slug}/complete ───────────────────────────

pub async fn complete_lesson(
    session: Session,
    State(state): State<AppState>,
    Path((course_id, slug)): Path<(Uuid, String)>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let usecase = CompleteLessonUseCase {
        enrollments: state.enrollment_repo(),
        lessons: state.lesson_repo(),
        progress: state.progress_repo(),
    };
    let record = usecase.execute(session.user_id, course_id, &slug).await?;
    Ok(Json(ProgressResponse::from_progress(record)))
}

// ── GET /api/courses/{id}/progress ───────────────────────────────────────────

pub async fn get_progress(
    session: Session,
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let usecase = GetProgressUseCase {
        enrollments: state.enrollment_repo(),
        progress: state.progress_repo(),
    };
    let record = usecase.execute(session.user_id, course_id).await?;
    Ok(Json(ProgressResponse::from_progress(record)))
}
