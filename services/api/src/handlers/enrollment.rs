use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use uuid::Uuid;

use opencourse_auth::session::Session;

use crate::error::ApiError;
use crate::handlers::course::CourseResponse;
use crate::state::AppState;
use crate::usecase::enrollment::{EnrollUseCase, MyEnrolledUseCase};

// ── POST /api/courses/{id}/enroll ────────────────────────────────────────────

pub async fn enroll(
    session: Session,
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let usecase = EnrollUseCase {
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
        progress: state.progress_repo(),
    };
    usecase.execute(session.user_id, course_id).await?;
    Ok(StatusCode::CREATED)
}

// ── GET /api/courses/my/enrolled ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct EnrolledCourseResponse {
    #[serde(flatten)]
    pub course: CourseResponse,
    pub percent: u8,
}

pub async fn my_enrolled(
    session: Session,
    State(state): State<AppState>,
) -> Result<Json<Vec<EnrolledCourseResponse>>, ApiError> {
    let usecase = MyEnrolledUseCase {
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
        progress: state.progress_repo(),
    };
    let enrolled = usecase.execute(session.user_id).await?;
    Ok(Json(
        enrolled
            .into_iter()
            .map(|e| EnrolledCourseResponse {
                course: CourseResponse::from_course(e.course),
                percent: e.percent,
            })
            .collect(),
    ))
}
