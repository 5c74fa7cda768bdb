use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

use opencourse_core::health::{healthz, readyz};
use opencourse_core::middleware::request_id_layer;

use crate::handlers::{
    admin::{dashboard, delete_user, get_user, list_users, set_user_verification, update_user_role},
    auth::{is_auth, login, logout, register, resend_otp, reset_password, send_reset_otp, verify_email},
    course::{create_course, delete_course, get_course, list_courses, update_course},
    enrollment::{enroll, my_enrolled},
    lesson::{add_lesson, delete_lesson, update_lesson},
    progress::{complete_lesson, get_progress},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/api/auth/register", post(register))
        .route("/api/auth/verify-email", post(verify_email))
        .route("/api/auth/resend-otp", post(resend_otp))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/is-auth", get(is_auth))
        .route("/api/auth/send-reset-otp", post(send_reset_otp))
        .route("/api/auth/reset-password", post(reset_password))
        // Courses
        .route("/api/courses", get(list_courses))
        .route("/api/courses", post(create_course))
        .route("/api/courses/{id}", get(get_course))
        .route("/api/courses/{id}", patch(update_course))
        .route("/api/courses/{id}", delete(delete_course))
        // Lessons
        .route("/api/courses/{id}/lessons", post(add_lesson))
        .route("/api/courses/{id}/lessons/{slug}", patch(update_lesson))
        .route("/api/courses/{id}/lessons/{slug}", delete(delete_lesson))
        // Enrollment + progress
        .route("/api/courses/{id}/enroll", post(enroll))
        .route("/api/courses/{id}/progress", get(get_progress))
        .route(
            "/api/courses/{id}/lessons/{slug}/complete",
            post(complete_lesson),
        )
        // Static "my" wins over the {id} capture at the same position.
        .route("/api/courses/my/enrolled", get(my_enrolled))
        // Admin
        .route("/api/admin/dashboard", get(dashboard))
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/{id}", get(get_user))
        .route("/api/admin/users/{id}", delete(delete_user))
        .route("/api/admin/users/{id}/role", patch(update_user_role))
        .route(
            "/api/admin/users/{id}/verification",
            patch(set_user_verification),
        )
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
