// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, courses, dashboard, notifications, quiz},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, courses, dashboards, quiz, notifications).
/// * Applies global middleware (Trace, CORS from config).
/// * Injects global state (pool + config).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login));

    let course_routes = Router::new()
        .route("/create-course", post(courses::create_course))
        .route("/enroll/{course_id}", post(courses::enroll))
        .route("/course/{course_id}", get(courses::get_course))
        .route("/update-course/{course_id}", put(courses::update_course));

    let dashboard_routes = Router::new()
        .route("/dashboard/student", get(dashboard::student_dashboard))
        .route("/dashboard/teacher", get(dashboard::teacher_dashboard));

    let quiz_routes = Router::new()
        .route("/quiz/create", post(quiz::create_quiz))
        .route("/quiz/student", get(quiz::get_quizzes_for_student))
        .route("/quiz/teacher/{teacher_id}", get(quiz::get_teacher_quizzes))
        .route("/quiz/{quiz_id}", get(quiz::get_quiz))
        .route("/quizzes", get(quiz::get_all_quizzes))
        .route("/submit-quiz/{quiz_id}", post(quiz::submit_quiz))
        .route("/leaderboard/{quiz_id}", get(quiz::leaderboard))
        .route(
            "/quiz/{quiz_id}/score/{student_id}",
            post(quiz::update_quiz_score),
        )
        .route("/quiz/{quiz_id}/submissions", get(quiz::get_quiz_submissions))
        .route(
            "/quiz/{quiz_id}/submission/{student_id}",
            get(quiz::get_submission_detail),
        )
        .route(
            "/student/{student_id}/submissions",
            get(quiz::get_student_submissions),
        )
        .route(
            "/student/{student_id}/submission/{quiz_id}",
            get(quiz::get_student_submission_detail),
        );

    let notification_routes = Router::new()
        .route("/notifications/{user_id}", get(notifications::get_notifications))
        .route(
            "/notifications/mark-read/{user_id}",
            post(notifications::mark_read),
        );

    Router::new()
        .merge(auth_routes)
        .merge(course_routes)
        .merge(dashboard_routes)
        .merge(quiz_routes)
        .merge(notification_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
