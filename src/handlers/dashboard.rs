// src/handlers/dashboard.rs

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::course::{CourseCard, TeacherCourseCard},
};

#[derive(Debug, Deserialize)]
pub struct StudentDashboardQuery {
    pub student_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TeacherDashboardQuery {
    pub id: Option<i64>,
}

/// Student dashboard: enrolled course ids, enrolled course cards, and the
/// full catalog.
pub async fn student_dashboard(
    State(pool): State<SqlitePool>,
    Query(query): Query<StudentDashboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    let student_id = query
        .student_id
        .ok_or_else(|| AppError::BadRequest("Missing student ID".to_string()))?;

    let enrolled_ids: Vec<i64> =
        sqlx::query_scalar("SELECT course_id FROM enrollments WHERE student_id = ?")
            .bind(student_id)
            .fetch_all(&pool)
            .await?;

    let all_courses = sqlx::query_as::<_, CourseCard>(
        "SELECT id, title, description, thumbnail FROM courses ORDER BY id",
    )
    .fetch_all(&pool)
    .await?;

    let my_enrolled: Vec<CourseCard> = all_courses
        .iter()
        .filter(|c| enrolled_ids.contains(&c.id))
        .cloned()
        .collect();

    Ok(Json(json!({
        "enrolled": enrolled_ids,
        "my_enrolled": my_enrolled,
        "courses": all_courses,
    })))
}

/// Teacher dashboard: the teacher's courses with live enrollment counts,
/// plus the static action list the frontend renders as shortcuts.
pub async fn teacher_dashboard(
    State(pool): State<SqlitePool>,
    Query(query): Query<TeacherDashboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    let teacher_id = query
        .id
        .ok_or_else(|| AppError::BadRequest("Missing teacher ID".to_string()))?;

    let my_courses = sqlx::query_as::<_, TeacherCourseCard>(
        r#"
        SELECT c.id, c.title, c.description, COUNT(e.id) AS students, c.thumbnail
        FROM courses c
        LEFT JOIN enrollments e ON e.course_id = c.id
        WHERE c.teacher_id = ?
        GROUP BY c.id
        ORDER BY c.id
        "#,
    )
    .bind(teacher_id)
    .fetch_all(&pool)
    .await?;

    let actions = json!([
        { "title": "Upload New Course", "link": "/courses/create" },
        { "title": "Update Existing Course", "link": "/courses/edit" },
        { "title": "Upload Quiz", "link": "/quiz/create" },
        { "title": "Assign Marks to Quiz", "link": "/quiz/review" },
        { "title": "Check Leaderboard", "link": "/quiz/leaderboard" },
    ]);

    Ok(Json(json!({ "my_courses": my_courses, "actions": actions })))
}
