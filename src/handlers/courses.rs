// src/handlers/courses.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    error::{AppError, is_unique_violation},
    models::course::{
        Course, CourseDetailQuery, CreateCourseRequest, EnrollRequest, UpdateCourseRequest,
    },
};

/// Creates a course and broadcasts a notification to every student.
///
/// The course insert and the O(students) notification fan-out run in one
/// transaction: a failure partway leaves no partial state.
pub async fn create_course(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    let missing = || AppError::BadRequest("Missing required fields".to_string());
    let title = payload
        .title
        .filter(|s| !s.is_empty())
        .ok_or_else(missing)?;
    let description = payload
        .description
        .filter(|s| !s.is_empty())
        .ok_or_else(missing)?;
    let teacher_id = payload.teacher_id.ok_or_else(missing)?;

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO courses (title, description, thumbnail, youtube_link, teacher_id)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&title)
    .bind(&description)
    .bind(&payload.thumbnail)
    .bind(&payload.youtube_link)
    .bind(teacher_id)
    .execute(&mut *tx)
    .await?;

    // Full broadcast: every student, not just an interest group.
    let student_ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM users WHERE role = 'student'")
        .fetch_all(&mut *tx)
        .await?;

    for student_id in student_ids {
        sqlx::query("INSERT INTO notifications (recipient_id, message) VALUES (?, ?)")
            .bind(student_id)
            .bind(format!("New course uploaded: {}", title))
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok(Json(json!({ "message": "Course created successfully" })))
}

/// Enrolls a student into a course.
///
/// One transaction: enrollment row, denormalized counter bump
/// (initializing NULL to 1), and a notification to the course's teacher.
/// Duplicates are rejected by the UNIQUE(student_id, course_id) constraint,
/// which stays authoritative under concurrent requests.
pub async fn enroll(
    State(pool): State<SqlitePool>,
    Path(course_id): Path<i64>,
    Json(payload): Json<EnrollRequest>,
) -> Result<impl IntoResponse, AppError> {
    let student_id = payload
        .student_id
        .ok_or_else(|| AppError::BadRequest("Missing student ID".to_string()))?;

    let mut tx = pool.begin().await?;

    let course = sqlx::query_as::<_, Course>(
        "SELECT id, title, description, thumbnail, youtube_link, teacher_id, students \
         FROM courses WHERE id = ?",
    )
    .bind(course_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(AppError::NotFound("Course not found".to_string()))?;

    sqlx::query("INSERT INTO enrollments (student_id, course_id) VALUES (?, ?)")
        .bind(student_id)
        .bind(course_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Already enrolled".to_string())
            } else {
                AppError::from(e)
            }
        })?;

    sqlx::query("UPDATE courses SET students = COALESCE(students, 0) + 1 WHERE id = ?")
        .bind(course_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("INSERT INTO notifications (recipient_id, message) VALUES (?, ?)")
        .bind(course.teacher_id)
        .bind(format!(
            "A student has enrolled in your course: {}",
            course.title
        ))
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Json(json!({ "message": "Enrolled successfully" })))
}

/// Course detail. With `?student_id=`, also reports whether that student
/// is enrolled.
pub async fn get_course(
    State(pool): State<SqlitePool>,
    Path(course_id): Path<i64>,
    Query(query): Query<CourseDetailQuery>,
) -> Result<impl IntoResponse, AppError> {
    let course = sqlx::query_as::<_, Course>(
        "SELECT id, title, description, thumbnail, youtube_link, teacher_id, students \
         FROM courses WHERE id = ?",
    )
    .bind(course_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Course not found".to_string()))?;

    let enrolled = match query.student_id {
        Some(student_id) => {
            let count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM enrollments WHERE student_id = ? AND course_id = ?",
            )
            .bind(student_id)
            .bind(course_id)
            .fetch_one(&pool)
            .await?;
            count > 0
        }
        None => false,
    };

    Ok(Json(json!({
        "id": course.id,
        "title": course.title,
        "description": course.description,
        "youtube_link": course.youtube_link,
        "teacher_id": course.teacher_id,
        "enrolled": enrolled,
        "thumbnail": course.thumbnail,
        "students": course.students.unwrap_or(0),
    })))
}

/// Partially updates a course. Only the owning teacher may edit.
pub async fn update_course(
    State(pool): State<SqlitePool>,
    Path(course_id): Path<i64>,
    Json(payload): Json<UpdateCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    let teacher_id = payload
        .teacher_id
        .ok_or_else(|| AppError::BadRequest("Missing teacher ID".to_string()))?;

    let owned: Option<i64> =
        sqlx::query_scalar("SELECT id FROM courses WHERE id = ? AND teacher_id = ?")
            .bind(course_id)
            .bind(teacher_id)
            .fetch_optional(&pool)
            .await?;

    if owned.is_none() {
        return Err(AppError::Forbidden(
            "You are not authorized to edit this course.".to_string(),
        ));
    }

    if let Some(title) = payload.title.filter(|s| !s.is_empty()) {
        sqlx::query("UPDATE courses SET title = ? WHERE id = ?")
            .bind(title)
            .bind(course_id)
            .execute(&pool)
            .await?;
    }

    if let Some(description) = payload.description.filter(|s| !s.is_empty()) {
        sqlx::query("UPDATE courses SET description = ? WHERE id = ?")
            .bind(description)
            .bind(course_id)
            .execute(&pool)
            .await?;
    }

    if let Some(youtube_link) = payload.youtube_link.filter(|s| !s.is_empty()) {
        sqlx::query("UPDATE courses SET youtube_link = ? WHERE id = ?")
            .bind(youtube_link)
            .bind(course_id)
            .execute(&pool)
            .await?;
    }

    if let Some(thumbnail) = payload.thumbnail.filter(|s| !s.is_empty()) {
        sqlx::query("UPDATE courses SET thumbnail = ? WHERE id = ?")
            .bind(thumbnail)
            .bind(course_id)
            .execute(&pool)
            .await?;
    }

    Ok(Json(json!({ "message": "Course updated successfully" })))
}
