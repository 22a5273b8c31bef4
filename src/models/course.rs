// src/models/course.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'courses' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,

    /// Thumbnail URL. Uploading the file itself is an external concern;
    /// the API only ever stores the resulting URL.
    pub thumbnail: Option<String>,

    pub youtube_link: Option<String>,
    pub teacher_id: i64,

    /// Denormalized enrollment counter. NULL until the first enrollment.
    pub students: Option<i64>,
}

/// DTO for creating a course. All fields optional so missing ones can be
/// reported as 400 with a specific message instead of a deserialize failure.
#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub teacher_id: Option<i64>,
    pub youtube_link: Option<String>,
    pub thumbnail: Option<String>,
}

/// DTO for partially updating a course. Only present fields are written.
#[derive(Debug, Deserialize)]
pub struct UpdateCourseRequest {
    pub teacher_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub youtube_link: Option<String>,
    pub thumbnail: Option<String>,
}

/// DTO for enrolling a student into a course.
#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    pub student_id: Option<i64>,
}

/// Query string for course detail: `?student_id=` adds an `enrolled` flag.
#[derive(Debug, Deserialize)]
pub struct CourseDetailQuery {
    pub student_id: Option<i64>,
}

/// Compact course card used by the student dashboard.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CourseCard {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub thumbnail: Option<String>,
}

/// Course card for the teacher dashboard, with a live enrollment count.
#[derive(Debug, Serialize, FromRow)]
pub struct TeacherCourseCard {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub students: i64,
    pub thumbnail: Option<String>,
}
