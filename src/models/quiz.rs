// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};

/// Represents the 'quizzes' table in the database.
/// A quiz owns its questions and submissions; deleting it cascades to both.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    pub title: Option<String>,
    pub instructions: String,
    pub teacher_id: i64,
    pub course_id: i64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub quiz_id: i64,

    /// The text content of the question.
    pub text: String,

    /// Question type: 'short', 'long', 'mcq' or 'number'.
    /// Mapped from the database column 'type' since `type` is a reserved
    /// keyword in Rust.
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub question_type: String,

    /// List of option labels, mcq only. Stored as a JSON array.
    pub options: Option<Json<Vec<String>>>,

    /// Index into `options` of the correct answer, mcq only.
    pub correct_option: Option<i64>,
}

/// DTO for sending a question to students (withholds `correct_option`).
#[derive(Debug, Serialize, FromRow)]
pub struct PublicQuestion {
    pub id: i64,
    pub text: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub question_type: String,
    pub options: Option<Json<Vec<String>>>,
}

/// DTO for creating a quiz with its questions in one request.
/// Required fields are `Option` so the handler can answer 400 with a
/// field-specific message rather than a generic deserialize failure.
#[derive(Debug, Deserialize)]
pub struct CreateQuizRequest {
    pub instructions: Option<String>,
    pub teacher_id: Option<i64>,
    pub course_id: Option<i64>,
    pub title: Option<String>,
    pub questions: Option<Vec<QuestionSpec>>,
}

/// One question entry inside a create-quiz request.
/// Entries missing `text` or `type` are skipped silently, not rejected.
#[derive(Debug, Deserialize)]
pub struct QuestionSpec {
    pub text: Option<String>,
    #[serde(rename = "type")]
    pub question_type: Option<String>,
    pub options: Option<Vec<String>>,
    pub correct_option: Option<i64>,
}

/// Quiz detail response: quiz header plus its questions, answers withheld.
#[derive(Debug, Serialize)]
pub struct QuizDetailResponse {
    pub id: i64,
    pub title: Option<String>,
    pub instructions: String,
    pub questions: Vec<PublicQuestion>,
}

/// Row of the global quiz listing, with a question count.
#[derive(Debug, Serialize, FromRow)]
pub struct QuizSummary {
    pub id: i64,
    pub title: Option<String>,
    pub instructions: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub question_count: i64,
}

/// Row of the per-teacher quiz listing.
#[derive(Debug, Serialize, FromRow)]
pub struct TeacherQuizSummary {
    pub id: i64,
    pub title: String,
    pub instructions: String,
    pub questions: i64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Quiz entry in the per-student course map.
#[derive(Debug, Serialize, FromRow)]
pub struct StudentQuizItem {
    pub id: i64,
    pub title: Option<String>,
    pub instructions: String,
    #[serde(skip)]
    pub course_id: i64,
}

/// Query string carrying the acting student's id.
#[derive(Debug, Deserialize)]
pub struct StudentQuery {
    pub student_id: Option<i64>,
}
