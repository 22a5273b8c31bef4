// src/models/submission.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};

/// Represents the 'quiz_submissions' table: a student's one-time attempt at
/// a quiz. UNIQUE(quiz_id, student_id) at the storage layer.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QuizSubmission {
    pub id: i64,
    pub quiz_id: i64,
    pub student_id: i64,

    /// Seconds the student spent on the quiz.
    pub time_taken: i64,

    /// Percentage score. Nullable; a teacher may overwrite it at any time.
    pub score: Option<f64>,

    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    pub student_id: Option<i64>,
    pub answers: Option<Vec<AnswerEntry>>,
    pub time_taken: Option<i64>,
}

/// One answer inside a submission. `answer` stays a raw JSON value: mcq
/// answers arrive as option indexes, free-text answers as strings, and the
/// grader compares by JSON type, never by coercion.
#[derive(Debug, Deserialize)]
pub struct AnswerEntry {
    pub question_id: Option<i64>,
    pub answer: Option<serde_json::Value>,
}

/// DTO for a teacher overriding a submission score.
#[derive(Debug, Deserialize)]
pub struct GradeSubmissionRequest {
    pub score: Option<f64>,
    pub feedback: Option<String>,
}

/// Leaderboard row: a submission joined with the student's display name.
#[derive(Debug, Serialize, FromRow)]
pub struct LeaderboardEntry {
    pub student_id: i64,
    pub student_name: String,
    pub time_taken: i64,
    pub score: Option<f64>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Submission row for the teacher review listing.
#[derive(Debug, Serialize, FromRow)]
pub struct SubmissionSummary {
    pub student_id: i64,
    pub student_name: String,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub time_taken: i64,
    pub score: Option<f64>,
}

/// One answer joined with its question, for submission detail views.
#[derive(Debug, Serialize, FromRow)]
pub struct AnswerDetail {
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: String,
    pub options: Option<Json<Vec<String>>>,
    pub student_answer: String,
    pub correct_answer: Option<i64>,
}

/// Row of a student's submission history, with the quiz title.
#[derive(Debug, Serialize, FromRow)]
pub struct SubmissionHistoryItem {
    pub quiz_id: i64,
    pub title: String,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub time_taken: i64,
    pub score: Option<f64>,
}
