// src/handlers/quiz.rs

use std::collections::{BTreeMap, HashMap};

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde_json::{Value, json};
use sqlx::{SqlitePool, types::Json as SqlJson};

use crate::{
    error::{AppError, is_unique_violation},
    models::{
        quiz::{
            CreateQuizRequest, PublicQuestion, Question, Quiz, QuizDetailResponse, QuizSummary,
            StudentQuery, StudentQuizItem, TeacherQuizSummary,
        },
        submission::{
            AnswerDetail, GradeSubmissionRequest, LeaderboardEntry, QuizSubmission,
            SubmissionHistoryItem, SubmissionSummary, SubmitQuizRequest,
        },
    },
};

/// Creates a quiz with its questions and notifies enrolled students.
///
/// Question entries missing `text` or `type` are skipped silently.
/// Quiz, questions and the per-student notifications are written in one
/// transaction: a failure partway leaves no partial quiz behind.
pub async fn create_quiz(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let instructions = payload
        .instructions
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing instruction".to_string()))?;
    let teacher_id = payload
        .teacher_id
        .ok_or_else(|| AppError::BadRequest("Missing teacher".to_string()))?;
    let course_id = payload
        .course_id
        .ok_or_else(|| AppError::BadRequest("Missing course_id".to_string()))?;
    let questions = payload
        .questions
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing questions".to_string()))?;

    let mut tx = pool.begin().await?;

    let quiz_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO quizzes (title, instructions, teacher_id, course_id)
        VALUES (?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&payload.title)
    .bind(&instructions)
    .bind(teacher_id)
    .bind(course_id)
    .fetch_one(&mut *tx)
    .await?;

    for question in &questions {
        let text = question.text.as_deref().filter(|s| !s.is_empty());
        let question_type = question.question_type.as_deref().filter(|s| !s.is_empty());
        let (Some(text), Some(question_type)) = (text, question_type) else {
            continue;
        };

        sqlx::query(
            r#"
            INSERT INTO questions (quiz_id, text, type, options, correct_option)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(quiz_id)
        .bind(text)
        .bind(question_type)
        .bind(question.options.as_ref().map(SqlJson))
        .bind(question.correct_option)
        .execute(&mut *tx)
        .await?;
    }

    // Notify every student currently enrolled in the course.
    let student_ids: Vec<i64> =
        sqlx::query_scalar("SELECT student_id FROM enrollments WHERE course_id = ?")
            .bind(course_id)
            .fetch_all(&mut *tx)
            .await?;

    for student_id in student_ids {
        sqlx::query("INSERT INTO notifications (recipient_id, message) VALUES (?, ?)")
            .bind(student_id)
            .bind(format!(
                "New quiz uploaded in your course (ID: {})",
                course_id
            ))
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok(Json(
        json!({ "message": "Quiz created successfully with notifications" }),
    ))
}

/// Quiz detail with its questions. `correct_option` is withheld from
/// this view so students cannot read the answer key.
pub async fn get_quiz(
    State(pool): State<SqlitePool>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = sqlx::query_as::<_, Quiz>(
        "SELECT id, title, instructions, teacher_id, course_id, created_at \
         FROM quizzes WHERE id = ?",
    )
    .bind(quiz_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    let questions = sqlx::query_as::<_, PublicQuestion>(
        "SELECT id, text, type, options FROM questions WHERE quiz_id = ? ORDER BY id",
    )
    .bind(quiz_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(QuizDetailResponse {
        id: quiz.id,
        title: quiz.title,
        instructions: quiz.instructions,
        questions,
    }))
}

/// Quizzes visible to a student, grouped by enrolled course id.
pub async fn get_quizzes_for_student(
    State(pool): State<SqlitePool>,
    Query(query): Query<StudentQuery>,
) -> Result<impl IntoResponse, AppError> {
    let student_id = query
        .student_id
        .ok_or_else(|| AppError::BadRequest("Missing student ID".to_string()))?;

    let quizzes = sqlx::query_as::<_, StudentQuizItem>(
        r#"
        SELECT q.id, q.title, q.instructions, q.course_id
        FROM quizzes q
        JOIN enrollments e ON e.course_id = q.course_id
        WHERE e.student_id = ?
        ORDER BY q.course_id, q.id
        "#,
    )
    .bind(student_id)
    .fetch_all(&pool)
    .await?;

    let mut course_quiz_map: BTreeMap<i64, Vec<StudentQuizItem>> = BTreeMap::new();
    for quiz in quizzes {
        course_quiz_map.entry(quiz.course_id).or_default().push(quiz);
    }

    Ok(Json(course_quiz_map))
}

/// All quizzes with their question counts.
pub async fn get_all_quizzes(
    State(pool): State<SqlitePool>,
) -> Result<impl IntoResponse, AppError> {
    let quizzes = sqlx::query_as::<_, QuizSummary>(
        r#"
        SELECT q.id, q.title, q.instructions, q.created_at, COUNT(qs.id) AS question_count
        FROM quizzes q
        LEFT JOIN questions qs ON qs.quiz_id = q.id
        GROUP BY q.id
        ORDER BY q.created_at DESC, q.id DESC
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch quizzes: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(quizzes))
}

/// A teacher's quizzes with question counts. 404 when no such teacher.
pub async fn get_teacher_quizzes(
    State(pool): State<SqlitePool>,
    Path(teacher_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let teacher: Option<i64> =
        sqlx::query_scalar("SELECT id FROM users WHERE id = ? AND role = 'teacher'")
            .bind(teacher_id)
            .fetch_optional(&pool)
            .await?;

    if teacher.is_none() {
        return Err(AppError::NotFound("Teacher not found".to_string()));
    }

    let quizzes = sqlx::query_as::<_, TeacherQuizSummary>(
        r#"
        SELECT q.id, COALESCE(q.title, 'Untitled Quiz') AS title, q.instructions,
               COUNT(qs.id) AS questions, q.created_at
        FROM quizzes q
        LEFT JOIN questions qs ON qs.quiz_id = q.id
        WHERE q.teacher_id = ?
        GROUP BY q.id
        ORDER BY q.id
        "#,
    )
    .bind(teacher_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(quizzes))
}

/// Submits a student's quiz attempt and computes the score.
///
/// * At most one submission per (quiz, student); the UNIQUE constraint stays
///   authoritative under concurrent duplicates.
/// * MCQ answers are graded by exact JSON equality against `correct_option`:
///   a string "1" never matches integer 1. Every other type is stored
///   ungraded (is_correct = false) for manual review.
/// * Answers referencing questions outside the quiz are skipped entirely.
/// * Submission, answers and the final score are one atomic write.
pub async fn submit_quiz(
    State(pool): State<SqlitePool>,
    Path(quiz_id): Path<i64>,
    Json(payload): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let student_id = payload
        .student_id
        .ok_or_else(|| AppError::BadRequest("Missing student ID".to_string()))?;
    let time_taken = payload
        .time_taken
        .ok_or_else(|| AppError::BadRequest("Missing time_taken".to_string()))?;
    if time_taken < 0 {
        return Err(AppError::BadRequest(
            "time_taken must be non-negative".to_string(),
        ));
    }
    let answers = payload.answers.unwrap_or_default();

    let existing: Option<i64> =
        sqlx::query_scalar("SELECT id FROM quiz_submissions WHERE quiz_id = ? AND student_id = ?")
            .bind(quiz_id)
            .bind(student_id)
            .fetch_optional(&pool)
            .await?;

    if existing.is_some() {
        return Err(AppError::Conflict(
            "You have already submitted this quiz".to_string(),
        ));
    }

    // The quiz's question set defines the score denominator.
    let questions = sqlx::query_as::<_, Question>(
        "SELECT id, quiz_id, text, type, options, correct_option \
         FROM questions WHERE quiz_id = ?",
    )
    .bind(quiz_id)
    .fetch_all(&pool)
    .await?;

    let total_questions = questions.len();
    let questions_by_id: HashMap<i64, &Question> =
        questions.iter().map(|q| (q.id, q)).collect();

    let mut tx = pool.begin().await?;

    let submission_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO quiz_submissions (quiz_id, student_id, time_taken)
        VALUES (?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(quiz_id)
    .bind(student_id)
    .bind(time_taken)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        // The pre-check above lost a race; the constraint is the final word.
        if is_unique_violation(&e) {
            AppError::Conflict("You have already submitted this quiz".to_string())
        } else {
            AppError::from(e)
        }
    })?;

    let mut correct_answers = 0usize;

    for entry in &answers {
        let (Some(question_id), Some(value)) = (entry.question_id, entry.answer.as_ref()) else {
            continue;
        };
        // Unknown questions contribute neither a correct count nor a stored row.
        let Some(question) = questions_by_id.get(&question_id) else {
            continue;
        };

        let is_correct = question.question_type == "mcq"
            && question.correct_option.is_some()
            && value.as_i64() == question.correct_option;

        if is_correct {
            correct_answers += 1;
        }

        let stored_answer = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        sqlx::query(
            r#"
            INSERT INTO quiz_answers (submission_id, question_id, answer, is_correct)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(submission_id)
        .bind(question_id)
        .bind(&stored_answer)
        .bind(is_correct)
        .execute(&mut *tx)
        .await?;
    }

    // Percentage over the quiz's full question set; 0 for an empty quiz.
    let score = if total_questions > 0 {
        correct_answers as f64 / total_questions as f64 * 100.0
    } else {
        0.0
    };

    sqlx::query("UPDATE quiz_submissions SET score = ? WHERE id = ?")
        .bind(score)
        .bind(submission_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Json(json!({
        "message": "Quiz submitted successfully",
        "score": score,
        "correct_answers": correct_answers,
        "total_questions": total_questions,
    })))
}

/// Leaderboard for a quiz: every submission joined with the student's name,
/// ordered by score descending (NULL scores last), ties broken by
/// time_taken ascending. No pagination; one row per enrolled student.
pub async fn leaderboard(
    State(pool): State<SqlitePool>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz: Option<i64> = sqlx::query_scalar("SELECT id FROM quizzes WHERE id = ?")
        .bind(quiz_id)
        .fetch_optional(&pool)
        .await?;

    if quiz.is_none() {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    let entries = sqlx::query_as::<_, LeaderboardEntry>(
        r#"
        SELECT s.student_id, u.name AS student_name, s.time_taken, s.score, s.submitted_at
        FROM quiz_submissions s
        JOIN users u ON u.id = s.student_id
        WHERE s.quiz_id = ?
        ORDER BY s.score IS NULL, s.score DESC, s.time_taken ASC
        "#,
    )
    .bind(quiz_id)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch leaderboard: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(entries))
}

/// Overrides a submission's score and notifies the student.
///
/// The new score is written as-is, with no [0, 100] bounds check; the update
/// and the notification are one transaction.
pub async fn update_quiz_score(
    State(pool): State<SqlitePool>,
    Path((quiz_id, student_id)): Path<(i64, i64)>,
    Json(payload): Json<GradeSubmissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new_score = payload
        .score
        .ok_or_else(|| AppError::BadRequest("Missing score".to_string()))?;
    let feedback = payload.feedback.unwrap_or_default();

    let mut tx = pool.begin().await?;

    let submission_id: i64 =
        sqlx::query_scalar("SELECT id FROM quiz_submissions WHERE quiz_id = ? AND student_id = ?")
            .bind(quiz_id)
            .bind(student_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound("Submission not found".to_string()))?;

    sqlx::query("UPDATE quiz_submissions SET score = ? WHERE id = ?")
        .bind(new_score)
        .bind(submission_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("INSERT INTO notifications (recipient_id, message) VALUES (?, ?)")
        .bind(student_id)
        .bind(format!(
            "Your quiz score was updated to {}%. Feedback: {}",
            new_score, feedback
        ))
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Json(json!({ "message": "Score updated and student notified" })))
}

/// All submissions for a quiz, for teacher review.
pub async fn get_quiz_submissions(
    State(pool): State<SqlitePool>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let submissions = sqlx::query_as::<_, SubmissionSummary>(
        r#"
        SELECT s.student_id, u.name AS student_name, s.submitted_at, s.time_taken, s.score
        FROM quiz_submissions s
        JOIN users u ON u.id = s.student_id
        WHERE s.quiz_id = ?
        ORDER BY s.submitted_at, s.id
        "#,
    )
    .bind(quiz_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(submissions))
}

/// One student's submission for a quiz, with per-question answers,
/// as seen by the grading teacher.
pub async fn get_submission_detail(
    State(pool): State<SqlitePool>,
    Path((quiz_id, student_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let submission = fetch_submission(&pool, quiz_id, student_id).await?;

    let student_name: String = sqlx::query_scalar("SELECT name FROM users WHERE id = ?")
        .bind(student_id)
        .fetch_one(&pool)
        .await?;

    let answers = fetch_answer_details(&pool, submission.id).await?;

    Ok(Json(json!({
        "student_name": student_name,
        "time_taken": submission.time_taken,
        "submitted_at": submission.submitted_at,
        "score": submission.score,
        "answers": answers,
    })))
}

/// A student's own submission history across quizzes.
pub async fn get_student_submissions(
    State(pool): State<SqlitePool>,
    Path(student_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let history = sqlx::query_as::<_, SubmissionHistoryItem>(
        r#"
        SELECT s.quiz_id, COALESCE(q.title, 'Untitled') AS title,
               s.submitted_at, s.time_taken, s.score
        FROM quiz_submissions s
        LEFT JOIN quizzes q ON q.id = s.quiz_id
        WHERE s.student_id = ?
        ORDER BY s.submitted_at DESC, s.id DESC
        "#,
    )
    .bind(student_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(history))
}

/// A student's submission for one quiz, with a `reviewed` flag.
pub async fn get_student_submission_detail(
    State(pool): State<SqlitePool>,
    Path((student_id, quiz_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let submission = fetch_submission(&pool, quiz_id, student_id).await?;
    let answers = fetch_answer_details(&pool, submission.id).await?;

    Ok(Json(json!({
        "submitted_at": submission.submitted_at,
        "time_taken": submission.time_taken,
        "score": submission.score,
        "reviewed": submission.score.is_some(),
        "answers": answers,
    })))
}

async fn fetch_submission(
    pool: &SqlitePool,
    quiz_id: i64,
    student_id: i64,
) -> Result<QuizSubmission, AppError> {
    sqlx::query_as::<_, QuizSubmission>(
        "SELECT id, quiz_id, student_id, time_taken, score, submitted_at \
         FROM quiz_submissions WHERE quiz_id = ? AND student_id = ?",
    )
    .bind(quiz_id)
    .bind(student_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Submission not found".to_string()))
}

async fn fetch_answer_details(
    pool: &SqlitePool,
    submission_id: i64,
) -> Result<Vec<AnswerDetail>, AppError> {
    let answers = sqlx::query_as::<_, AnswerDetail>(
        r#"
        SELECT q.text AS question, q.type AS question_type, q.options,
               a.answer AS student_answer, q.correct_option AS correct_answer
        FROM quiz_answers a
        JOIN questions q ON q.id = a.question_id
        WHERE a.submission_id = ?
        ORDER BY a.id
        "#,
    )
    .bind(submission_id)
    .fetch_all(pool)
    .await?;

    Ok(answers)
}
