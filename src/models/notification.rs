// src/models/notification.rs

use serde::Serialize;
use sqlx::FromRow;

/// One row of a user's notification feed (the recipient is implied by the
/// route). Notifications are created by system events only (course/quiz
/// creation, enrollment, manual grading) and mutated only via mark-read.
#[derive(Debug, Serialize, FromRow)]
pub struct NotificationView {
    pub id: i64,
    pub message: String,
    pub is_read: bool,
    pub timestamp: Option<chrono::DateTime<chrono::Utc>>,
}
