// src/handlers/notifications.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{error::AppError, models::notification::NotificationView};

/// Latest 20 notifications for a user, newest first.
pub async fn get_notifications(
    State(pool): State<SqlitePool>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let notifications = sqlx::query_as::<_, NotificationView>(
        r#"
        SELECT id, message, is_read, timestamp
        FROM notifications
        WHERE recipient_id = ?
        ORDER BY timestamp DESC, id DESC
        LIMIT 20
        "#,
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(notifications))
}

/// Marks all of a user's notifications as read.
pub async fn mark_read(
    State(pool): State<SqlitePool>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    sqlx::query("UPDATE notifications SET is_read = 1 WHERE recipient_id = ?")
        .bind(user_id)
        .execute(&pool)
        .await?;

    Ok(Json(json!({ "message": "All marked as read" })))
}
