//! Fire-and-forget notification dispatch.
//!
//! Workflow transitions record an outbound event for the mail/notification
//! worker to pick up. Dispatch happens after the primary transaction commits,
//! on a spawned task: best effort, at most once, never blocks or fails the
//! mutating request.

use serde_json::Value;
use uuid::Uuid;

use crate::db::DbPool;

#[derive(Debug, Clone)]
pub struct Notification {
    /// Recipient account, when one exists.
    pub user_id: Option<Uuid>,
    /// Direct email recipient for leads submitted without an account.
    pub email: Option<String>,
    pub event: &'static str,
    pub payload: Value,
}

impl Notification {
    pub fn to_user(user_id: Uuid, event: &'static str, payload: Value) -> Self {
        Self {
            user_id: Some(user_id),
            email: None,
            event,
            payload,
        }
    }

    pub fn to_email(email: impl Into<String>, event: &'static str, payload: Value) -> Self {
        Self {
            user_id: None,
            email: Some(email.into()),
            event,
            payload,
        }
    }
}

pub fn dispatch(pool: &DbPool, notification: Notification) {
    let pool = pool.clone();
    tokio::spawn(async move {
        if let Err(err) = insert(&pool, &notification).await {
            tracing::warn!(
                error = %err,
                event = notification.event,
                "notification dispatch failed"
            );
        }
    });
}

async fn insert(pool: &DbPool, notification: &Notification) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO notifications (id, user_id, email, event, payload)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(notification.user_id)
    .bind(notification.email.as_deref())
    .bind(notification.event)
    .bind(&notification.payload)
    .execute(pool)
    .await?;
    Ok(())
}
