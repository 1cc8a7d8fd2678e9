//! Session token persistence
//!
//! Sessions are opaque random tokens delivered in an HttpOnly cookie.
//! Expired rows are deleted lazily on lookup.

use chrono::{DateTime, Duration, Utc};
use setlist_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Create a session for `user_guid` valid for `timeout_seconds`
pub async fn create_session(
    pool: &SqlitePool,
    user_guid: Uuid,
    timeout_seconds: i64,
) -> Result<String> {
    let token = Uuid::new_v4().to_string();
    let expires_at = (Utc::now() + Duration::seconds(timeout_seconds)).to_rfc3339();

    sqlx::query("INSERT INTO sessions (token, user_guid, expires_at) VALUES (?, ?, ?)")
        .bind(&token)
        .bind(user_guid.to_string())
        .bind(&expires_at)
        .execute(pool)
        .await?;

    Ok(token)
}

/// Resolve a session token to its user, dropping the row if expired
pub async fn lookup_session(pool: &SqlitePool, token: &str) -> Result<Option<Uuid>> {
    let row = sqlx::query("SELECT user_guid, expires_at FROM sessions WHERE token = ?")
        .bind(token)
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let expires_at: String = row.get("expires_at");
    let expires_at = DateTime::parse_from_rfc3339(&expires_at)
        .map_err(|e| Error::Internal(format!("Invalid session expiry: {}", e)))?
        .with_timezone(&Utc);

    if expires_at <= Utc::now() {
        delete_session(pool, token).await?;
        return Ok(None);
    }

    let user_guid: String = row.get("user_guid");
    let user_guid = Uuid::parse_str(&user_guid)
        .map_err(|e| Error::Internal(format!("Invalid session user guid: {}", e)))?;

    Ok(Some(user_guid))
}

pub async fn delete_session(pool: &SqlitePool, token: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;

    Ok(())
}
