//! Settings table helpers

use crate::Result;
use sqlx::SqlitePool;

/// Insert a setting with its default value if it does not already exist.
/// Existing values (including user overrides) are left untouched.
pub async fn ensure_setting(pool: &SqlitePool, key: &str, default: &str) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
        .bind(key)
        .bind(default)
        .execute(pool)
        .await?;

    // Reset NULL values to the default
    sqlx::query("UPDATE settings SET value = ? WHERE key = ? AND value IS NULL")
        .bind(default)
        .bind(key)
        .execute(pool)
        .await?;

    Ok(())
}

/// Read an integer setting, falling back to `default` when the row is
/// missing or does not parse.
pub async fn get_setting_i64(pool: &SqlitePool, key: &str, default: i64) -> Result<i64> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(value
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(default))
}
