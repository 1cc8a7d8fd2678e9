//! Song persistence, including the two-phase collection reorder
//!
//! `ord` is unique per owner and the constraint is checked per statement,
//! so a bulk renumbering cannot simply assign final values in place: some
//! intermediate statement would collide with a not-yet-moved row. Reorder
//! therefore runs in two transactions: park every song in a disjoint
//! negative range first, then assign the final positions.

use setlist_common::model::{normalize_sequence, SequenceItem, Song, SongOrder};
use setlist_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Partial update payload for a song
#[derive(Debug, Default)]
pub struct SongUpdate {
    pub title: Option<String>,
    pub key: Option<String>,
    pub sequence: Option<Vec<SequenceItem>>,
}

fn row_to_song(row: &sqlx::sqlite::SqliteRow) -> Result<Song> {
    let guid: String = row.get("guid");
    let sequence: String = row.get("sequence");

    Ok(Song {
        id: Uuid::parse_str(&guid)
            .map_err(|e| Error::Internal(format!("Invalid song guid: {}", e)))?,
        title: row.get("title"),
        key: row.get("key"),
        order: row.get("ord"),
        sequence: serde_json::from_str(&sequence)
            .map_err(|e| Error::Internal(format!("Invalid sequence JSON: {}", e)))?,
    })
}

/// Owner's songs ordered by collection position ascending
pub async fn list_songs(pool: &SqlitePool, owner: Uuid) -> Result<Vec<Song>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, title, key, ord, sequence
        FROM songs
        WHERE user_guid = ?
        ORDER BY ord ASC
        "#,
    )
    .bind(owner.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_song).collect()
}

/// Load one song, scoped to its owner
pub async fn get_song(pool: &SqlitePool, owner: Uuid, id: Uuid) -> Result<Option<Song>> {
    let row = sqlx::query(
        r#"
        SELECT guid, title, key, ord, sequence
        FROM songs
        WHERE guid = ? AND user_guid = ?
        "#,
    )
    .bind(id.to_string())
    .bind(owner.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_song).transpose()
}

/// Create a song at the end of the owner's collection
pub async fn create_song(
    pool: &SqlitePool,
    owner: Uuid,
    title: &str,
    key: Option<&str>,
    mut sequence: Vec<SequenceItem>,
) -> Result<Song> {
    normalize_sequence(&mut sequence);

    let next_ord: i64 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(ord), -1) + 1 FROM songs WHERE user_guid = ?",
    )
    .bind(owner.to_string())
    .fetch_one(pool)
    .await?;

    let song = Song {
        id: Uuid::new_v4(),
        title: title.to_string(),
        key: key.map(str::to_string),
        order: next_ord,
        sequence,
    };

    sqlx::query(
        r#"
        INSERT INTO songs (guid, user_guid, title, key, ord, sequence)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(song.id.to_string())
    .bind(owner.to_string())
    .bind(&song.title)
    .bind(&song.key)
    .bind(song.order)
    .bind(serialize_sequence(&song.sequence)?)
    .execute(pool)
    .await?;

    Ok(song)
}

/// Apply a partial update to an owner's song. Absent fields keep their
/// stored value; a provided sequence is renumbered before persisting.
pub async fn update_song(
    pool: &SqlitePool,
    owner: Uuid,
    id: Uuid,
    update: SongUpdate,
) -> Result<Song> {
    let mut song = get_song(pool, owner, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Song {} not found", id)))?;

    if let Some(title) = update.title {
        song.title = title;
    }
    if let Some(key) = update.key {
        song.key = Some(key);
    }
    if let Some(mut sequence) = update.sequence {
        normalize_sequence(&mut sequence);
        song.sequence = sequence;
    }

    sqlx::query(
        r#"
        UPDATE songs
        SET title = ?, key = ?, sequence = ?, updated_at = CURRENT_TIMESTAMP
        WHERE guid = ? AND user_guid = ?
        "#,
    )
    .bind(&song.title)
    .bind(&song.key)
    .bind(serialize_sequence(&song.sequence)?)
    .bind(id.to_string())
    .bind(owner.to_string())
    .execute(pool)
    .await?;

    Ok(song)
}

/// Delete an owner's song; the sequence dies with the row
pub async fn delete_song(pool: &SqlitePool, owner: Uuid, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM songs WHERE guid = ? AND user_guid = ?")
        .bind(id.to_string())
        .bind(owner.to_string())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Song {} not found", id)));
    }

    Ok(())
}

/// Two-phase collection renumbering.
///
/// Phase 1 parks every named song at `index - len`: negative (real orders
/// are always >= 0), ascending (relative order survives a crash between
/// the phases), and collision-free. Phase 2 assigns the final array
/// indices. No intermediate statement can violate UNIQUE(user_guid, ord).
///
/// Every UPDATE is owner-scoped; a batch entry that matches no row aborts
/// the whole reorder before anything is committed.
pub async fn reorder_songs(pool: &SqlitePool, owner: Uuid, orders: &[SongOrder]) -> Result<()> {
    let len = orders.len() as i64;

    // Phase 1: park in a disjoint range, clearing all original values
    let mut tx = pool.begin().await?;
    for (index, entry) in orders.iter().enumerate() {
        let parked = index as i64 - len;
        let result = sqlx::query("UPDATE songs SET ord = ? WHERE guid = ? AND user_guid = ?")
            .bind(parked)
            .bind(entry.id.to_string())
            .bind(owner.to_string())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Rolls back on drop
            return Err(Error::NotFound(format!("Song {} not found", entry.id)));
        }
    }
    tx.commit().await?;

    // Phase 2: final positions
    let mut tx = pool.begin().await?;
    for (index, entry) in orders.iter().enumerate() {
        sqlx::query(
            "UPDATE songs SET ord = ?, updated_at = CURRENT_TIMESTAMP WHERE guid = ? AND user_guid = ?",
        )
        .bind(index as i64)
        .bind(entry.id.to_string())
        .bind(owner.to_string())
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    Ok(())
}

fn serialize_sequence(sequence: &[SequenceItem]) -> Result<String> {
    serde_json::to_string(sequence)
        .map_err(|e| Error::Internal(format!("Failed to serialize sequence: {}", e)))
}
