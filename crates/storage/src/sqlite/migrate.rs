use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use super::SqliteInitError;

/// Runs a single, consolidated migration for the current schema.
///
/// Creates the full schema: reference data (books, chapters, verses), reader
/// accounts, per-verse and per-day reading records, reading plans, and
/// indexes. The uniqueness constraints on `(user_id, verse_id)` and
/// `(user_id, reading_date)` back the upsert semantics the repositories rely
/// on.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: full schema.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS books (
                    id INTEGER PRIMARY KEY,
                    book_number INTEGER NOT NULL UNIQUE CHECK (book_number >= 1),
                    name TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS chapters (
                    id INTEGER PRIMARY KEY,
                    book_id INTEGER NOT NULL,
                    chapter_number INTEGER NOT NULL CHECK (chapter_number >= 1),
                    verse_count INTEGER NOT NULL CHECK (verse_count >= 1),
                    UNIQUE (book_id, chapter_number),
                    FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS verses (
                    id INTEGER PRIMARY KEY,
                    book_id INTEGER NOT NULL,
                    chapter_number INTEGER NOT NULL CHECK (chapter_number >= 1),
                    verse_number INTEGER NOT NULL CHECK (verse_number >= 1),
                    UNIQUE (book_id, chapter_number, verse_number),
                    FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS users (
                    id TEXT PRIMARY KEY,
                    email TEXT NOT NULL UNIQUE COLLATE NOCASE,
                    password_hash TEXT NOT NULL,
                    created_at TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS verse_readings (
                    user_id TEXT NOT NULL,
                    verse_id INTEGER NOT NULL,
                    PRIMARY KEY (user_id, verse_id),
                    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
                    FOREIGN KEY (verse_id) REFERENCES verses(id) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS daily_readings (
                    user_id TEXT NOT NULL,
                    reading_date TEXT NOT NULL,
                    verses_read_count INTEGER NOT NULL CHECK (verses_read_count >= 1),
                    updated_at TEXT NOT NULL,
                    PRIMARY KEY (user_id, reading_date),
                    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS reading_plans (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    description TEXT,
                    daily_verse_target INTEGER NOT NULL CHECK (daily_verse_target >= 1),
                    is_active INTEGER NOT NULL DEFAULT 1
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_verses_book_chapter_number
                    ON verses (book_id, chapter_number, verse_number);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_daily_readings_user_date
                    ON daily_readings (user_id, reading_date DESC);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_reading_plans_active_target
                    ON reading_plans (is_active, daily_verse_target);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        info!(version = 1, "applied sqlite schema migration");
    }

    Ok(())
}
