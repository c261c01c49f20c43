use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Runs the versioned migrations for the current schema.
///
/// Version 1 creates the two content collections and session progress.
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

    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS math_problems (
                    id TEXT PRIMARY KEY,
                    question TEXT NOT NULL,
                    display TEXT NOT NULL,
                    answer INTEGER NOT NULL,
                    kind TEXT NOT NULL,
                    difficulty TEXT NOT NULL,
                    created_at TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS english_exercises (
                    id TEXT PRIMARY KEY,
                    kind TEXT NOT NULL,
                    question TEXT NOT NULL,
                    display TEXT NOT NULL,
                    accepted_answers TEXT NOT NULL,
                    correct_answer TEXT NOT NULL,
                    explanation TEXT,
                    difficulty TEXT NOT NULL,
                    created_at TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS session_progress (
                    session_id TEXT PRIMARY KEY,
                    id TEXT NOT NULL,
                    math_score INTEGER NOT NULL CHECK (math_score >= 0),
                    english_score INTEGER NOT NULL CHECK (english_score >= 0),
                    math_streak INTEGER NOT NULL CHECK (math_streak >= 0),
                    english_streak INTEGER NOT NULL CHECK (english_streak >= 0),
                    problems_solved INTEGER NOT NULL CHECK (problems_solved >= 0),
                    last_activity TEXT NOT NULL,
                    expires_at TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_math_problems_kind_difficulty
                    ON math_problems (kind, difficulty);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_english_exercises_kind_difficulty
                    ON english_exercises (kind, difficulty);
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
    }

    Ok(())
}
