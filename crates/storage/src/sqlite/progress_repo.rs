use quiz_core::model::{SessionId, SessionProgress};

use super::SqliteRepository;
use super::mapping::{map_progress_row, read_err, write_err};
use crate::repository::{ProgressRepository, StorageError};

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn get_progress(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<SessionProgress>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT
                id, session_id, math_score, english_score, math_streak, english_streak,
                problems_solved, last_activity, expires_at
            FROM session_progress
            WHERE session_id = ?1
            ",
        )
        .bind(session_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(read_err)?;

        row.as_ref().map(map_progress_row).transpose()
    }

    async fn upsert_progress(&self, progress: &SessionProgress) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO session_progress (
                session_id, id, math_score, english_score, math_streak, english_streak,
                problems_solved, last_activity, expires_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(session_id) DO UPDATE SET
                -- the record id is fixed at creation; only counters and timestamps move
                math_score = excluded.math_score,
                english_score = excluded.english_score,
                math_streak = excluded.math_streak,
                english_streak = excluded.english_streak,
                problems_solved = excluded.problems_solved,
                last_activity = excluded.last_activity,
                expires_at = excluded.expires_at
            ",
        )
        .bind(progress.session_id().as_str())
        .bind(progress.id().to_string())
        .bind(i64::from(progress.math_score()))
        .bind(i64::from(progress.english_score()))
        .bind(i64::from(progress.math_streak()))
        .bind(i64::from(progress.english_streak()))
        .bind(i64::from(progress.problems_solved()))
        .bind(progress.last_activity())
        .bind(progress.expires_at())
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        Ok(())
    }
}
