use quiz_core::model::{EnglishExercise, EnglishFilter, ExerciseId};

use super::SqliteRepository;
use super::mapping::{
    accepted_answers_json, count_from_i64, map_exercise_row, read_err, write_err,
};
use crate::repository::{EnglishExerciseRepository, StorageError};

#[async_trait::async_trait]
impl EnglishExerciseRepository for SqliteRepository {
    async fn sample_exercise(
        &self,
        filter: EnglishFilter,
    ) -> Result<Option<EnglishExercise>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT
                id, kind, question, display, accepted_answers, correct_answer,
                explanation, difficulty, created_at
            FROM english_exercises
            WHERE (?1 IS NULL OR kind = ?1)
              AND (?2 IS NULL OR difficulty = ?2)
            ORDER BY RANDOM()
            LIMIT 1
            ",
        )
        .bind(filter.kind.map(|k| k.as_str()))
        .bind(filter.difficulty.map(|d| d.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(read_err)?;

        row.as_ref().map(map_exercise_row).transpose()
    }

    async fn get_exercise(&self, id: ExerciseId) -> Result<Option<EnglishExercise>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT
                id, kind, question, display, accepted_answers, correct_answer,
                explanation, difficulty, created_at
            FROM english_exercises
            WHERE id = ?1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(read_err)?;

        row.as_ref().map(map_exercise_row).transpose()
    }

    async fn insert_exercises(&self, exercises: &[EnglishExercise]) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(read_err)?;

        for exercise in exercises {
            sqlx::query(
                r"
                INSERT INTO english_exercises (
                    id, kind, question, display, accepted_answers, correct_answer,
                    explanation, difficulty, created_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ",
            )
            .bind(exercise.id.to_string())
            .bind(exercise.kind.as_str())
            .bind(&exercise.question)
            .bind(&exercise.display)
            .bind(accepted_answers_json(&exercise.accepted_answers)?)
            .bind(&exercise.correct_answer)
            .bind(exercise.explanation.as_deref())
            .bind(exercise.difficulty.as_str())
            .bind(exercise.created_at)
            .execute(&mut *tx)
            .await
            .map_err(write_err)?;
        }

        tx.commit().await.map_err(write_err)
    }

    async fn count_exercises(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM english_exercises")
            .fetch_one(&self.pool)
            .await
            .map_err(read_err)?;
        count_from_i64(count)
    }
}
