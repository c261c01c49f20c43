use quiz_core::model::{MathFilter, MathProblem, ProblemId};

use super::SqliteRepository;
use super::mapping::{count_from_i64, map_problem_row, read_err, write_err};
use crate::repository::{MathProblemRepository, StorageError};

#[async_trait::async_trait]
impl MathProblemRepository for SqliteRepository {
    async fn sample_problem(&self, filter: MathFilter) -> Result<Option<MathProblem>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, question, display, answer, kind, difficulty, created_at
            FROM math_problems
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

        row.as_ref().map(map_problem_row).transpose()
    }

    async fn get_problem(&self, id: ProblemId) -> Result<Option<MathProblem>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, question, display, answer, kind, difficulty, created_at
            FROM math_problems
            WHERE id = ?1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(read_err)?;

        row.as_ref().map(map_problem_row).transpose()
    }

    async fn insert_problems(&self, problems: &[MathProblem]) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(read_err)?;

        for problem in problems {
            sqlx::query(
                r"
                INSERT INTO math_problems (
                    id, question, display, answer, kind, difficulty, created_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ",
            )
            .bind(problem.id.to_string())
            .bind(&problem.question)
            .bind(&problem.display)
            .bind(problem.answer)
            .bind(problem.kind.as_str())
            .bind(problem.difficulty.as_str())
            .bind(problem.created_at)
            .execute(&mut *tx)
            .await
            .map_err(write_err)?;
        }

        tx.commit().await.map_err(write_err)
    }

    async fn count_problems(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM math_problems")
            .fetch_one(&self.pool)
            .await
            .map_err(read_err)?;
        count_from_i64(count)
    }
}
