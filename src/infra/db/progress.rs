use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{ProgressRepo, RepoError};

use super::{PostgresRepositories, map_sqlx_error};

#[async_trait]
impl ProgressRepo for PostgresRepositories {
    async fn count_questions(&self, subject_id: Uuid) -> Result<u64, RepoError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM questions WHERE subject_id = $1",
        )
        .bind(subject_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }

    async fn completed_question_ids(
        &self,
        user_id: Uuid,
        subject_id: Uuid,
    ) -> Result<Vec<Uuid>, RepoError> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT question_id
            FROM user_progress
            WHERE user_id = $1 AND subject_id = $2 AND is_read
            "#,
        )
        .bind(user_id)
        .bind(subject_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn upsert_read(
        &self,
        user_id: Uuid,
        subject_id: Uuid,
        question_id: Uuid,
        read_at: OffsetDateTime,
    ) -> Result<(), RepoError> {
        // The unique (user_id, question_id) constraint makes concurrent
        // marks converge on a single row.
        sqlx::query(
            r#"
            INSERT INTO user_progress (user_id, subject_id, question_id, is_read, read_at)
            VALUES ($1, $2, $3, TRUE, $4)
            ON CONFLICT (user_id, question_id)
            DO UPDATE SET is_read = TRUE, read_at = EXCLUDED.read_at
            "#,
        )
        .bind(user_id)
        .bind(subject_id)
        .bind(question_id)
        .bind(read_at)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn clear_read(&self, user_id: Uuid, question_id: Uuid) -> Result<u64, RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE user_progress
            SET is_read = FALSE, read_at = NULL
            WHERE user_id = $1 AND question_id = $2 AND is_read
            "#,
        )
        .bind(user_id)
        .bind(question_id)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}
