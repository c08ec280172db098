use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{NewQuestion, QuestionsRepo, RepoError},
    domain::entities::QuestionRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct QuestionRow {
    id: Uuid,
    subtopic_id: Uuid,
    subject_id: Uuid,
    title: String,
    answer: String,
    created_at: OffsetDateTime,
}

impl From<QuestionRow> for QuestionRecord {
    fn from(row: QuestionRow) -> Self {
        Self {
            id: row.id,
            subtopic_id: row.subtopic_id,
            subject_id: row.subject_id,
            title: row.title,
            answer: row.answer,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl QuestionsRepo for PostgresRepositories {
    async fn list_for_subtopic(
        &self,
        subtopic_id: Uuid,
    ) -> Result<Vec<QuestionRecord>, RepoError> {
        let rows = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, subtopic_id, subject_id, title, answer, created_at
            FROM questions
            WHERE subtopic_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(subtopic_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(QuestionRecord::from).collect())
    }

    async fn create(&self, question: NewQuestion) -> Result<QuestionRecord, RepoError> {
        // The denormalized subject id is resolved from the parent subtopic in
        // the same statement; an unknown subtopic inserts nothing.
        let row = sqlx::query_as::<_, QuestionRow>(
            r#"
            INSERT INTO questions (subtopic_id, subject_id, title, answer)
            SELECT t.id, t.subject_id, $2, $3
            FROM subtopics t
            WHERE t.id = $1
            RETURNING id, subtopic_id, subject_id, title, answer, created_at
            "#,
        )
        .bind(question.subtopic_id)
        .bind(question.title)
        .bind(question.answer)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?
        .ok_or(RepoError::NotFound)?;

        Ok(QuestionRecord::from(row))
    }

    async fn update(
        &self,
        id: Uuid,
        title: String,
        answer: String,
    ) -> Result<QuestionRecord, RepoError> {
        let row = sqlx::query_as::<_, QuestionRow>(
            r#"
            UPDATE questions
            SET title = $2, answer = $3
            WHERE id = $1
            RETURNING id, subtopic_id, subject_id, title, answer, created_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(answer)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?
        .ok_or(RepoError::NotFound)?;

        Ok(QuestionRecord::from(row))
    }

    async fn delete(&self, id: Uuid) -> Result<QuestionRecord, RepoError> {
        let row = sqlx::query_as::<_, QuestionRow>(
            r#"
            DELETE FROM questions
            WHERE id = $1
            RETURNING id, subtopic_id, subject_id, title, answer, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?
        .ok_or(RepoError::NotFound)?;

        Ok(QuestionRecord::from(row))
    }
}
