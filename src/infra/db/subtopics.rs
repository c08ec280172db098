use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{NewSubtopic, RepoError, SubtopicsRepo},
    domain::entities::SubtopicRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct SubtopicRow {
    id: Uuid,
    subject_id: Uuid,
    name: String,
    question_count: i64,
    created_at: OffsetDateTime,
}

impl From<SubtopicRow> for SubtopicRecord {
    fn from(row: SubtopicRow) -> Self {
        Self {
            id: row.id,
            subject_id: row.subject_id,
            name: row.name,
            question_count: row.question_count,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SubtopicBaseRow {
    id: Uuid,
    subject_id: Uuid,
    name: String,
    created_at: OffsetDateTime,
}

impl SubtopicBaseRow {
    fn into_record(self, question_count: i64) -> SubtopicRecord {
        SubtopicRecord {
            id: self.id,
            subject_id: self.subject_id,
            name: self.name,
            question_count,
            created_at: self.created_at,
        }
    }
}

#[async_trait]
impl SubtopicsRepo for PostgresRepositories {
    async fn list_for_subject(&self, subject_id: Uuid) -> Result<Vec<SubtopicRecord>, RepoError> {
        let rows = sqlx::query_as::<_, SubtopicRow>(
            r#"
            SELECT t.id, t.subject_id, t.name, t.created_at, COUNT(q.id) AS question_count
            FROM subtopics t
            LEFT JOIN questions q ON q.subtopic_id = t.id
            WHERE t.subject_id = $1
            GROUP BY t.id
            ORDER BY t.name
            "#,
        )
        .bind(subject_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(SubtopicRecord::from).collect())
    }

    async fn create(&self, subtopic: NewSubtopic) -> Result<SubtopicRecord, RepoError> {
        let row = sqlx::query_as::<_, SubtopicBaseRow>(
            r#"
            INSERT INTO subtopics (subject_id, name)
            VALUES ($1, $2)
            RETURNING id, subject_id, name, created_at
            "#,
        )
        .bind(subtopic.subject_id)
        .bind(subtopic.name)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into_record(0))
    }

    async fn rename(&self, id: Uuid, name: String) -> Result<SubtopicRecord, RepoError> {
        let row = sqlx::query_as::<_, SubtopicBaseRow>(
            r#"
            UPDATE subtopics
            SET name = $2
            WHERE id = $1
            RETURNING id, subject_id, name, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?
        .ok_or(RepoError::NotFound)?;

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM questions WHERE subtopic_id = $1",
        )
        .bind(id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into_record(count))
    }

    async fn delete(&self, id: Uuid) -> Result<SubtopicRecord, RepoError> {
        // Questions under the subtopic are removed by the cascade.
        let row = sqlx::query_as::<_, SubtopicBaseRow>(
            r#"
            DELETE FROM subtopics
            WHERE id = $1
            RETURNING id, subject_id, name, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?
        .ok_or(RepoError::NotFound)?;

        Ok(row.into_record(0))
    }
}
