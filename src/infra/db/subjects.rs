use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{NewSubject, RepoError, SubjectsRepo},
    domain::entities::SubjectRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct SubjectRow {
    id: Uuid,
    name: String,
    description: String,
    question_count: i64,
    created_at: OffsetDateTime,
}

impl From<SubjectRow> for SubjectRecord {
    fn from(row: SubjectRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            question_count: row.question_count,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SubjectBaseRow {
    id: Uuid,
    name: String,
    description: String,
    created_at: OffsetDateTime,
}

impl SubjectBaseRow {
    fn into_record(self, question_count: i64) -> SubjectRecord {
        SubjectRecord {
            id: self.id,
            name: self.name,
            description: self.description,
            question_count,
            created_at: self.created_at,
        }
    }
}

#[async_trait]
impl SubjectsRepo for PostgresRepositories {
    async fn list(&self) -> Result<Vec<SubjectRecord>, RepoError> {
        let rows = sqlx::query_as::<_, SubjectRow>(
            r#"
            SELECT s.id, s.name, s.description, s.created_at, COUNT(q.id) AS question_count
            FROM subjects s
            LEFT JOIN questions q ON q.subject_id = s.id
            GROUP BY s.id
            ORDER BY s.name
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(SubjectRecord::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SubjectRecord>, RepoError> {
        let row = sqlx::query_as::<_, SubjectRow>(
            r#"
            SELECT s.id, s.name, s.description, s.created_at, COUNT(q.id) AS question_count
            FROM subjects s
            LEFT JOIN questions q ON q.subject_id = s.id
            WHERE s.id = $1
            GROUP BY s.id
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(SubjectRecord::from))
    }

    async fn create(&self, subject: NewSubject) -> Result<SubjectRecord, RepoError> {
        let row = sqlx::query_as::<_, SubjectBaseRow>(
            r#"
            INSERT INTO subjects (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(subject.name)
        .bind(subject.description)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into_record(0))
    }

    async fn update(
        &self,
        id: Uuid,
        name: String,
        description: String,
    ) -> Result<SubjectRecord, RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE subjects
            SET name = $2, description = $3
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        self.find_by_id(id).await?.ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
