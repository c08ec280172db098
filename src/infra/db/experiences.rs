use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{ExperiencesRepo, NewExperience, RepoError},
    domain::{entities::ExperienceRecord, types::ExperienceStatus},
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ExperienceRow {
    id: Uuid,
    author_name: String,
    company: String,
    role: String,
    content: String,
    status: ExperienceStatus,
    created_at: OffsetDateTime,
}

impl From<ExperienceRow> for ExperienceRecord {
    fn from(row: ExperienceRow) -> Self {
        Self {
            id: row.id,
            author_name: row.author_name,
            company: row.company,
            role: row.role,
            content: row.content,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ExperiencesRepo for PostgresRepositories {
    async fn list_by_status(
        &self,
        status: ExperienceStatus,
    ) -> Result<Vec<ExperienceRecord>, RepoError> {
        let rows = sqlx::query_as::<_, ExperienceRow>(
            r#"
            SELECT id, author_name, company, role, content, status, created_at
            FROM interview_experiences
            WHERE status = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ExperienceRecord::from).collect())
    }

    async fn create(&self, experience: NewExperience) -> Result<ExperienceRecord, RepoError> {
        let row = sqlx::query_as::<_, ExperienceRow>(
            r#"
            INSERT INTO interview_experiences (author_name, company, role, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, author_name, company, role, content, status, created_at
            "#,
        )
        .bind(experience.author_name)
        .bind(experience.company)
        .bind(experience.role)
        .bind(experience.content)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(ExperienceRecord::from(row))
    }

    async fn approve(&self, id: Uuid) -> Result<ExperienceRecord, RepoError> {
        let row = sqlx::query_as::<_, ExperienceRow>(
            r#"
            UPDATE interview_experiences
            SET status = 'published'
            WHERE id = $1
            RETURNING id, author_name, company, role, content, status, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?
        .ok_or(RepoError::NotFound)?;

        Ok(ExperienceRecord::from(row))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM interview_experiences WHERE id = $1")
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
