use async_trait::async_trait;
use chrono::NaiveDate;
#[cfg(test)]
use mockall::automock;

use crate::{
    entities::experience::{ExperienceInsert, ExperienceRow},
    errors::AppError,
    repositories::sqlx_repo::{insert_error, SqlxExperienceRepo},
};

pub const DUPLICATE_EXPERIENCE: &str = "Experience entry already exists";

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ExperienceRepository: Send + Sync {
    async fn list_experience(&self) -> Result<Vec<ExperienceRow>, AppError>;

    async fn experience_exists(
        &self,
        position: &str,
        company_name: &str,
        start_date: NaiveDate,
    ) -> Result<bool, AppError>;

    async fn create_experience(&self, entry: &ExperienceInsert) -> Result<u64, AppError>;
}

impl SqlxExperienceRepo {
    pub fn new(pool: sqlx::MySqlPool) -> Self {
        SqlxExperienceRepo { pool }
    }
}

#[async_trait]
impl ExperienceRepository for SqlxExperienceRepo {
    async fn list_experience(&self) -> Result<Vec<ExperienceRow>, AppError> {
        let rows = sqlx::query_as::<_, ExperienceRow>(
            r#"
            SELECT
                id, company_name, position, start_date, end_date, current_job, location,
                description, achievements, technologies_used, company_logo_url
            FROM experience
            ORDER BY current_job DESC, end_date DESC, start_date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn experience_exists(
        &self,
        position: &str,
        company_name: &str,
        start_date: NaiveDate,
    ) -> Result<bool, AppError> {
        let found = sqlx::query_scalar::<_, u64>(
            r#"
            SELECT id FROM experience
            WHERE position = ? AND company_name = ? AND start_date = ?
            LIMIT 1
            "#,
        )
        .bind(position)
        .bind(company_name)
        .bind(start_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found.is_some())
    }

    async fn create_experience(&self, entry: &ExperienceInsert) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO experience (
                position, company_name, location, start_date, end_date, current_job,
                description, achievements, technologies_used, company_logo_url
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.position)
        .bind(&entry.company_name)
        .bind(&entry.location)
        .bind(entry.start_date)
        .bind(entry.end_date)
        .bind(entry.current_job)
        .bind(&entry.description)
        .bind(&entry.achievements)
        .bind(&entry.technologies_used)
        .bind(&entry.company_logo_url)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, DUPLICATE_EXPERIENCE))?;

        Ok(result.last_insert_id())
    }
}
