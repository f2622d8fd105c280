use async_trait::async_trait;
use chrono::NaiveDate;
#[cfg(test)]
use mockall::automock;

use crate::{
    entities::education::{EducationInsert, EducationRow},
    errors::AppError,
    repositories::sqlx_repo::{insert_error, SqlxEducationRepo},
};

pub const DUPLICATE_EDUCATION: &str = "Education entry already exists";

#[cfg_attr(test, automock)]
#[async_trait]
pub trait EducationRepository: Send + Sync {
    async fn list_education(&self) -> Result<Vec<EducationRow>, AppError>;

    async fn education_exists(
        &self,
        degree: &str,
        institution: &str,
        start_date: NaiveDate,
    ) -> Result<bool, AppError>;

    async fn create_education(&self, entry: &EducationInsert) -> Result<u64, AppError>;
}

impl SqlxEducationRepo {
    pub fn new(pool: sqlx::MySqlPool) -> Self {
        SqlxEducationRepo { pool }
    }
}

#[async_trait]
impl EducationRepository for SqlxEducationRepo {
    async fn list_education(&self) -> Result<Vec<EducationRow>, AppError> {
        let rows = sqlx::query_as::<_, EducationRow>(
            r#"
            SELECT
                id, degree, institution, location, field_of_study, start_date, end_date,
                gpa, description, achievements, certificate_url, image_url
            FROM education
            ORDER BY end_date DESC, start_date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn education_exists(
        &self,
        degree: &str,
        institution: &str,
        start_date: NaiveDate,
    ) -> Result<bool, AppError> {
        let found = sqlx::query_scalar::<_, u64>(
            r#"
            SELECT id FROM education
            WHERE degree = ? AND institution = ? AND start_date = ?
            LIMIT 1
            "#,
        )
        .bind(degree)
        .bind(institution)
        .bind(start_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found.is_some())
    }

    async fn create_education(&self, entry: &EducationInsert) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO education (
                degree, institution, location, field_of_study, start_date, end_date,
                gpa, description, achievements, certificate_url, image_url
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.degree)
        .bind(&entry.institution)
        .bind(&entry.location)
        .bind(&entry.field_of_study)
        .bind(entry.start_date)
        .bind(entry.end_date)
        .bind(entry.gpa)
        .bind(&entry.description)
        .bind(&entry.achievements)
        .bind(&entry.certificate_url)
        .bind(&entry.image_url)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, DUPLICATE_EDUCATION))?;

        Ok(result.last_insert_id())
    }
}
