use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{
    entities::about::{AboutSection, AboutStat, PersonalInfo},
    errors::AppError,
    repositories::sqlx_repo::SqlxAboutRepo,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait AboutRepository: Send + Sync {
    /// The first personal info row, if any
    async fn personal_info(&self) -> Result<Option<PersonalInfo>, AppError>;

    async fn list_stats(&self) -> Result<Vec<AboutStat>, AppError>;

    async fn list_sections(&self) -> Result<Vec<AboutSection>, AppError>;
}

impl SqlxAboutRepo {
    pub fn new(pool: sqlx::MySqlPool) -> Self {
        SqlxAboutRepo { pool }
    }
}

#[async_trait]
impl AboutRepository for SqlxAboutRepo {
    async fn personal_info(&self) -> Result<Option<PersonalInfo>, AppError> {
        let info = sqlx::query_as::<_, PersonalInfo>(
            r#"
            SELECT id, name, title, email, phone, location, age, bio, avatar_url
            FROM personal_info
            ORDER BY id
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(info)
    }

    async fn list_stats(&self) -> Result<Vec<AboutStat>, AppError> {
        let stats = sqlx::query_as::<_, AboutStat>(
            r#"
            SELECT id, number, label, description, icon, display_order
            FROM about_stats
            ORDER BY display_order, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stats)
    }

    async fn list_sections(&self) -> Result<Vec<AboutSection>, AppError> {
        let sections = sqlx::query_as::<_, AboutSection>(
            r#"
            SELECT id, title, content, icon, display_order
            FROM about_sections
            ORDER BY display_order, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sections)
    }
}
