use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{
    entities::skill::{SkillCategory, SkillCategoryKind, SkillInsert, SkillRecord},
    errors::AppError,
    repositories::sqlx_repo::{insert_error, SqlxSkillRepo},
};

pub const DUPLICATE_SKILL: &str = "Skill already exists in this category";

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SkillRepository: Send + Sync {
    /// Skills joined with their category, category order first
    async fn list_skills(&self) -> Result<Vec<SkillRecord>, AppError>;

    async fn list_categories(&self) -> Result<Vec<SkillCategory>, AppError>;

    /// Returns the category id, inserting the category row when it does not exist yet
    async fn ensure_category(&self, kind: SkillCategoryKind) -> Result<u64, AppError>;

    async fn skill_exists(&self, name: &str, category_id: u64) -> Result<bool, AppError>;

    async fn create_skill(&self, skill: &SkillInsert, category_id: u64) -> Result<u64, AppError>;
}

impl SqlxSkillRepo {
    pub fn new(pool: sqlx::MySqlPool) -> Self {
        SqlxSkillRepo { pool }
    }
}

#[async_trait]
impl SkillRepository for SqlxSkillRepo {
    async fn list_skills(&self) -> Result<Vec<SkillRecord>, AppError> {
        let skills = sqlx::query_as::<_, SkillRecord>(
            r#"
            SELECT
                s.id,
                s.name,
                s.proficiency_level,
                s.description,
                s.category_id,
                s.display_order,
                c.name AS category_name,
                c.description AS category_description
            FROM skills s
            JOIN skill_categories c ON s.category_id = c.id
            ORDER BY c.display_order, s.display_order, s.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(skills)
    }

    async fn list_categories(&self) -> Result<Vec<SkillCategory>, AppError> {
        let categories = sqlx::query_as::<_, SkillCategory>(
            r#"
            SELECT id, name, description, display_order, created_at
            FROM skill_categories
            ORDER BY display_order, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn ensure_category(&self, kind: SkillCategoryKind) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO skill_categories (name, description, display_order)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE id = LAST_INSERT_ID(id)
            "#,
        )
        .bind(kind.display_name())
        .bind(kind.default_description())
        .bind(kind.display_order())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id())
    }

    async fn skill_exists(&self, name: &str, category_id: u64) -> Result<bool, AppError> {
        let found = sqlx::query_scalar::<_, u64>(
            "SELECT id FROM skills WHERE name = ? AND category_id = ? LIMIT 1",
        )
        .bind(name)
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found.is_some())
    }

    async fn create_skill(&self, skill: &SkillInsert, category_id: u64) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO skills (name, category_id, proficiency_level, description, display_order)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&skill.name)
        .bind(category_id)
        .bind(skill.proficiency_level)
        .bind(&skill.description)
        .bind(skill.display_order)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, DUPLICATE_SKILL))?;

        Ok(result.last_insert_id())
    }
}
