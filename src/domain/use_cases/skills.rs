use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    entities::skill::{NewSkillRequest, SkillCategory, SkillCreatedResponse, SkillInsert, SkillRecord},
    errors::AppError,
    repositories::skill::{SkillRepository, DUPLICATE_SKILL},
};

pub struct SkillHandler<R: ?Sized = dyn SkillRepository> {
    pub skill_repo: Arc<R>,
}

impl<R> SkillHandler<R>
where
    R: SkillRepository + ?Sized,
{
    pub fn new(skill_repo: Arc<R>) -> Self {
        SkillHandler { skill_repo }
    }

    /// Lists skills with their category, grouped by category order
    pub async fn list_skills(&self) -> Result<Vec<SkillRecord>, AppError> {
        self.skill_repo.list_skills().await
    }

    pub async fn list_categories(&self) -> Result<Vec<SkillCategory>, AppError> {
        self.skill_repo.list_categories().await
    }

    /// Validates and stores a skill, creating its category on first use
    pub async fn add_skill(&self, request: NewSkillRequest) -> Result<SkillCreatedResponse, AppError> {
        let skill = SkillInsert::try_from(request)?;

        let category_id = self.skill_repo.ensure_category(skill.category).await?;

        if self.skill_repo.skill_exists(&skill.name, category_id).await? {
            warn!(name = %skill.name, category = skill.category.key(), "Rejected duplicate skill");
            return Err(AppError::Conflict(DUPLICATE_SKILL.to_string()));
        }

        let skill_id = self.skill_repo.create_skill(&skill, category_id).await?;
        info!(skill_id, name = %skill.name, "Skill added");

        Ok(SkillCreatedResponse {
            success: true,
            message: "Skill added successfully!".to_string(),
            skill_id,
            data: skill.created(category_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{entities::skill::SkillCategoryKind, repositories::skill::MockSkillRepository};
    use mockall::predicate::eq;

    fn request(json: &str) -> NewSkillRequest {
        serde_json::from_str(json).unwrap()
    }

    #[actix_rt::test]
    async fn adds_skill_under_resolved_category() {
        let mut repo = MockSkillRepository::new();
        repo.expect_ensure_category()
            .with(eq(SkillCategoryKind::Uiux))
            .times(1)
            .returning(|_| Ok(4));
        repo.expect_skill_exists()
            .withf(|name, category_id| name == "Figma" && *category_id == 4)
            .returning(|_, _| Ok(false));
        repo.expect_create_skill()
            .withf(|skill, category_id| skill.proficiency_level == 80 && *category_id == 4)
            .times(1)
            .returning(|_, _| Ok(17));

        let handler = SkillHandler::new(Arc::new(repo));
        let response = handler
            .add_skill(request(r#"{"name":"Figma","category":"uiux","proficiency_level":80}"#))
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.skill_id, 17);
        assert_eq!(response.message, "Skill added successfully!");
        assert_eq!(response.data.category_name, "UI/UX");
        assert_eq!(response.data.category_id, 4);
    }

    #[actix_rt::test]
    async fn duplicate_skill_is_not_inserted() {
        let mut repo = MockSkillRepository::new();
        repo.expect_ensure_category().returning(|_| Ok(1));
        repo.expect_skill_exists().returning(|_, _| Ok(true));
        repo.expect_create_skill().times(0);

        let handler = SkillHandler::new(Arc::new(repo));
        let err = handler
            .add_skill(request(r#"{"name":"React","category":"frontend","proficiency_level":90}"#))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(ref msg) if msg == DUPLICATE_SKILL));
    }

    #[actix_rt::test]
    async fn invalid_proficiency_never_touches_storage() {
        let mut repo = MockSkillRepository::new();
        repo.expect_ensure_category().times(0);
        repo.expect_create_skill().times(0);

        let handler = SkillHandler::new(Arc::new(repo));
        let err = handler
            .add_skill(request(r#"{"name":"React","category":"frontend","proficiency_level":101}"#))
            .await
            .unwrap_err();

        assert_eq!(err.public_message(), "Proficiency level must be between 1 and 100");
    }
}
