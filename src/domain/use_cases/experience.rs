use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    entities::experience::{
        ExperienceCreatedResponse, ExperienceInsert, ExperienceRecord, ExperienceRow,
        NewExperienceRequest,
    },
    errors::AppError,
    repositories::experience::{ExperienceRepository, DUPLICATE_EXPERIENCE},
};

pub struct ExperienceHandler<R: ?Sized = dyn ExperienceRepository> {
    pub experience_repo: Arc<R>,
}

impl<R> ExperienceHandler<R>
where
    R: ExperienceRepository + ?Sized,
{
    pub fn new(experience_repo: Arc<R>) -> Self {
        ExperienceHandler { experience_repo }
    }

    /// Work history with current positions first
    pub async fn list_experience(&self) -> Result<Vec<ExperienceRecord>, AppError> {
        let mut rows = self.experience_repo.list_experience().await?;
        rows.sort_by(ExperienceRow::timeline_cmp);
        Ok(rows.into_iter().map(ExperienceRecord::from).collect())
    }

    pub async fn add_experience(
        &self,
        request: NewExperienceRequest,
    ) -> Result<ExperienceCreatedResponse, AppError> {
        let entry = ExperienceInsert::try_from(request)?;

        if self
            .experience_repo
            .experience_exists(&entry.position, &entry.company_name, entry.start_date)
            .await?
        {
            warn!(position = %entry.position, company = %entry.company_name, "Rejected duplicate experience entry");
            return Err(AppError::Conflict(DUPLICATE_EXPERIENCE.to_string()));
        }

        let experience_id = self.experience_repo.create_experience(&entry).await?;
        info!(experience_id, position = %entry.position, "Experience entry added");

        Ok(ExperienceCreatedResponse {
            success: true,
            message: "Experience entry added successfully!".to_string(),
            experience_id,
            data: entry.created(),
        })
    }
}
