use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    entities::education::{
        EducationCreatedResponse, EducationInsert, EducationRecord, EducationRow, NewEducationRequest,
    },
    errors::AppError,
    repositories::education::{EducationRepository, DUPLICATE_EDUCATION},
};

pub struct EducationHandler<R: ?Sized = dyn EducationRepository> {
    pub education_repo: Arc<R>,
}

impl<R> EducationHandler<R>
where
    R: EducationRepository + ?Sized,
{
    pub fn new(education_repo: Arc<R>) -> Self {
        EducationHandler { education_repo }
    }

    /// Education timeline, most recently finished first
    pub async fn list_education(&self) -> Result<Vec<EducationRecord>, AppError> {
        let mut rows = self.education_repo.list_education().await?;
        rows.sort_by(EducationRow::timeline_cmp);
        Ok(rows.into_iter().map(EducationRecord::from).collect())
    }

    pub async fn add_education(
        &self,
        request: NewEducationRequest,
    ) -> Result<EducationCreatedResponse, AppError> {
        let entry = EducationInsert::try_from(request)?;

        if self
            .education_repo
            .education_exists(&entry.degree, &entry.institution, entry.start_date)
            .await?
        {
            warn!(degree = %entry.degree, institution = %entry.institution, "Rejected duplicate education entry");
            return Err(AppError::Conflict(DUPLICATE_EDUCATION.to_string()));
        }

        let education_id = self.education_repo.create_education(&entry).await?;
        info!(education_id, degree = %entry.degree, "Education entry added");

        Ok(EducationCreatedResponse {
            success: true,
            message: "Education entry added successfully!".to_string(),
            education_id,
            data: entry.created(),
        })
    }
}
