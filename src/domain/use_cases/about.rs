use std::sync::Arc;

use crate::{
    entities::about::{AboutPayload, PersonalInfo},
    errors::AppError,
    repositories::about::AboutRepository,
};

pub const NO_PERSONAL_INFO: &str = "No personal information found";

pub struct AboutHandler<R: ?Sized = dyn AboutRepository> {
    pub about_repo: Arc<R>,
}

impl<R> AboutHandler<R>
where
    R: AboutRepository + ?Sized,
{
    pub fn new(about_repo: Arc<R>) -> Self {
        AboutHandler { about_repo }
    }

    /// Personal info, stats and sections in one payload
    pub async fn get_about(&self) -> Result<AboutPayload, AppError> {
        let (personal_info, stats, sections) = futures::try_join!(
            self.about_repo.personal_info(),
            self.about_repo.list_stats(),
            self.about_repo.list_sections(),
        )?;

        Ok(AboutPayload {
            personal_info,
            stats,
            sections,
        })
    }

    pub async fn get_personal_info(&self) -> Result<PersonalInfo, AppError> {
        self.about_repo
            .personal_info()
            .await?
            .ok_or_else(|| AppError::NotFound(NO_PERSONAL_INFO.to_string()))
    }
}
