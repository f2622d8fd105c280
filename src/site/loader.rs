use std::sync::Arc;

use tracing::{error, warn};

use crate::{
    entities::{
        about::AboutPayload,
        education::EducationRecord,
        experience::ExperienceRecord,
        photo::PhotoRecord,
        project::{ProjectFilter, ProjectListQuery, ProjectPage},
        skill::SkillRecord,
    },
    site::client::{ContentSource, LoadError},
};

/// Loads page content and swaps any failure for an empty fallback.
///
/// Callers never see a [`LoadError`]; it is logged here and the section
/// renders its empty state instead.
#[derive(Clone)]
pub struct PortfolioLoader {
    source: Arc<dyn ContentSource>,
}

fn log_failure(resource: &'static str, err: &LoadError) {
    match err {
        LoadError::Api(message) => warn!(resource, error = %message, "Content API reported a failure"),
        _ => error!(resource, error = %err, "Failed to load content"),
    }
}

impl PortfolioLoader {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self { source }
    }

    pub async fn load_skills(&self) -> Vec<SkillRecord> {
        self.source.fetch_skills().await.unwrap_or_else(|e| {
            log_failure("skills", &e);
            Vec::new()
        })
    }

    pub async fn load_education(&self) -> Vec<EducationRecord> {
        self.source.fetch_education().await.unwrap_or_else(|e| {
            log_failure("education", &e);
            Vec::new()
        })
    }

    pub async fn load_experience(&self) -> Vec<ExperienceRecord> {
        self.source.fetch_experience().await.unwrap_or_else(|e| {
            log_failure("experience", &e);
            Vec::new()
        })
    }

    pub async fn load_projects(&self, query: &ProjectListQuery) -> ProjectPage {
        self.source.fetch_projects(query).await.unwrap_or_else(|e| {
            log_failure("projects", &e);
            let filter = ProjectFilter::from(query);
            ProjectPage::empty(filter.limit, filter.offset)
        })
    }

    pub async fn load_about(&self) -> Option<AboutPayload> {
        self.source
            .fetch_about()
            .await
            .map_err(|e| log_failure("about", &e))
            .ok()
    }

    pub async fn load_gallery(&self) -> Vec<PhotoRecord> {
        self.source.fetch_gallery().await.unwrap_or_else(|e| {
            log_failure("gallery", &e);
            Vec::new()
        })
    }
}
