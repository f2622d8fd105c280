use std::sync::Arc;

use crate::repositories::{
    about::AboutRepository,
    contact::ContactRepository,
    education::EducationRepository,
    experience::ExperienceRepository,
    gallery::GalleryRepository,
    project::ProjectRepository,
    skill::SkillRepository,
    sqlx_repo::{
        SqlxAboutRepo, SqlxContactRepo, SqlxEducationRepo, SqlxExperienceRepo, SqlxGalleryRepo,
        SqlxProjectRepo, SqlxSkillRepo, SqlxSystemRepo,
    },
    system::SystemRepository,
};

/// One handle per storage concern, shared by every worker.
#[derive(Clone)]
pub struct SharedRepositories {
    pub skill_repo: Arc<dyn SkillRepository>,
    pub education_repo: Arc<dyn EducationRepository>,
    pub experience_repo: Arc<dyn ExperienceRepository>,
    pub project_repo: Arc<dyn ProjectRepository>,
    pub gallery_repo: Arc<dyn GalleryRepository>,
    pub about_repo: Arc<dyn AboutRepository>,
    pub contact_repo: Arc<dyn ContactRepository>,
    pub system_repo: Arc<dyn SystemRepository>,
}

impl SharedRepositories {
    pub fn new(pool: sqlx::MySqlPool) -> Self {
        SharedRepositories {
            skill_repo: Arc::new(SqlxSkillRepo::new(pool.clone())),
            education_repo: Arc::new(SqlxEducationRepo::new(pool.clone())),
            experience_repo: Arc::new(SqlxExperienceRepo::new(pool.clone())),
            project_repo: Arc::new(SqlxProjectRepo::new(pool.clone())),
            gallery_repo: Arc::new(SqlxGalleryRepo::new(pool.clone())),
            about_repo: Arc::new(SqlxAboutRepo::new(pool.clone())),
            contact_repo: Arc::new(SqlxContactRepo::new(pool.clone())),
            system_repo: Arc::new(SqlxSystemRepo::new(pool)),
        }
    }
}
