mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod shared_repos;
pub mod site;

use std::sync::Arc;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, middlewares, repositories, routes};
pub use infrastructure::{db, limiter, mail, utils};

use limiter::rate_limiter::RateLimiterStore;
use mail::ContactNotifier;
use repositories::system::SystemRepository;
use shared_repos::SharedRepositories;
use site::{client::ContentSource, loader::PortfolioLoader};
use use_cases::{
    about::AboutHandler, contact::ContactHandler, education::EducationHandler,
    experience::ExperienceHandler, gallery::GalleryHandler, projects::ProjectHandler,
    skills::SkillHandler,
};

pub struct AppState {
    pub skill_handler: SkillHandler,
    pub education_handler: EducationHandler,
    pub experience_handler: ExperienceHandler,
    pub project_handler: ProjectHandler,
    pub gallery_handler: GalleryHandler,
    pub about_handler: AboutHandler,
    pub contact_handler: ContactHandler,
    pub system_repo: Arc<dyn SystemRepository>,
    pub loader: PortfolioLoader,
    pub contact_limiter: RateLimiterStore,
    /// Path prefix of the content API, used by rendered forms.
    pub api_base: String,
    pub trust_forwarded_for: bool,
}

impl AppState {
    pub fn new(
        config: &settings::AppConfig,
        repos: SharedRepositories,
        notifier: Arc<dyn ContactNotifier>,
        source: Arc<dyn ContentSource>,
    ) -> Self {
        AppState {
            skill_handler: SkillHandler::new(repos.skill_repo),
            education_handler: EducationHandler::new(repos.education_repo),
            experience_handler: ExperienceHandler::new(repos.experience_repo),
            project_handler: ProjectHandler::new(repos.project_repo),
            gallery_handler: GalleryHandler::new(repos.gallery_repo),
            about_handler: AboutHandler::new(repos.about_repo),
            contact_handler: ContactHandler::new(repos.contact_repo, notifier),
            system_repo: repos.system_repo,
            loader: PortfolioLoader::new(source),
            contact_limiter: RateLimiterStore::new(config.contact_limit.clone()),
            api_base: config.api_base_path.clone(),
            trust_forwarded_for: config.trust_forwarded_for,
        }
    }
}
