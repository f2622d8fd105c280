#![allow(dead_code)]

use std::{net::TcpListener, sync::Arc, time::Duration};

use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use parking_lot::Mutex;
use portfolio_site::{
    entities::{
        about::{AboutSection, AboutStat, PersonalInfo},
        contact::ContactMessageInsert,
        education::{EducationInsert, EducationRow},
        experience::{ExperienceInsert, ExperienceRow},
        photo::{PhotoInsert, PhotoRecord},
        project::{ProjectCategory, ProjectFilter, ProjectInsert, ProjectRow},
        skill::{SkillCategory, SkillCategoryKind, SkillInsert, SkillRecord},
    },
    errors::AppError,
    mail::{ContactNotifier, MailError},
    repositories::{
        about::AboutRepository,
        contact::ContactRepository,
        education::EducationRepository,
        experience::ExperienceRepository,
        gallery::GalleryRepository,
        project::ProjectRepository,
        skill::SkillRepository,
        system::{DiagnosticTable, SystemRepository},
    },
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment, ContactLimitConfig, LogFormat},
    shared_repos::SharedRepositories,
    site::client::{ContentSource, HttpContentSource},
    AppState,
};

pub const API_BASE: &str = "/php";

// ───── In-memory storage ─────────────────────────────────────────────

/// Every table the site reads or writes, held in memory.
#[derive(Default)]
pub struct InMemoryStore {
    pub categories: Mutex<Vec<SkillCategory>>,
    pub skills: Mutex<Vec<(SkillInsert, u64, u64)>>,
    pub education: Mutex<Vec<EducationRow>>,
    pub experience: Mutex<Vec<ExperienceRow>>,
    pub projects: Mutex<Vec<ProjectRow>>,
    pub photos: Mutex<Vec<PhotoRecord>>,
    pub personal_info: Mutex<Option<PersonalInfo>>,
    pub stats: Mutex<Vec<AboutStat>>,
    pub sections: Mutex<Vec<AboutSection>>,
    pub contacts: Mutex<Vec<ContactMessageInsert>>,
    pub fail_storage: Mutex<bool>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn check_available(&self) -> Result<(), AppError> {
        if *self.fail_storage.lock() {
            Err(AppError::InternalError("connection refused".into()))
        } else {
            Ok(())
        }
    }

    pub fn fail_storage(&self) {
        *self.fail_storage.lock() = true;
    }

    pub fn seed_project(&self, title: &str, category: &str, featured: bool, day: u32, technologies: &str) {
        let mut projects = self.projects.lock();
        let id = projects.len() as u64 + 1;
        projects.push(ProjectRow {
            id,
            title: title.to_string(),
            description: format!("{title} description"),
            category: category.to_string(),
            image_url: None,
            live_url: None,
            source_code_url: None,
            technologies: Some(technologies.to_string()),
            created_date: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
            featured,
        });
    }

    pub fn seed_photo(&self, title: &str, category: &str, display_order: i32) {
        let mut photos = self.photos.lock();
        let id = photos.len() as u64 + 1;
        photos.push(PhotoRecord {
            id,
            title: title.to_string(),
            description: None,
            drive_link: format!("https://drive.example.com/{id}.jpg"),
            category: category.to_string(),
            display_order,
        });
    }

    pub fn seed_about(&self) {
        *self.personal_info.lock() = Some(PersonalInfo {
            id: 1,
            name: "Ada Lovelace".to_string(),
            title: Some("Software Engineer".to_string()),
            email: Some("ada@example.com".to_string()),
            phone: None,
            location: Some("London".to_string()),
            age: Some(36),
            bio: Some("Writes programs for engines.".to_string()),
            avatar_url: None,
        });
        self.stats.lock().push(AboutStat {
            id: 1,
            value: "50+".to_string(),
            label: "Projects".to_string(),
            description: None,
            icon: None,
            display_order: 1,
        });
        self.sections.lock().push(AboutSection {
            id: 1,
            title: "Journey".to_string(),
            content: "Started with **notes** on the engine.".to_string(),
            icon: None,
            display_order: 1,
        });
    }

    pub fn seed_experience(&self, position: &str, start: NaiveDate, end: Option<NaiveDate>, current: bool) {
        let mut rows = self.experience.lock();
        let id = rows.len() as u64 + 1;
        rows.push(ExperienceRow {
            id,
            company_name: "Analytical Co".to_string(),
            position: position.to_string(),
            start_date: start,
            end_date: end,
            current_job: current,
            location: None,
            description: "Built things".to_string(),
            achievements: None,
            technologies_used: Some("Rust, SQL".to_string()),
            company_logo_url: None,
        });
    }
}

#[async_trait]
impl SkillRepository for InMemoryStore {
    async fn list_skills(&self) -> Result<Vec<SkillRecord>, AppError> {
        self.check_available()?;
        let categories = self.categories.lock().clone();
        let mut records: Vec<(i32, SkillRecord)> = self
            .skills
            .lock()
            .iter()
            .filter_map(|(skill, category_id, id)| {
                let category = categories.iter().find(|c| c.id == *category_id)?;
                Some((
                    category.display_order,
                    SkillRecord {
                        id: *id,
                        name: skill.name.clone(),
                        proficiency_level: skill.proficiency_level,
                        description: Some(skill.description.clone()),
                        category_id: *category_id,
                        display_order: skill.display_order,
                        category_name: category.name.clone(),
                        category_description: category.description.clone(),
                    },
                ))
            })
            .collect();
        records.sort_by(|a, b| {
            (a.0, a.1.display_order, a.1.id).cmp(&(b.0, b.1.display_order, b.1.id))
        });
        Ok(records.into_iter().map(|(_, record)| record).collect())
    }

    async fn list_categories(&self) -> Result<Vec<SkillCategory>, AppError> {
        self.check_available()?;
        let mut categories = self.categories.lock().clone();
        categories.sort_by_key(|c| (c.display_order, c.id));
        Ok(categories)
    }

    async fn ensure_category(&self, kind: SkillCategoryKind) -> Result<u64, AppError> {
        self.check_available()?;
        let mut categories = self.categories.lock();
        if let Some(existing) = categories.iter().find(|c| c.name == kind.display_name()) {
            return Ok(existing.id);
        }
        let id = categories.len() as u64 + 1;
        categories.push(SkillCategory {
            id,
            name: kind.display_name().to_string(),
            description: Some(kind.default_description()),
            display_order: kind.display_order(),
            created_at: Some(Utc::now()),
        });
        Ok(id)
    }

    async fn skill_exists(&self, name: &str, category_id: u64) -> Result<bool, AppError> {
        self.check_available()?;
        Ok(self
            .skills
            .lock()
            .iter()
            .any(|(skill, cat, _)| skill.name == name && *cat == category_id))
    }

    async fn create_skill(&self, skill: &SkillInsert, category_id: u64) -> Result<u64, AppError> {
        self.check_available()?;
        let mut skills = self.skills.lock();
        let id = skills.len() as u64 + 1;
        skills.push((skill.clone(), category_id, id));
        Ok(id)
    }
}

#[async_trait]
impl EducationRepository for InMemoryStore {
    async fn list_education(&self) -> Result<Vec<EducationRow>, AppError> {
        self.check_available()?;
        Ok(self.education.lock().clone())
    }

    async fn education_exists(
        &self,
        degree: &str,
        institution: &str,
        start_date: NaiveDate,
    ) -> Result<bool, AppError> {
        self.check_available()?;
        Ok(self.education.lock().iter().any(|row| {
            row.degree == degree && row.institution == institution && row.start_date == start_date
        }))
    }

    async fn create_education(&self, entry: &EducationInsert) -> Result<u64, AppError> {
        self.check_available()?;
        let mut rows = self.education.lock();
        let id = rows.len() as u64 + 1;
        rows.push(EducationRow {
            id,
            degree: entry.degree.clone(),
            institution: entry.institution.clone(),
            location: Some(entry.location.clone()),
            field_of_study: Some(entry.field_of_study.clone()),
            start_date: entry.start_date,
            end_date: entry.end_date,
            gpa: entry.gpa,
            description: entry.description.clone(),
            achievements: Some(entry.achievements.clone()),
            certificate_url: entry.certificate_url.clone(),
            image_url: entry.image_url.clone(),
        });
        Ok(id)
    }
}

#[async_trait]
impl ExperienceRepository for InMemoryStore {
    async fn list_experience(&self) -> Result<Vec<ExperienceRow>, AppError> {
        self.check_available()?;
        Ok(self.experience.lock().clone())
    }

    async fn experience_exists(
        &self,
        position: &str,
        company_name: &str,
        start_date: NaiveDate,
    ) -> Result<bool, AppError> {
        self.check_available()?;
        Ok(self.experience.lock().iter().any(|row| {
            row.position == position && row.company_name == company_name && row.start_date == start_date
        }))
    }

    async fn create_experience(&self, entry: &ExperienceInsert) -> Result<u64, AppError> {
        self.check_available()?;
        let mut rows = self.experience.lock();
        let id = rows.len() as u64 + 1;
        rows.push(ExperienceRow {
            id,
            company_name: entry.company_name.clone(),
            position: entry.position.clone(),
            start_date: entry.start_date,
            end_date: entry.end_date,
            current_job: entry.current_job,
            location: Some(entry.location.clone()),
            description: entry.description.clone(),
            achievements: Some(entry.achievements.clone()),
            technologies_used: Some(entry.technologies_used.clone()),
            company_logo_url: entry.company_logo_url.clone(),
        });
        Ok(id)
    }
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn list_projects(&self, filter: &ProjectFilter) -> Result<(Vec<ProjectRow>, u64), AppError> {
        self.check_available()?;
        let mut matching: Vec<ProjectRow> = self
            .projects
            .lock()
            .iter()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect();
        matching.sort_by(ProjectRow::listing_cmp);

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn project_exists(&self, title: &str, category: ProjectCategory) -> Result<bool, AppError> {
        self.check_available()?;
        Ok(self
            .projects
            .lock()
            .iter()
            .any(|row| row.title == title && row.category == category.key()))
    }

    async fn create_project(&self, project: &ProjectInsert) -> Result<u64, AppError> {
        self.check_available()?;
        let mut rows = self.projects.lock();
        let id = rows.len() as u64 + 1;
        rows.push(ProjectRow {
            id,
            title: project.title.clone(),
            description: project.description.clone(),
            category: project.category.key().to_string(),
            image_url: project.image_url.clone(),
            live_url: project.live_url.clone(),
            source_code_url: project.source_code_url.clone(),
            technologies: Some(project.technologies.clone()),
            created_date: Utc::now(),
            featured: project.featured,
        });
        Ok(id)
    }
}

#[async_trait]
impl GalleryRepository for InMemoryStore {
    async fn list_photos(&self) -> Result<Vec<PhotoRecord>, AppError> {
        self.check_available()?;
        Ok(self.photos.lock().clone())
    }

    async fn create_photo(&self, photo: &PhotoInsert) -> Result<u64, AppError> {
        self.check_available()?;
        let mut photos = self.photos.lock();
        let id = photos.len() as u64 + 1;
        photos.push(PhotoRecord {
            id,
            title: photo.title.clone(),
            description: Some(photo.description.clone()),
            drive_link: photo.drive_link.clone(),
            category: photo.category.clone(),
            display_order: photo.display_order,
        });
        Ok(id)
    }
}

#[async_trait]
impl AboutRepository for InMemoryStore {
    async fn personal_info(&self) -> Result<Option<PersonalInfo>, AppError> {
        self.check_available()?;
        Ok(self.personal_info.lock().clone())
    }

    async fn list_stats(&self) -> Result<Vec<AboutStat>, AppError> {
        self.check_available()?;
        Ok(self.stats.lock().clone())
    }

    async fn list_sections(&self) -> Result<Vec<AboutSection>, AppError> {
        self.check_available()?;
        Ok(self.sections.lock().clone())
    }
}

#[async_trait]
impl ContactRepository for InMemoryStore {
    async fn create_contact_message(&self, msg: &ContactMessageInsert) -> Result<u64, AppError> {
        self.check_available()?;
        let mut contacts = self.contacts.lock();
        contacts.push(msg.clone());
        Ok(contacts.len() as u64)
    }
}

#[async_trait]
impl SystemRepository for InMemoryStore {
    async fn check_connection(&self) -> Result<(), AppError> {
        self.check_available()
    }

    async fn count_rows(&self, table: DiagnosticTable) -> Result<i64, AppError> {
        self.check_available()?;
        let rows = match table {
            DiagnosticTable::PersonalInfo => usize::from(self.personal_info.lock().is_some()),
            DiagnosticTable::AboutStats => self.stats.lock().len(),
            DiagnosticTable::AboutSections => self.sections.lock().len(),
        };
        Ok(rows as i64)
    }
}

pub fn shared_repos(store: &Arc<InMemoryStore>) -> SharedRepositories {
    SharedRepositories {
        skill_repo: store.clone(),
        education_repo: store.clone(),
        experience_repo: store.clone(),
        project_repo: store.clone(),
        gallery_repo: store.clone(),
        about_repo: store.clone(),
        contact_repo: store.clone(),
        system_repo: store.clone(),
    }
}

// ───── Notifier ──────────────────────────────────────────────────────

/// Records every notification, or fails them all when `fail` is set.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<ContactMessageInsert>>,
    pub fail: bool,
}

#[async_trait]
impl ContactNotifier for RecordingNotifier {
    async fn notify(&self, message: &ContactMessageInsert) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Transport("connection reset".into()));
        }
        self.sent.lock().push(message.clone());
        Ok(())
    }
}

// ───── Wiring ────────────────────────────────────────────────────────

pub fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Portfolio-Site-Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        database_url: "mysql://unused@localhost/portfolio_test".to_string(),
        database_max_connections: 1,
        run_migrations: false,
        api_base_path: API_BASE.to_string(),
        site_api_url: None,
        loader_timeout_secs: 5,
        cors_allowed_origins: vec!["*".to_string()],
        trust_forwarded_for: false,
        log_level: "debug".to_string(),
        log_format: LogFormat::Pretty,
        smtp: None,
        contact_limit: ContactLimitConfig {
            capacity: 3.0,
            refill_per_sec: 0.05,
            window_secs: 3600,
            limit: 10,
        },
    }
}

/// A content source that nothing listens on; every load fails at the transport level.
pub fn unreachable_source() -> Arc<dyn ContentSource> {
    Arc::new(
        HttpContentSource::new("http://127.0.0.1:9/php/", Duration::from_secs(1))
            .expect("static URL parses"),
    )
}

pub fn build_state(
    store: &Arc<InMemoryStore>,
    notifier: Arc<dyn ContactNotifier>,
    source: Arc<dyn ContentSource>,
) -> web::Data<AppState> {
    web::Data::new(AppState::new(&test_config(), shared_repos(store), notifier, source))
}

/// The application as mounted by the server, minus the request logger.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.clone())
                .wrap(actix_web::middleware::NormalizePath::trim())
                .configure(|cfg| portfolio_site::routes::configure_routes(cfg, common::API_BASE)),
        )
        .await
    };
}

/// A real server on an ephemeral port whose page loader reads its own content API.
pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryStore>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn(store: Arc<InMemoryStore>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let source = HttpContentSource::new(&format!("{address}{API_BASE}/"), Duration::from_secs(5))
            .expect("Failed to build content source");
        let state = build_state(&store, Arc::new(RecordingNotifier::default()), Arc::new(source));

        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .wrap(NormalizePath::trim())
                .configure(|cfg| configure_routes(cfg, API_BASE))
        })
        .listen(listener)
        .expect("Failed to start test server")
        .workers(1)
        .run();

        tokio::spawn(server);

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();
        while client.get(format!("{}/health", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self { address, store, client }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
