use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    entities::project::{
        NewProjectRequest, ProjectCreatedResponse, ProjectFilter, ProjectInsert, ProjectListQuery,
        ProjectPage, ProjectRecord,
    },
    errors::AppError,
    repositories::project::{ProjectRepository, DUPLICATE_PROJECT},
};

pub struct ProjectHandler<R: ?Sized = dyn ProjectRepository> {
    pub project_repo: Arc<R>,
}

impl<R> ProjectHandler<R>
where
    R: ProjectRepository + ?Sized,
{
    pub fn new(project_repo: Arc<R>) -> Self {
        ProjectHandler { project_repo }
    }

    /// Filters, orders and paginates projects
    pub async fn list_projects(&self, query: &ProjectListQuery) -> Result<ProjectPage, AppError> {
        let filter = ProjectFilter::from(query);
        let (rows, total) = self.project_repo.list_projects(&filter).await?;

        Ok(ProjectPage {
            data: rows.into_iter().map(ProjectRecord::from).collect(),
            pagination: filter.pagination(total),
        })
    }

    pub async fn add_project(&self, request: NewProjectRequest) -> Result<ProjectCreatedResponse, AppError> {
        let project = ProjectInsert::try_from(request)?;

        if self
            .project_repo
            .project_exists(&project.title, project.category)
            .await?
        {
            warn!(title = %project.title, category = project.category.key(), "Rejected duplicate project");
            return Err(AppError::Conflict(DUPLICATE_PROJECT.to_string()));
        }

        let project_id = self.project_repo.create_project(&project).await?;
        info!(project_id, title = %project.title, "Project added");

        Ok(ProjectCreatedResponse {
            success: true,
            message: "Project added successfully!".to_string(),
            project_id,
            data: project.created(),
        })
    }
}
