use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use sqlx::{MySql, QueryBuilder};

use crate::{
    entities::project::{ProjectCategory, ProjectFilter, ProjectInsert, ProjectRow},
    errors::AppError,
    repositories::sqlx_repo::{insert_error, SqlxProjectRepo},
};

pub const DUPLICATE_PROJECT: &str = "Project already exists in this category";

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// One page of matching projects plus the total number of matches
    async fn list_projects(&self, filter: &ProjectFilter) -> Result<(Vec<ProjectRow>, u64), AppError>;

    async fn project_exists(&self, title: &str, category: ProjectCategory) -> Result<bool, AppError>;

    async fn create_project(&self, project: &ProjectInsert) -> Result<u64, AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: sqlx::MySqlPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, MySql>, filter: &ProjectFilter) {
    let mut joiner = " WHERE ";

    if let Some(category) = &filter.category {
        builder.push(joiner).push("category = ").push_bind(category.clone());
        joiner = " AND ";
    }

    if let Some(pattern) = filter.like_pattern() {
        builder
            .push(joiner)
            .push("(LOWER(title) LIKE LOWER(")
            .push_bind(pattern.clone())
            .push(") OR LOWER(description) LIKE LOWER(")
            .push_bind(pattern.clone())
            .push(") OR LOWER(COALESCE(technologies, '')) LIKE LOWER(")
            .push_bind(pattern)
            .push("))");
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn list_projects(&self, filter: &ProjectFilter) -> Result<(Vec<ProjectRow>, u64), AppError> {
        let mut count_query = QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM projects");
        push_filter(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut list_query = QueryBuilder::<MySql>::new(
            r#"SELECT
                id, title, description, category, image_url, live_url, source_code_url,
                technologies, created_date, featured
            FROM projects"#,
        );
        push_filter(&mut list_query, filter);
        list_query
            .push(" ORDER BY featured DESC, created_date DESC, id DESC LIMIT ")
            .push_bind(i64::from(filter.limit))
            .push(" OFFSET ")
            .push_bind(i64::from(filter.offset));

        let rows = list_query
            .build_query_as::<ProjectRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total.max(0) as u64))
    }

    async fn project_exists(&self, title: &str, category: ProjectCategory) -> Result<bool, AppError> {
        let found = sqlx::query_scalar::<_, u64>(
            "SELECT id FROM projects WHERE title = ? AND category = ? LIMIT 1",
        )
        .bind(title)
        .bind(category.key())
        .fetch_optional(&self.pool)
        .await?;

        Ok(found.is_some())
    }

    async fn create_project(&self, project: &ProjectInsert) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO projects (
                title, description, category, image_url, live_url, source_code_url,
                technologies, featured
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&project.title)
        .bind(&project.description)
        .bind(project.category.key())
        .bind(&project.image_url)
        .bind(&project.live_url)
        .bind(&project.source_code_url)
        .bind(&project.technologies)
        .bind(project.featured)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, DUPLICATE_PROJECT))?;

        Ok(result.last_insert_id())
    }
}
