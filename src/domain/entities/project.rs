use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    entities::{
        envelope::Pagination,
        lenient::{optional_bool, optional_i64, present},
    },
    errors::AppError,
};

pub const DEFAULT_PAGE_SIZE: u32 = 6;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    Frontend,
    Backend,
    Fullstack,
    Uiux,
}

impl ProjectCategory {
    pub const ALL: [ProjectCategory; 4] = [
        ProjectCategory::Frontend,
        ProjectCategory::Backend,
        ProjectCategory::Fullstack,
        ProjectCategory::Uiux,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    pub fn key(&self) -> &'static str {
        match self {
            ProjectCategory::Frontend => "frontend",
            ProjectCategory::Backend => "backend",
            ProjectCategory::Fullstack => "fullstack",
            ProjectCategory::Uiux => "uiux",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProjectCategory::Frontend => "Frontend",
            ProjectCategory::Backend => "Backend",
            ProjectCategory::Fullstack => "Full Stack",
            ProjectCategory::Uiux => "UI/UX",
        }
    }
}

/// Splits a comma separated column into trimmed, non-empty entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Accepts only absolute `http`/`https` URLs with a host.
pub fn validate_http_url(raw: &str, message: &str) -> Result<String, AppError> {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(raw.to_string()),
        _ => Err(AppError::validation(message)),
    }
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_url: Option<String>,
    pub live_url: Option<String>,
    pub source_code_url: Option<String>,
    pub technologies: Option<String>,
    pub created_date: DateTime<Utc>,
    pub featured: bool,
}

impl ProjectRow {
    /// Featured first, then newest.
    pub fn listing_cmp(a: &Self, b: &Self) -> Ordering {
        b.featured
            .cmp(&a.featured)
            .then_with(|| b.created_date.cmp(&a.created_date))
            .then_with(|| b.id.cmp(&a.id))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInsert {
    pub title: String,
    pub description: String,
    pub category: ProjectCategory,
    pub image_url: Option<String>,
    pub live_url: Option<String>,
    pub source_code_url: Option<String>,
    pub technologies: String,
    pub featured: bool,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_url: Option<String>,
    pub live_url: Option<String>,
    pub source_code_url: Option<String>,
    pub technologies: Vec<String>,
    pub created_date: DateTime<Utc>,
    pub featured: bool,
}

impl From<ProjectRow> for ProjectRecord {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            image_url: row.image_url.filter(|u| !u.trim().is_empty()),
            live_url: row.live_url.filter(|u| !u.trim().is_empty()),
            source_code_url: row.source_code_url.filter(|u| !u.trim().is_empty()),
            technologies: split_list(row.technologies.as_deref().unwrap_or_default()),
            created_date: row.created_date,
            featured: row.featured,
        }
    }
}

/// One page of projects together with its pagination block.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectPage {
    pub data: Vec<ProjectRecord>,
    pub pagination: Pagination,
}

impl ProjectPage {
    pub fn empty(limit: u32, offset: u32) -> Self {
        Self {
            data: Vec::new(),
            pagination: Pagination::empty(limit, offset),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCreated {
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_url: Option<String>,
    pub live_url: Option<String>,
    pub source_code_url: Option<String>,
    pub technologies: String,
    pub featured: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectCreatedResponse {
    pub success: bool,
    pub message: String,
    pub project_id: u64,
    pub data: ProjectCreated,
}

// ───── Listing Query ─────────────────────────────────────────────────

/// Raw query string of `get_projects.php`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "optional_i64")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "optional_i64")]
    pub offset: Option<i64>,
}

impl ProjectListQuery {
    pub fn first_page(category: Option<String>, search: Option<String>) -> Self {
        Self {
            category,
            search,
            limit: Some(DEFAULT_PAGE_SIZE as i64),
            offset: Some(0),
        }
    }

    /// Pairs for the HTTP query string, skipping unset values.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        pairs
    }
}

/// Normalized listing filter: `None` category means all categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl From<&ProjectListQuery> for ProjectFilter {
    fn from(query: &ProjectListQuery) -> Self {
        let category = present(&query.category)
            .filter(|c| !c.eq_ignore_ascii_case("all"))
            .map(str::to_string);
        let search = present(&query.search).map(str::to_string);
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE as i64)
            .clamp(1, MAX_PAGE_SIZE as i64) as u32;
        let offset = query.offset.unwrap_or(0).clamp(0, u32::MAX as i64) as u32;

        Self { category, search, limit, offset }
    }
}

impl ProjectFilter {
    /// `%term%` with LIKE wildcards in the term escaped.
    pub fn like_pattern(&self) -> Option<String> {
        self.search.as_ref().map(|term| {
            let mut escaped = String::with_capacity(term.len() + 2);
            escaped.push('%');
            for ch in term.chars() {
                if matches!(ch, '%' | '_' | '\\') {
                    escaped.push('\\');
                }
                escaped.push(ch);
            }
            escaped.push('%');
            escaped
        })
    }

    /// In-memory equivalent of the SQL WHERE clause.
    pub fn matches(&self, row: &ProjectRow) -> bool {
        let category_ok = self.category.as_ref().is_none_or(|c| &row.category == c);
        let search_ok = self.search.as_ref().is_none_or(|term| {
            let term = term.to_lowercase();
            row.title.to_lowercase().contains(&term)
                || row.description.to_lowercase().contains(&term)
                || row
                    .technologies
                    .as_deref()
                    .is_some_and(|t| t.to_lowercase().contains(&term))
        });
        category_ok && search_ok
    }

    pub fn pagination(&self, total: u64) -> Pagination {
        Pagination::new(total, self.limit, self.offset)
    }
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct NewProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub live_url: Option<String>,
    pub source_code_url: Option<String>,
    pub technologies: Option<String>,
    #[serde(default, deserialize_with = "optional_bool")]
    pub featured: Option<bool>,
}

impl TryFrom<NewProjectRequest> for ProjectInsert {
    type Error = AppError;

    fn try_from(request: NewProjectRequest) -> Result<Self, Self::Error> {
        let (Some(title), Some(description), Some(category), Some(technologies)) = (
            present(&request.title),
            present(&request.description),
            present(&request.category),
            present(&request.technologies),
        ) else {
            return Err(AppError::validation("Missing required fields"));
        };

        let category = ProjectCategory::from_key(category)
            .ok_or_else(|| AppError::validation("Invalid category"))?;

        let image_url = present(&request.image_url)
            .map(|url| validate_http_url(url, "Invalid image URL"))
            .transpose()?;
        let live_url = present(&request.live_url)
            .map(|url| validate_http_url(url, "Invalid live demo URL"))
            .transpose()?;
        let source_code_url = present(&request.source_code_url)
            .map(|url| validate_http_url(url, "Invalid source code URL"))
            .transpose()?;

        Ok(ProjectInsert {
            title: title.to_string(),
            description: description.to_string(),
            category,
            image_url,
            live_url,
            source_code_url,
            technologies: technologies.to_string(),
            featured: request.featured.unwrap_or(false),
        })
    }
}

impl ProjectInsert {
    pub fn created(&self) -> ProjectCreated {
        ProjectCreated {
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.key().to_string(),
            image_url: self.image_url.clone(),
            live_url: self.live_url.clone(),
            source_code_url: self.source_code_url.clone(),
            technologies: self.technologies.clone(),
            featured: self.featured,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(json: &str) -> ProjectListQuery {
        serde_json::from_str(json).unwrap()
    }

    fn row(title: &str, category: &str, technologies: &str) -> ProjectRow {
        ProjectRow {
            id: 1,
            title: title.into(),
            description: "A project".into(),
            category: category.into(),
            image_url: None,
            live_url: None,
            source_code_url: None,
            technologies: Some(technologies.into()),
            created_date: Utc::now(),
            featured: false,
        }
    }

    #[test]
    fn technologies_split_into_list() {
        let record = ProjectRecord::from(row("Site", "frontend", "A,B,C"));
        assert_eq!(record.technologies, vec!["A", "B", "C"]);
        assert_eq!(split_list(" A , ,B,"), vec!["A", "B"]);
    }

    #[test]
    fn filter_defaults_and_clamps() {
        let filter = ProjectFilter::from(&query("{}"));
        assert_eq!(filter, ProjectFilter { category: None, search: None, limit: 6, offset: 0 });

        let filter = ProjectFilter::from(&query(r#"{"category":"all","limit":"500","offset":"-3"}"#));
        assert_eq!(filter.category, None);
        assert_eq!(filter.limit, MAX_PAGE_SIZE);
        assert_eq!(filter.offset, 0);

        let filter = ProjectFilter::from(&query(r#"{"limit":0}"#));
        assert_eq!(filter.limit, 1);
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        let filter = ProjectFilter::from(&query(r#"{"search":"50%_off\\"}"#));
        assert_eq!(filter.like_pattern().as_deref(), Some(r"%50\%\_off\\%"));
    }

    #[test]
    fn matches_is_case_insensitive_across_fields() {
        let filter = ProjectFilter::from(&query(r#"{"category":"frontend","search":"REACT"}"#));
        assert!(filter.matches(&row("Dashboard", "frontend", "React, TypeScript")));
        assert!(!filter.matches(&row("Dashboard", "backend", "React")));
        assert!(!filter.matches(&row("Dashboard", "frontend", "Vue")));
    }

    #[test]
    fn wildcard_characters_match_literally() {
        let filter = ProjectFilter::from(&query(r#"{"search":"%"}"#));
        assert!(!filter.matches(&row("Plain", "frontend", "Rust")));
        assert!(filter.matches(&row("100% Rust", "frontend", "Rust")));
    }

    #[test]
    fn write_validation_order() {
        let parse = |json: &str| {
            ProjectInsert::try_from(serde_json::from_str::<NewProjectRequest>(json).unwrap())
        };

        let err = parse(r#"{"title":"T","description":"D","category":"frontend"}"#).unwrap_err();
        assert_eq!(err.public_message(), "Missing required fields");

        let err = parse(r#"{"title":"T","description":"D","category":"mobile","technologies":"Rust","image_url":"bad"}"#)
            .unwrap_err();
        assert_eq!(err.public_message(), "Invalid category");

        let err = parse(r#"{"title":"T","description":"D","category":"backend","technologies":"Rust","live_url":"javascript:alert(1)"}"#)
            .unwrap_err();
        assert_eq!(err.public_message(), "Invalid live demo URL");

        let err = parse(r#"{"title":"T","description":"D","category":"backend","technologies":"Rust","source_code_url":"github.com/x"}"#)
            .unwrap_err();
        assert_eq!(err.public_message(), "Invalid source code URL");

        let insert = parse(r#"{"title":"T","description":"D","category":"uiux","technologies":"Figma","featured":"1","image_url":""}"#)
            .unwrap();
        assert!(insert.featured);
        assert_eq!(insert.image_url, None);
        assert_eq!(insert.category, ProjectCategory::Uiux);
    }
}
