use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    entities::{
        dates::{format_month_year, human_duration, parse_flexible_date},
        lenient::{optional_bool, present},
        project::{split_list, validate_http_url},
    },
    errors::AppError,
};

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ExperienceRow {
    pub id: u64,
    pub company_name: String,
    pub position: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub current_job: bool,
    pub location: Option<String>,
    pub description: String,
    pub achievements: Option<String>,
    pub technologies_used: Option<String>,
    pub company_logo_url: Option<String>,
}

impl ExperienceRow {
    /// Current positions first, then latest end date (missing last), then latest start.
    pub fn timeline_cmp(a: &Self, b: &Self) -> Ordering {
        b.current_job
            .cmp(&a.current_job)
            .then_with(|| b.end_date.cmp(&a.end_date))
            .then_with(|| b.start_date.cmp(&a.start_date))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceInsert {
    pub position: String,
    pub company_name: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub current_job: bool,
    pub description: String,
    pub achievements: String,
    pub technologies_used: String,
    pub company_logo_url: Option<String>,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    pub id: u64,
    pub company_name: String,
    pub position: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub current_job: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub location: Option<String>,
    pub description: String,
    pub achievements: Option<String>,
    pub technologies_used: Vec<String>,
    pub company_logo_url: Option<String>,
}

impl From<ExperienceRow> for ExperienceRecord {
    fn from(row: ExperienceRow) -> Self {
        let end = if row.current_job { None } else { row.end_date };

        Self {
            id: row.id,
            company_name: row.company_name,
            position: row.position,
            start_date: format_month_year(row.start_date),
            end_date: end.map(format_month_year),
            current_job: row.current_job,
            duration: end.map(|end| human_duration(row.start_date, end)),
            location: row.location,
            description: row.description,
            achievements: row.achievements,
            technologies_used: split_list(row.technologies_used.as_deref().unwrap_or_default()),
            company_logo_url: row.company_logo_url,
        }
    }
}

impl ExperienceRecord {
    /// `Jan 2020 - Present` style period label.
    pub fn period_label(&self) -> String {
        match (&self.end_date, self.current_job) {
            (_, true) | (None, false) => format!("{} - Present", self.start_date),
            (Some(end), false) => format!("{} - {}", self.start_date, end),
        }
    }

    pub fn achievement_lines(&self) -> Vec<&str> {
        self.achievements
            .as_deref()
            .unwrap_or_default()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceCreated {
    pub position: String,
    pub company_name: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub current_job: bool,
    pub description: String,
    pub achievements: String,
    pub technologies_used: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExperienceCreatedResponse {
    pub success: bool,
    pub message: String,
    pub experience_id: u64,
    pub data: ExperienceCreated,
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct NewExperienceRequest {
    pub position: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "optional_bool")]
    pub current_job: Option<bool>,
    pub description: Option<String>,
    pub achievements: Option<String>,
    pub technologies_used: Option<String>,
    pub company_logo_url: Option<String>,
}

impl TryFrom<NewExperienceRequest> for ExperienceInsert {
    type Error = AppError;

    fn try_from(request: NewExperienceRequest) -> Result<Self, Self::Error> {
        let (Some(position), Some(company_name), Some(start_raw), Some(description)) = (
            present(&request.position),
            present(&request.company_name),
            present(&request.start_date),
            present(&request.description),
        ) else {
            return Err(AppError::validation("Missing required fields"));
        };

        let start_date = parse_flexible_date(start_raw)
            .ok_or_else(|| AppError::validation("Invalid start date"))?;

        let mut end_date = match present(&request.end_date) {
            Some(raw) => Some(
                parse_flexible_date(raw).ok_or_else(|| AppError::validation("Invalid end date"))?,
            ),
            None => None,
        };

        let current_job = request.current_job.unwrap_or(false);
        if current_job {
            end_date = None;
        } else if end_date.is_none() {
            return Err(AppError::validation("End date is required for past positions"));
        }

        let company_logo_url = present(&request.company_logo_url)
            .map(|url| validate_http_url(url, "Invalid company logo URL"))
            .transpose()?;

        Ok(ExperienceInsert {
            position: position.to_string(),
            company_name: company_name.to_string(),
            location: present(&request.location).unwrap_or_default().to_string(),
            start_date,
            end_date,
            current_job,
            description: description.to_string(),
            achievements: present(&request.achievements).unwrap_or_default().to_string(),
            technologies_used: present(&request.technologies_used).unwrap_or_default().to_string(),
            company_logo_url,
        })
    }
}

impl ExperienceInsert {
    pub fn created(&self) -> ExperienceCreated {
        ExperienceCreated {
            position: self.position.clone(),
            company_name: self.company_name.clone(),
            location: self.location.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            current_job: self.current_job,
            description: self.description.clone(),
            achievements: self.achievements.clone(),
            technologies_used: self.technologies_used.clone(),
        }
    }
}
