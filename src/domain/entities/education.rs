use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    entities::{
        dates::{format_month_year, parse_flexible_date},
        lenient::{optional_f64, present},
        project::validate_http_url,
    },
    errors::AppError,
};

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct EducationRow {
    pub id: u64,
    pub degree: String,
    pub institution: String,
    pub location: Option<String>,
    pub field_of_study: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub gpa: Option<f64>,
    pub description: String,
    pub achievements: Option<String>,
    pub certificate_url: Option<String>,
    pub image_url: Option<String>,
}

impl EducationRow {
    /// Most recently finished first; entries without an end date sink to the bottom.
    pub fn timeline_cmp(a: &Self, b: &Self) -> Ordering {
        b.end_date
            .cmp(&a.end_date)
            .then_with(|| b.start_date.cmp(&a.start_date))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EducationInsert {
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub field_of_study: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub gpa: Option<f64>,
    pub description: String,
    pub achievements: String,
    pub certificate_url: Option<String>,
    pub image_url: Option<String>,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationRecord {
    pub id: u64,
    pub degree: String,
    pub institution: String,
    pub location: Option<String>,
    pub field_of_study: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub duration: String,
    pub gpa: Option<f64>,
    pub description: String,
    pub achievements: Option<String>,
    pub certificate_url: Option<String>,
    pub image_url: Option<String>,
}

impl From<EducationRow> for EducationRecord {
    fn from(row: EducationRow) -> Self {
        let start_date = format_month_year(row.start_date);
        let end_date = row.end_date.map(format_month_year).unwrap_or_default();
        let duration = if end_date.is_empty() {
            String::new()
        } else {
            format!("{start_date} - {end_date}")
        };

        Self {
            id: row.id,
            degree: row.degree,
            institution: row.institution,
            location: row.location,
            field_of_study: row.field_of_study,
            start_date,
            end_date,
            duration,
            gpa: row.gpa,
            description: row.description,
            achievements: row.achievements,
            certificate_url: row.certificate_url,
            image_url: row.image_url,
        }
    }
}

impl EducationRecord {
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
pub struct EducationCreated {
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub field_of_study: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub gpa: Option<f64>,
    pub description: String,
    pub achievements: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EducationCreatedResponse {
    pub success: bool,
    pub message: String,
    pub education_id: u64,
    pub data: EducationCreated,
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct NewEducationRequest {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub location: Option<String>,
    #[serde(alias = "fieldOfStudy")]
    pub field_of_study: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "optional_f64")]
    pub gpa: Option<f64>,
    pub description: Option<String>,
    pub achievements: Option<String>,
    pub certificate_url: Option<String>,
    pub image_url: Option<String>,
}

impl TryFrom<NewEducationRequest> for EducationInsert {
    type Error = AppError;

    fn try_from(request: NewEducationRequest) -> Result<Self, Self::Error> {
        let (Some(degree), Some(institution), Some(start_raw), Some(description)) = (
            present(&request.degree),
            present(&request.institution),
            present(&request.start_date),
            present(&request.description),
        ) else {
            return Err(AppError::validation("Missing required fields"));
        };

        let start_date = parse_flexible_date(start_raw)
            .ok_or_else(|| AppError::validation("Invalid start date"))?;

        let end_date = match present(&request.end_date) {
            Some(raw) => Some(
                parse_flexible_date(raw).ok_or_else(|| AppError::validation("Invalid end date"))?,
            ),
            None => None,
        };

        if let Some(gpa) = request.gpa {
            if !(0.0..=5.0).contains(&gpa) {
                return Err(AppError::validation("GPA must be between 0 and 5"));
            }
        }

        let certificate_url = present(&request.certificate_url)
            .map(|url| validate_http_url(url, "Invalid certificate URL"))
            .transpose()?;
        let image_url = present(&request.image_url)
            .map(|url| validate_http_url(url, "Invalid image URL"))
            .transpose()?;

        Ok(EducationInsert {
            degree: degree.to_string(),
            institution: institution.to_string(),
            location: present(&request.location).unwrap_or_default().to_string(),
            field_of_study: present(&request.field_of_study).unwrap_or_default().to_string(),
            start_date,
            end_date,
            gpa: request.gpa,
            description: description.to_string(),
            achievements: present(&request.achievements).unwrap_or_default().to_string(),
            certificate_url,
            image_url,
        })
    }
}

impl EducationInsert {
    pub fn created(&self) -> EducationCreated {
        EducationCreated {
            degree: self.degree.clone(),
            institution: self.institution.clone(),
            location: self.location.clone(),
            field_of_study: self.field_of_study.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            gpa: self.gpa,
            description: self.description.clone(),
            achievements: self.achievements.clone(),
        }
    }
}
