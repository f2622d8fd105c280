use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    entities::lenient::{optional_i64, optional_i64_or_zero, present},
    errors::AppError,
};

/// Category keys accepted by the admin form, in the order they are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategoryKind {
    Frontend,
    Backend,
    Fullstack,
    Uiux,
    Soft,
}

impl SkillCategoryKind {
    pub const ALL: [SkillCategoryKind; 5] = [
        SkillCategoryKind::Frontend,
        SkillCategoryKind::Backend,
        SkillCategoryKind::Fullstack,
        SkillCategoryKind::Uiux,
        SkillCategoryKind::Soft,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    pub fn key(&self) -> &'static str {
        match self {
            SkillCategoryKind::Frontend => "frontend",
            SkillCategoryKind::Backend => "backend",
            SkillCategoryKind::Fullstack => "fullstack",
            SkillCategoryKind::Uiux => "uiux",
            SkillCategoryKind::Soft => "soft",
        }
    }

    /// Name stored in `skill_categories.name`.
    pub fn display_name(&self) -> &'static str {
        match self {
            SkillCategoryKind::Frontend => "Frontend",
            SkillCategoryKind::Backend => "Backend",
            SkillCategoryKind::Fullstack => "Fullstack",
            SkillCategoryKind::Uiux => "UI/UX",
            SkillCategoryKind::Soft => "Soft Skills",
        }
    }

    pub fn display_order(&self) -> i32 {
        Self::ALL
            .iter()
            .position(|kind| kind == self)
            .map_or(0, |index| index as i32 + 1)
    }

    pub fn default_description(&self) -> String {
        format!("Skills related to {}", self.display_name().to_lowercase())
    }
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SkillRecord {
    pub id: u64,
    pub name: String,
    pub proficiency_level: i32,
    pub description: Option<String>,
    pub category_id: u64,
    pub display_order: i32,
    pub category_name: String,
    pub category_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SkillCategory {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub display_order: i32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A row ready to be written to `skills`.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillInsert {
    pub name: String,
    pub category: SkillCategoryKind,
    pub proficiency_level: i32,
    pub description: String,
    pub display_order: i32,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCreated {
    pub name: String,
    pub category: String,
    pub category_name: String,
    pub category_id: u64,
    pub proficiency_level: i32,
    pub description: String,
    pub display_order: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SkillCreatedResponse {
    pub success: bool,
    pub message: String,
    pub skill_id: u64,
    pub data: SkillCreated,
}

/// Skills sharing a category, kept in the order the category first appears.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillGroup {
    pub category_name: String,
    pub category_description: Option<String>,
    pub skills: Vec<SkillRecord>,
}

pub fn group_by_category(skills: &[SkillRecord]) -> Vec<SkillGroup> {
    let mut groups: Vec<SkillGroup> = Vec::new();
    for skill in skills {
        match groups.iter_mut().find(|g| g.category_name == skill.category_name) {
            Some(group) => group.skills.push(skill.clone()),
            None => groups.push(SkillGroup {
                category_name: skill.category_name.clone(),
                category_description: skill.category_description.clone(),
                skills: vec![skill.clone()],
            }),
        }
    }
    groups
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct NewSkillRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "optional_i64_or_zero")]
    pub proficiency_level: Option<i64>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "optional_i64")]
    pub display_order: Option<i64>,
}

impl TryFrom<NewSkillRequest> for SkillInsert {
    type Error = AppError;

    fn try_from(request: NewSkillRequest) -> Result<Self, Self::Error> {
        let (Some(name), Some(category), Some(proficiency)) = (
            present(&request.name),
            present(&request.category),
            request.proficiency_level,
        ) else {
            return Err(AppError::validation("Missing required fields"));
        };

        if !(1..=100).contains(&proficiency) {
            return Err(AppError::validation("Proficiency level must be between 1 and 100"));
        }

        let category = SkillCategoryKind::from_key(category)
            .ok_or_else(|| AppError::validation("Invalid category"))?;

        Ok(SkillInsert {
            name: name.to_string(),
            category,
            proficiency_level: proficiency as i32,
            description: present(&request.description).unwrap_or_default().to_string(),
            display_order: request
                .display_order
                .and_then(|order| i32::try_from(order).ok())
                .unwrap_or(1),
        })
    }
}

impl SkillInsert {
    pub fn created(&self, category_id: u64) -> SkillCreated {
        SkillCreated {
            name: self.name.clone(),
            category: self.category.key().to_string(),
            category_name: self.category.display_name().to_string(),
            category_id,
            proficiency_level: self.proficiency_level,
            description: self.description.clone(),
            display_order: self.display_order,
        }
    }
}
