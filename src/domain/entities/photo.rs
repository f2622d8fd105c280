use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{
    entities::{
        lenient::{optional_i64, present},
        project::validate_http_url,
    },
    errors::AppError,
};

pub const DEFAULT_PHOTO_CATEGORY: &str = "General";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PhotoRecord {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub drive_link: String,
    pub category: String,
    pub display_order: i32,
}

impl PhotoRecord {
    /// Display order ascending, newest id first within the same order.
    pub fn gallery_cmp(a: &Self, b: &Self) -> Ordering {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| b.id.cmp(&a.id))
    }
}

/// Distinct categories in the order they first appear.
pub fn distinct_categories(photos: &[PhotoRecord]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for photo in photos {
        if !seen.contains(&photo.category.as_str()) {
            seen.push(&photo.category);
        }
    }
    seen
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoInsert {
    pub title: String,
    pub description: String,
    pub drive_link: String,
    pub category: String,
    pub display_order: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PhotoCreatedResponse {
    pub success: bool,
    pub message: String,
    pub photo_id: u64,
    pub data: PhotoInsert,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewPhotoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub drive_link: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "optional_i64")]
    pub display_order: Option<i64>,
}

impl TryFrom<NewPhotoRequest> for PhotoInsert {
    type Error = AppError;

    fn try_from(request: NewPhotoRequest) -> Result<Self, Self::Error> {
        let (Some(title), Some(drive_link)) = (present(&request.title), present(&request.drive_link))
        else {
            return Err(AppError::validation("Title and Drive link are required"));
        };

        let drive_link = validate_http_url(drive_link, "Invalid Drive link URL")?;

        Ok(PhotoInsert {
            title: title.to_string(),
            description: present(&request.description).unwrap_or_default().to_string(),
            drive_link,
            category: present(&request.category)
                .unwrap_or(DEFAULT_PHOTO_CATEGORY)
                .to_string(),
            display_order: request
                .display_order
                .and_then(|order| i32::try_from(order).ok())
                .unwrap_or(0),
        })
    }
}
