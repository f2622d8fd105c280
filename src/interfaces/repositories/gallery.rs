use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{
    entities::photo::{PhotoInsert, PhotoRecord},
    errors::AppError,
    repositories::sqlx_repo::SqlxGalleryRepo,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait GalleryRepository: Send + Sync {
    async fn list_photos(&self) -> Result<Vec<PhotoRecord>, AppError>;

    async fn create_photo(&self, photo: &PhotoInsert) -> Result<u64, AppError>;
}

impl SqlxGalleryRepo {
    pub fn new(pool: sqlx::MySqlPool) -> Self {
        SqlxGalleryRepo { pool }
    }
}

#[async_trait]
impl GalleryRepository for SqlxGalleryRepo {
    async fn list_photos(&self) -> Result<Vec<PhotoRecord>, AppError> {
        let photos = sqlx::query_as::<_, PhotoRecord>(
            r#"
            SELECT id, title, description, drive_link, category, display_order
            FROM photo_gallery
            ORDER BY display_order ASC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(photos)
    }

    async fn create_photo(&self, photo: &PhotoInsert) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO photo_gallery (title, description, drive_link, category, display_order)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&photo.title)
        .bind(&photo.description)
        .bind(&photo.drive_link)
        .bind(&photo.category)
        .bind(photo.display_order)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id())
    }
}
