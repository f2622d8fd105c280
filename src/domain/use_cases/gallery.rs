use std::sync::Arc;

use tracing::info;

use crate::{
    entities::photo::{NewPhotoRequest, PhotoCreatedResponse, PhotoInsert, PhotoRecord},
    errors::AppError,
    repositories::gallery::GalleryRepository,
};

pub struct GalleryHandler<R: ?Sized = dyn GalleryRepository> {
    pub gallery_repo: Arc<R>,
}

impl<R> GalleryHandler<R>
where
    R: GalleryRepository + ?Sized,
{
    pub fn new(gallery_repo: Arc<R>) -> Self {
        GalleryHandler { gallery_repo }
    }

    pub async fn list_photos(&self) -> Result<Vec<PhotoRecord>, AppError> {
        let mut photos = self.gallery_repo.list_photos().await?;
        photos.sort_by(PhotoRecord::gallery_cmp);
        Ok(photos)
    }

    pub async fn add_photo(&self, request: NewPhotoRequest) -> Result<PhotoCreatedResponse, AppError> {
        let photo = PhotoInsert::try_from(request)?;

        let photo_id = self.gallery_repo.create_photo(&photo).await?;
        info!(photo_id, title = %photo.title, "Photo added");

        Ok(PhotoCreatedResponse {
            success: true,
            message: "Photo added successfully".to_string(),
            photo_id,
            data: photo,
        })
    }
}
