use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::{
    entities::{
        education::NewEducationRequest, experience::NewExperienceRequest, photo::NewPhotoRequest,
        project::NewProjectRequest, skill::NewSkillRequest,
    },
    errors::{AppError, WriteError},
    AppState,
};

#[instrument(skip(state, data))]
pub async fn add_skill(
    state: web::Data<AppState>,
    data: web::Json<NewSkillRequest>,
) -> Result<HttpResponse, WriteError> {
    let response = state.skill_handler.add_skill(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(state, data))]
pub async fn add_education(
    state: web::Data<AppState>,
    data: web::Json<NewEducationRequest>,
) -> Result<HttpResponse, WriteError> {
    let response = state.education_handler.add_education(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(state, data))]
pub async fn add_experience(
    state: web::Data<AppState>,
    data: web::Json<NewExperienceRequest>,
) -> Result<HttpResponse, WriteError> {
    let response = state.experience_handler.add_experience(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(state, data))]
pub async fn add_project(
    state: web::Data<AppState>,
    data: web::Json<NewProjectRequest>,
) -> Result<HttpResponse, WriteError> {
    let response = state.project_handler.add_project(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(state, data))]
pub async fn add_photo(
    state: web::Data<AppState>,
    data: web::Json<NewPhotoRequest>,
) -> Result<HttpResponse, WriteError> {
    let response = state.gallery_handler.add_photo(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

/// Any method other than POST on a write endpoint.
pub async fn method_not_allowed() -> Result<HttpResponse, WriteError> {
    Err(WriteError(AppError::MethodNotAllowed))
}
