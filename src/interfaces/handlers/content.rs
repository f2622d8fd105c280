use std::collections::HashMap;

use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::{envelope::Envelope, project::ProjectListQuery},
    errors::AppError,
    AppState,
};

#[instrument(skip(state))]
pub async fn get_skills(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let skills = state.skill_handler.list_skills().await?;
    Ok(HttpResponse::Ok().json(Envelope::ok(skills)))
}

#[instrument(skip(state))]
pub async fn get_skill_categories(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let categories = state.skill_handler.list_categories().await?;
    Ok(HttpResponse::Ok().json(Envelope::ok(categories)))
}

#[instrument(skip(state))]
pub async fn get_education(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let education = state.education_handler.list_education().await?;
    Ok(HttpResponse::Ok().json(Envelope::ok(education)))
}

#[instrument(skip(state))]
pub async fn get_experience(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let experience = state.experience_handler.list_experience().await?;
    Ok(HttpResponse::Ok().json(Envelope::ok(experience)))
}

/// Paginated listing; unparseable `limit`/`offset` values fall back to their defaults.
#[instrument(skip(state, query))]
pub async fn get_projects(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let query = ProjectListQuery {
        category: query.get("category").cloned(),
        search: query.get("search").cloned(),
        limit: query.get("limit").and_then(|v| v.trim().parse::<i64>().ok()),
        offset: query.get("offset").and_then(|v| v.trim().parse::<i64>().ok()),
    };

    let page = state.project_handler.list_projects(&query).await?;
    Ok(HttpResponse::Ok().json(Envelope::paginated(page.data, page.pagination)))
}

#[instrument(skip(state))]
pub async fn get_gallery(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let photos = state.gallery_handler.list_photos().await?;
    Ok(HttpResponse::Ok().json(Envelope::ok(photos)))
}

#[instrument(skip(state))]
pub async fn get_about(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let about = state.about_handler.get_about().await?;
    Ok(HttpResponse::Ok().json(Envelope::ok(about)))
}

#[instrument(skip(state))]
pub async fn get_personal_info(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let info = state.about_handler.get_personal_info().await?;
    Ok(HttpResponse::Ok().json(Envelope::ok(info)))
}
