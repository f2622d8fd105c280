use sqlx::MySqlPool;

use crate::errors::AppError;

#[derive(Clone)]
pub struct SqlxSkillRepo {
    pub pool: MySqlPool,
}

#[derive(Clone)]
pub struct SqlxEducationRepo {
    pub pool: MySqlPool,
}

#[derive(Clone)]
pub struct SqlxExperienceRepo {
    pub pool: MySqlPool,
}

#[derive(Clone)]
pub struct SqlxProjectRepo {
    pub pool: MySqlPool,
}

#[derive(Clone)]
pub struct SqlxGalleryRepo {
    pub pool: MySqlPool,
}

#[derive(Clone)]
pub struct SqlxAboutRepo {
    pub pool: MySqlPool,
}

#[derive(Clone)]
pub struct SqlxContactRepo {
    pub pool: MySqlPool,
}

#[derive(Clone)]
pub struct SqlxSystemRepo {
    pub pool: MySqlPool,
}

/// Maps a unique-key violation on insert to the entity's duplicate message.
pub(crate) fn insert_error(err: sqlx::Error, duplicate_message: &str) -> AppError {
    match err {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            AppError::Conflict(duplicate_message.to_string())
        }
        other => other.into(),
    }
}
