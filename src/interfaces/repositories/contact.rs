use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{
    entities::contact::ContactMessageInsert,
    errors::AppError,
    repositories::sqlx_repo::SqlxContactRepo,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create_contact_message(&self, msg: &ContactMessageInsert) -> Result<u64, AppError>;
}

impl SqlxContactRepo {
    pub fn new(pool: sqlx::MySqlPool) -> Self {
        SqlxContactRepo { pool }
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepo {
    async fn create_contact_message(&self, msg: &ContactMessageInsert) -> Result<u64, AppError> {
        let result = sqlx::query("INSERT INTO contacts (name, email, message) VALUES (?, ?, ?)")
            .bind(&msg.name)
            .bind(&msg.email)
            .bind(&msg.message)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_id())
    }
}
