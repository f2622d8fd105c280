use async_trait::async_trait;
use serde::Serialize;

use crate::{errors::AppError, repositories::sqlx_repo::SqlxSystemRepo};

/// Tables reported by the connection diagnostics endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticTable {
    PersonalInfo,
    AboutStats,
    AboutSections,
}

impl DiagnosticTable {
    pub const ALL: [DiagnosticTable; 3] = [
        DiagnosticTable::PersonalInfo,
        DiagnosticTable::AboutStats,
        DiagnosticTable::AboutSections,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            DiagnosticTable::PersonalInfo => "personal_info",
            DiagnosticTable::AboutStats => "about_stats",
            DiagnosticTable::AboutSections => "about_sections",
        }
    }
}

#[async_trait]
pub trait SystemRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;

    async fn count_rows(&self, table: DiagnosticTable) -> Result<i64, AppError>;
}

impl SqlxSystemRepo {
    pub fn new(pool: sqlx::MySqlPool) -> Self {
        SqlxSystemRepo { pool }
    }
}

#[async_trait]
impl SystemRepository for SqlxSystemRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn count_rows(&self, table: DiagnosticTable) -> Result<i64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.table_name());
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
