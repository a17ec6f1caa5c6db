use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, PgPool, Row};

use crate::store::traits::UserDirectory;

#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    /// Create a directory backed by the given PostgreSQL connection string
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn unique_identifier_for(&self, email: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT phone_number FROM users WHERE lower(email) = $1 LIMIT 1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user")?;

        let Some(row) = row else {
            return Ok(None);
        };

        let phone_number: Option<String> = row
            .try_get("phone_number")
            .context("Failed to read phone_number")?;
        Ok(phone_number
            .map(|number| number.trim().to_string())
            .filter(|number| !number.is_empty()))
    }
}
