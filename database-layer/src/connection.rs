// Database connection management
use crate::error::{DatabaseError, DatabaseResult};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Database connection pool wrapper
#[derive(Clone)]
pub struct DatabasePool {
    pool: Arc<PgPool>,
}

impl DatabasePool {
    /// Create a new database pool from a connection string
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::ConnectionFailed` when the server is
    /// unreachable or the credentials are rejected.
    pub async fn new(connection_string: &str) -> DatabaseResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(50)
            .min_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(connection_string)
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        info!("Database connection pool created successfully");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Apply pending schema migrations from the bundled `migrations/` set
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::MigrationFailed` when a migration cannot be
    /// applied.
    pub async fn run_migrations(&self) -> DatabaseResult<()> {
        sqlx::migrate!("./migrations")
            .run(self.pool.as_ref())
            .await
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Get the underlying PgPool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check if the pool is healthy
    pub async fn is_healthy(&self) -> bool {
        match sqlx::query("SELECT 1").fetch_one(self.pool.as_ref()).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Database health check failed: {}", e);
                false
            }
        }
    }

    /// Close the pool
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}
