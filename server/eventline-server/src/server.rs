use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::env;
use std::sync::Arc;
use tracing::info;

use database_layer::{DatabasePool, PgEventStore};
use media_store::{FileSystemMediaStore, MediaStore};
use ticketing_core::EventStore;

use crate::middleware::auth_context::AuthConfig;

/// Main Eventline server state
#[derive(Clone)]
pub struct EventlineServer {
    /// Server configuration
    pub config: ServerConfig,
    /// Event and participant storage
    pub store: Arc<dyn EventStore>,
    /// Media storage for event images
    pub media: Arc<dyn MediaStore>,
    /// JWT verification configuration
    pub auth: AuthConfig,
    /// Database pool, absent when running against an in-memory store
    pub db: Option<DatabasePool>,
    /// Process start time, reported by the health endpoint
    pub started_at: DateTime<Utc>,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server name
    pub name: String,
    /// Maximum concurrent connections
    pub max_connections: usize,
    /// Request timeout in seconds
    pub request_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "Eventline Engine".to_string(),
            max_connections: 1000,
            request_timeout: 30,
        }
    }
}

impl EventlineServer {
    /// Create a new server instance from environment configuration
    ///
    /// Connects to PostgreSQL, applies pending migrations, and initializes
    /// the media storage directory.
    ///
    /// # Errors
    ///
    /// Fails when `DATABASE_URL` or `JWT_SECRET` is missing, the database
    /// is unreachable, or the media directory cannot be created.
    pub async fn new() -> Result<Self> {
        let config = ServerConfig::default();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let db = DatabasePool::new(&database_url).await?;
        db.run_migrations().await?;
        let store: Arc<dyn EventStore> = Arc::new(PgEventStore::new(db.clone()));

        let media_root = env::var("MEDIA_ROOT").unwrap_or_else(|_| "./media".to_string());
        let media_url = env::var("MEDIA_PUBLIC_URL")
            .unwrap_or_else(|_| "http://localhost:8080/media".to_string());
        let media_store = FileSystemMediaStore::new(&media_root, media_url);
        media_store.initialize().await?;
        let media: Arc<dyn MediaStore> = Arc::new(media_store);

        let auth = AuthConfig::from_env()?;

        info!(name = %config.name, "Server state initialized");

        Ok(Self {
            config,
            store,
            media,
            auth,
            db: Some(db),
            started_at: Utc::now(),
        })
    }

    /// Create a server instance over explicit stores, without a database
    ///
    /// Used by integration tests to run the full HTTP stack against the
    /// in-memory backends.
    pub fn new_with_store(
        store: Arc<dyn EventStore>,
        media: Arc<dyn MediaStore>,
        auth: AuthConfig,
    ) -> Self {
        Self {
            config: ServerConfig::default(),
            store,
            media,
            auth,
            db: None,
            started_at: Utc::now(),
        }
    }

    /// Get server configuration
    pub fn get_config(&self) -> &ServerConfig {
        &self.config
    }

    /// Seconds since the server state was created
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
