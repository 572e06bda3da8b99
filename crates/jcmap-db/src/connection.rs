//! Connection handling for the JCMap database.
//!
//! The server talks to SurrealDB over WebSocket and authenticates as
//! root. Integration tests skip this module entirely and run against
//! the in-memory engine.

use std::env;

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;
use crate::schema;

/// Connection settings, normally read from `JCMAP_DB_*` environment
/// variables.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket address, host:port.
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "jcmap".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

impl DbConfig {
    /// Read the configuration from `JCMAP_DB_URL`, `JCMAP_DB_NAMESPACE`,
    /// `JCMAP_DB_DATABASE`, `JCMAP_DB_USERNAME` and `JCMAP_DB_PASSWORD`,
    /// falling back to the default for each variable that is unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env_or("JCMAP_DB_URL", defaults.url),
            namespace: env_or("JCMAP_DB_NAMESPACE", defaults.namespace),
            database: env_or("JCMAP_DB_DATABASE", defaults.database),
            username: env_or("JCMAP_DB_USERNAME", defaults.username),
            password: env_or("JCMAP_DB_PASSWORD", defaults.password),
        }
    }
}

/// A live root connection with the namespace and database selected.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Open the connection described by `config`.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        let db = Surreal::new::<Ws>(&config.url).await?;

        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "connected to SurrealDB"
        );

        Ok(Self { db })
    }

    /// Connect and bring the schema up to date in one step. This is
    /// what the server binary wants at startup.
    pub async fn connect_and_migrate(config: &DbConfig) -> Result<Self, DbError> {
        let manager = Self::connect(config).await?;
        schema::run_migrations(&manager.db).await?;
        Ok(manager)
    }

    /// The underlying client, for building repositories.
    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }
}
